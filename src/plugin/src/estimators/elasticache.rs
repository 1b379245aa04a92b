use super::tags;
use super::{CostEstimate, EstimateError};
use crate::constants::HOURS_PER_MONTH;
use crate::dispatch::ServiceKind;
use crate::pricing::PricingCatalog;
use crate::resource::ResourceDescriptor;

pub(super) fn estimate(
    resource: &ResourceDescriptor,
    catalog: &PricingCatalog,
) -> Result<CostEstimate, EstimateError> {
    let node_type = resource.sku.trim();
    if node_type.is_empty() {
        return Err(EstimateError::MissingSku {
            service: ServiceKind::Elasticache,
            role: "cache node type",
        });
    }

    let engine = resource
        .tag("engine")
        .map(str::to_lowercase)
        .unwrap_or_else(|| "redis".to_string());
    let nodes = tags::numeric(
        resource,
        &["num_cache_clusters", "num_nodes", "nodes"],
        1.0,
    );

    let Some(price) = catalog.lookup_cache_node(node_type, &engine) else {
        return Ok(CostEstimate::zero(format!(
            "no rate for cache node \"{node_type}\" running {engine} in this region"
        )));
    };

    Ok(CostEstimate::new(
        price.hourly_rate_usd,
        price.hourly_rate_usd * nodes.value * HOURS_PER_MONTH,
        format!(
            "{node_type} ({engine}): ${:.4}/hr x {} node(s) x 730",
            price.hourly_rate_usd, nodes.value
        ),
    ))
}
