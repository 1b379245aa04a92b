use super::tags;
use super::CostEstimate;
use crate::pricing::{tiered_cost, PricingCatalog};
use crate::resource::ResourceDescriptor;

/// Three tiered components, each billed over the portion of volume falling
/// inside a tier's bounds (upper bound exclusive).
pub(super) fn estimate(resource: &ResourceDescriptor, catalog: &PricingCatalog) -> CostEstimate {
    let Some(rates) = catalog.cloudwatch_rates() else {
        return CostEstimate::zero("no CloudWatch rates in this region");
    };

    let ingestion_gb = tags::numeric(resource, &["log_ingestion_gb"], 0.0).value;
    let storage_gb = tags::numeric(resource, &["log_storage_gb"], 0.0).value;
    let metrics = tags::numeric(resource, &["custom_metrics"], 0.0).value;

    let ingestion_cost = tiered_cost(&rates.log_ingestion_gb, ingestion_gb);
    let storage_cost = tiered_cost(&rates.log_storage_gb, storage_gb);
    let metrics_cost = tiered_cost(&rates.custom_metrics, metrics);

    let detail = format!(
        "log ingestion {ingestion_gb} GB (${ingestion_cost:.2}) + log storage {storage_gb} GB (${storage_cost:.2}) + {metrics} custom metrics (${metrics_cost:.2})"
    );

    CostEstimate::new(0.0, ingestion_cost + storage_cost + metrics_cost, detail)
}
