use super::tags;
use super::{CostEstimate, EstimateError};
use crate::constants::DEFAULT_EBS_SIZE_GB;
use crate::dispatch::ServiceKind;
use crate::pricing::PricingCatalog;
use crate::resource::ResourceDescriptor;

pub(super) fn estimate(
    resource: &ResourceDescriptor,
    catalog: &PricingCatalog,
) -> Result<CostEstimate, EstimateError> {
    let volume_type = resource.sku.trim();
    if volume_type.is_empty() {
        return Err(EstimateError::MissingSku {
            service: ServiceKind::Ebs,
            role: "volume type",
        });
    }

    let Some(price) = catalog.lookup_ebs_volume(volume_type) else {
        return Ok(CostEstimate::zero(format!(
            "no storage rate for volume type \"{volume_type}\" in this region"
        )));
    };

    let size = tags::numeric(resource, &["size", "volume_size"], DEFAULT_EBS_SIZE_GB);
    let mut detail = format!(
        "{volume_type}: ${:.4}/GB-month x {} GB",
        price.rate_per_gb_month_usd, size.value
    );
    if size.defaulted {
        detail.push_str(" (size defaulted to 8GB)");
    }

    Ok(CostEstimate::new(
        price.rate_per_gb_month_usd,
        price.rate_per_gb_month_usd * size.value,
        detail,
    ))
}
