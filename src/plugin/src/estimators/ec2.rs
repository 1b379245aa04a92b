use super::{CostEstimate, EstimateError};
use crate::constants::HOURS_PER_MONTH;
use crate::dispatch::ServiceKind;
use crate::pricing::PricingCatalog;
use crate::resource::ResourceDescriptor;

pub(super) fn estimate(
    resource: &ResourceDescriptor,
    catalog: &PricingCatalog,
) -> Result<CostEstimate, EstimateError> {
    let instance_type = resource.sku.trim();
    if instance_type.is_empty() {
        return Err(EstimateError::MissingSku {
            service: ServiceKind::Ec2,
            role: "instance type",
        });
    }

    let Some(price) = catalog.lookup_ec2_instance(instance_type) else {
        return Ok(CostEstimate::zero(format!(
            "no on-demand rate for instance type \"{instance_type}\" in this region"
        )));
    };

    Ok(CostEstimate::new(
        price.hourly_rate_usd,
        price.hourly_rate_usd * HOURS_PER_MONTH,
        format!("{instance_type}: On-demand Linux, Shared tenancy, 730 hrs/month"),
    ))
}
