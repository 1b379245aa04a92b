use super::CostEstimate;
use crate::constants::HOURS_PER_MONTH;
use crate::pricing::PricingCatalog;
use crate::resource::ResourceDescriptor;

/// Control plane only. Worker nodes are priced as the EC2 instances they
/// are, so they never show up here.
pub(super) fn estimate(resource: &ResourceDescriptor, catalog: &PricingCatalog) -> CostEstimate {
    let support_type = resource
        .tag("support_type")
        .map(str::to_lowercase)
        .unwrap_or_else(|| "standard".to_string());

    let Some(price) = catalog.lookup_eks_cluster(&support_type) else {
        return CostEstimate::zero(format!(
            "no cluster rate for support type \"{support_type}\" in this region"
        ));
    };

    CostEstimate::new(
        price.hourly_rate_usd,
        price.hourly_rate_usd * HOURS_PER_MONTH,
        format!("EKS control plane ({support_type} support), 730 hrs/month; estimate worker nodes as EC2 instances"),
    )
}
