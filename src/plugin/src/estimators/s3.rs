use super::tags;
use super::CostEstimate;
use crate::pricing::PricingCatalog;
use crate::resource::ResourceDescriptor;

/// Map the orchestrator's storage-class spelling onto the price list's
/// volume-type names. Lookups past this boundary are case-sensitive.
fn canonical_class(sku: &str) -> String {
    match sku.trim().to_lowercase().replace('-', "_").as_str() {
        "" | "standard" => "Standard".to_string(),
        "standard_ia" | "infrequent_access" => "Standard - Infrequent Access".to_string(),
        "onezone_ia" | "one_zone_ia" => "One Zone - Infrequent Access".to_string(),
        "glacier" | "glacier_flexible_retrieval" => "Amazon Glacier".to_string(),
        "deep_archive" | "glacier_deep_archive" => "Glacier Deep Archive".to_string(),
        _ => sku.trim().to_string(),
    }
}

pub(super) fn estimate(resource: &ResourceDescriptor, catalog: &PricingCatalog) -> CostEstimate {
    let class = canonical_class(&resource.sku);

    let Some(price) = catalog.lookup_s3_class(&class) else {
        return CostEstimate::zero(format!(
            "no storage rate for class \"{}\" in this region",
            resource.sku
        ));
    };

    let size = tags::numeric(resource, &["size"], 1.0);
    let mut detail = format!(
        "{class}: ${:.4}/GB-month x {} GB",
        price.rate_per_gb_month_usd, size.value
    );
    if size.defaulted {
        detail.push_str(" (size defaulted to 1GB)");
    }

    CostEstimate::new(
        price.rate_per_gb_month_usd,
        price.rate_per_gb_month_usd * size.value,
        detail,
    )
}
