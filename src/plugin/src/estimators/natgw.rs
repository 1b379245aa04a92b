use super::tags;
use super::CostEstimate;
use crate::constants::HOURS_PER_MONTH;
use crate::pricing::PricingCatalog;
use crate::resource::ResourceDescriptor;

pub(super) fn estimate(resource: &ResourceDescriptor, catalog: &PricingCatalog) -> CostEstimate {
    let Some(price) = catalog.natgw_price() else {
        return CostEstimate::zero("no NAT gateway rates in this region");
    };

    let data_gb = tags::numeric(resource, &["data_processed_gb", "data_gb"], 0.0);
    let hourly = price.hourly_usd * HOURS_PER_MONTH;
    let data = data_gb.value * price.data_processed_gb_usd;

    let mut detail = format!("NAT gateway: ${:.4}/hr x 730", price.hourly_usd);
    if data_gb.value > 0.0 {
        detail.push_str(&format!(
            " + {} GB processed x ${:.4}/GB",
            data_gb.value, price.data_processed_gb_usd
        ));
    }

    CostEstimate::new(price.hourly_usd, hourly + data, detail)
}
