use super::tags;
use super::CostEstimate;
use crate::constants::HOURS_PER_MONTH;
use crate::pricing::PricingCatalog;
use crate::resource::ResourceDescriptor;

pub(super) fn estimate(resource: &ResourceDescriptor, catalog: &PricingCatalog) -> CostEstimate {
    let (lb_type, assumed) = match resource.sku.trim().to_lowercase().as_str() {
        "alb" | "application" => ("alb", false),
        "nlb" | "network" => ("nlb", false),
        "" => ("alb", true),
        other => {
            return CostEstimate::zero(format!(
                "unknown load balancer type \"{other}\" (expected alb or nlb)"
            ))
        }
    };

    let Some(price) = catalog.lookup_load_balancer(lb_type) else {
        return CostEstimate::zero(format!("no {lb_type} rate in this region"));
    };

    let capacity_keys: &[&str] = if lb_type == "alb" {
        &["lcu_per_hour", "capacity_units"]
    } else {
        &["nlcu_per_hour", "capacity_units"]
    };
    let capacity_units = tags::numeric(resource, capacity_keys, 0.0);

    let fixed = price.fixed_hourly_usd * HOURS_PER_MONTH;
    let capacity = capacity_units.value * price.capacity_unit_hourly_usd * HOURS_PER_MONTH;

    let mut detail = format!(
        "{}: ${:.4}/hr x 730",
        lb_type.to_uppercase(),
        price.fixed_hourly_usd
    );
    if capacity_units.value > 0.0 {
        detail.push_str(&format!(
            " + {} capacity units x ${:.4}/hr x 730",
            capacity_units.value, price.capacity_unit_hourly_usd
        ));
    }
    if assumed {
        detail.push_str(" (type defaulted to alb)");
    }

    CostEstimate::new(price.fixed_hourly_usd, fixed + capacity, detail)
}
