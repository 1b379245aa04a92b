use super::tags;
use super::CostEstimate;
use crate::constants::HOURS_PER_MONTH;
use crate::pricing::PricingCatalog;
use crate::resource::ResourceDescriptor;

/// Capacity mode comes from the SKU; `on-demand` unless `provisioned` is
/// named explicitly.
pub(super) fn estimate(resource: &ResourceDescriptor, catalog: &PricingCatalog) -> CostEstimate {
    let Some(rates) = catalog.dynamodb_rates() else {
        return CostEstimate::zero("no DynamoDB rates in this region");
    };

    let storage_gb = tags::numeric(resource, &["storage_gb"], 0.0).value;
    let storage_cost = storage_gb * rates.storage_gb_month_usd;

    match resource.sku.trim().to_lowercase().as_str() {
        "provisioned" => {
            let rcu = tags::numeric(resource, &["rcu", "read_capacity_units"], 0.0).value;
            let wcu = tags::numeric(resource, &["wcu", "write_capacity_units"], 0.0).value;
            let read_cost = rcu * HOURS_PER_MONTH * rates.rcu_hour_usd;
            let write_cost = wcu * HOURS_PER_MONTH * rates.wcu_hour_usd;
            CostEstimate::new(
                rates.rcu_hour_usd,
                read_cost + write_cost + storage_cost,
                format!(
                    "provisioned: {rcu} RCU (${read_cost:.2}) + {wcu} WCU (${write_cost:.2}) + {storage_gb} GB storage (${storage_cost:.2})"
                ),
            )
        }
        _ => {
            let reads = tags::numeric(resource, &["read_requests_per_month"], 0.0).value;
            let writes = tags::numeric(resource, &["write_requests_per_month"], 0.0).value;
            let read_cost = reads * rates.read_request_usd;
            let write_cost = writes * rates.write_request_usd;
            CostEstimate::new(
                rates.read_request_usd,
                read_cost + write_cost + storage_cost,
                format!(
                    "on-demand: {reads} reads (${read_cost:.2}) + {writes} writes (${write_cost:.2}) + {storage_gb} GB storage (${storage_cost:.2})"
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(sku: &str, tags: &[(&str, &str)]) -> ResourceDescriptor {
        let mut resource = ResourceDescriptor {
            resource_type: "dynamodb".into(),
            sku: sku.into(),
            region: "us-east-1".into(),
            ..Default::default()
        };
        for (key, value) in tags {
            resource.tags.insert(key.to_string(), value.to_string());
        }
        resource
    }

    #[test]
    fn on_demand_sums_reads_writes_and_storage() {
        let catalog = PricingCatalog::get().unwrap();
        let estimate = estimate(
            &resource(
                "on-demand",
                &[
                    ("read_requests_per_month", "1000000"),
                    ("write_requests_per_month", "500000"),
                    ("storage_gb", "50"),
                ],
            ),
            catalog,
        );
        let rates = catalog.dynamodb_rates().unwrap();
        let expected = 1_000_000.0 * rates.read_request_usd
            + 500_000.0 * rates.write_request_usd
            + 50.0 * rates.storage_gb_month_usd;
        assert!((estimate.cost_per_month - expected).abs() < 1e-6);
        assert!(estimate.billing_detail.contains("reads"));
        assert!(estimate.billing_detail.contains("writes"));
        assert!(estimate.billing_detail.contains("storage"));
    }

    #[test]
    fn provisioned_with_zero_capacity_units_is_storage_only() {
        let catalog = PricingCatalog::get().unwrap();
        let estimate = estimate(&resource("provisioned", &[("storage_gb", "50")]), catalog);
        let rates = catalog.dynamodb_rates().unwrap();
        assert!((estimate.cost_per_month - 50.0 * rates.storage_gb_month_usd).abs() < 1e-9);
    }

    #[test]
    fn provisioned_bills_capacity_unit_hours() {
        let catalog = PricingCatalog::get().unwrap();
        let estimate = estimate(&resource("provisioned", &[("rcu", "10"), ("wcu", "5")]), catalog);
        let rates = catalog.dynamodb_rates().unwrap();
        let expected = 10.0 * HOURS_PER_MONTH * rates.rcu_hour_usd
            + 5.0 * HOURS_PER_MONTH * rates.wcu_hour_usd;
        assert!((estimate.cost_per_month - expected).abs() < 1e-6);
    }

    #[test]
    fn missing_sku_defaults_to_on_demand() {
        let catalog = PricingCatalog::get().unwrap();
        let estimate = estimate(&resource("", &[("read_requests_per_month", "1000")]), catalog);
        assert!(estimate.billing_detail.starts_with("on-demand"));
    }
}
