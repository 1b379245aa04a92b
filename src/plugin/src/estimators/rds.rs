use super::tags;
use super::{CostEstimate, EstimateError};
use crate::constants::{DEFAULT_RDS_STORAGE_GB, HOURS_PER_MONTH};
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
            service: ServiceKind::Rds,
            role: "database instance type",
        });
    }

    let engine = match resource
        .tag("engine")
        .map(str::to_lowercase)
        .unwrap_or_else(|| "mysql".to_string())
        .as_str()
    {
        // Price list spells the engine out in full.
        "postgres" => "postgresql".to_string(),
        "sqlserver" => "sql server".to_string(),
        engine => engine.to_string(),
    };
    let multi_az = resource
        .tag("multi_az")
        .is_some_and(|v| v.eq_ignore_ascii_case("true"));
    // Multi-AZ runs a synchronous standby: instance and storage both double.
    let az_factor = if multi_az { 2.0 } else { 1.0 };

    let Some(price) = catalog.lookup_rds_instance(instance_type, &engine) else {
        return Ok(CostEstimate::zero(format!(
            "no rate for database instance \"{instance_type}\" running {engine} in this region"
        )));
    };

    let storage = tags::numeric(resource, &["allocated_storage", "storage_gb"], DEFAULT_RDS_STORAGE_GB);
    let storage_rate = catalog
        .lookup_rds_storage("General Purpose")
        .map(|p| p.rate_per_gb_month_usd)
        .unwrap_or(0.0);

    let instance_cost = price.hourly_rate_usd * HOURS_PER_MONTH * az_factor;
    let storage_cost = storage.value * storage_rate * az_factor;

    let mut detail = format!(
        "{instance_type} ({engine}, {}): ${:.4}/hr x 730 + {} GB gp storage",
        if multi_az { "Multi-AZ" } else { "Single-AZ" },
        price.hourly_rate_usd,
        storage.value
    );
    if storage.defaulted {
        detail.push_str(" (storage defaulted to 20GB)");
    }

    Ok(CostEstimate::new(
        price.hourly_rate_usd,
        instance_cost + storage_cost,
        detail,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(sku: &str, tags: &[(&str, &str)]) -> ResourceDescriptor {
        let mut resource = ResourceDescriptor {
            resource_type: "rds".into(),
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
    fn engine_defaults_to_mysql_and_storage_to_twenty_gb() {
        let catalog = PricingCatalog::get().unwrap();
        let estimate = estimate(&resource("db.t3.micro", &[]), catalog).unwrap();
        let instance_rate = catalog
            .lookup_rds_instance("db.t3.micro", "mysql")
            .unwrap()
            .hourly_rate_usd;
        let storage_rate = catalog
            .lookup_rds_storage("General Purpose")
            .unwrap()
            .rate_per_gb_month_usd;
        let expected = instance_rate * HOURS_PER_MONTH + 20.0 * storage_rate;
        assert!((estimate.cost_per_month - expected).abs() < 1e-9);
        assert!(estimate.billing_detail.contains("storage defaulted to 20GB"));
    }

    #[test]
    fn multi_az_doubles_instance_and_storage() {
        let catalog = PricingCatalog::get().unwrap();
        let single = estimate(&resource("db.m5.large", &[("engine", "postgres")]), catalog)
            .unwrap();
        let multi = estimate(
            &resource("db.m5.large", &[("engine", "postgres"), ("multi_az", "true")]),
            catalog,
        )
        .unwrap();
        assert!((multi.cost_per_month - single.cost_per_month * 2.0).abs() < 1e-9);
        assert!(multi.billing_detail.contains("Multi-AZ"));
    }

    #[test]
    fn unknown_engine_is_a_zero_cost_success() {
        let catalog = PricingCatalog::get().unwrap();
        let estimate = estimate(&resource("db.t3.micro", &[("engine", "oracle-ee")]), catalog)
            .unwrap();
        assert_eq!(estimate.cost_per_month, 0.0);
    }

    #[test]
    fn missing_sku_is_an_error() {
        let catalog = PricingCatalog::get().unwrap();
        assert!(estimate(&resource("", &[]), catalog).is_err());
    }
}
