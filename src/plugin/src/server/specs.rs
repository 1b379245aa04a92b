//! Pricing-spec assembly: the rates a resource bills on, stated per unit,
//! with no usage multiplication.

use crate::dispatch::ServiceKind;
use crate::pricing::PricingCatalog;
use crate::resource::ResourceDescriptor;

use super::structs::RateComponent;

pub(super) fn rate_components(
    resource: &ResourceDescriptor,
    catalog: &PricingCatalog,
) -> Vec<RateComponent> {
    let kind = resource.service_kind();
    match kind {
        ServiceKind::Ec2 => catalog
            .lookup_ec2_instance(resource.sku.trim())
            .map(|price| {
                vec![rate("on_demand_hourly", "USD/hr", price.hourly_rate_usd)]
            })
            .unwrap_or_default(),
        ServiceKind::Ebs => catalog
            .lookup_ebs_volume(resource.sku.trim())
            .map(|price| vec![rate("storage", "USD/GB-month", price.rate_per_gb_month_usd)])
            .unwrap_or_default(),
        ServiceKind::Eks => ["standard", "extended"]
            .iter()
            .filter_map(|tier| catalog.lookup_eks_cluster(tier))
            .map(|price| {
                rate(
                    &format!("cluster_hourly_{}", price.support_type),
                    "USD/hr",
                    price.hourly_rate_usd,
                )
            })
            .collect(),
        ServiceKind::Elb => {
            let lb_type = match resource.sku.trim().to_lowercase().as_str() {
                "nlb" | "network" => "nlb",
                _ => "alb",
            };
            catalog
                .lookup_load_balancer(lb_type)
                .map(|price| {
                    vec![
                        rate("fixed_hourly", "USD/hr", price.fixed_hourly_usd),
                        rate("capacity_unit_hourly", "USD/LCU-hr", price.capacity_unit_hourly_usd),
                    ]
                })
                .unwrap_or_default()
        }
        ServiceKind::Natgw => catalog
            .natgw_price()
            .map(|price| {
                vec![
                    rate("hourly", "USD/hr", price.hourly_usd),
                    rate("data_processed", "USD/GB", price.data_processed_gb_usd),
                ]
            })
            .unwrap_or_default(),
        ServiceKind::Cloudwatch => catalog
            .cloudwatch_rates()
            .map(|rates| {
                let mut components = Vec::new();
                for (name, unit, tiers) in [
                    ("custom_metrics", "USD/metric-month", &rates.custom_metrics),
                    ("log_ingestion", "USD/GB", &rates.log_ingestion_gb),
                    ("log_storage", "USD/GB-month", &rates.log_storage_gb),
                ] {
                    for (index, tier) in tiers.iter().enumerate() {
                        components.push(rate(
                            &format!("{name}_tier{}", index + 1),
                            unit,
                            tier.rate_usd,
                        ));
                    }
                }
                components
            })
            .unwrap_or_default(),
        ServiceKind::Elasticache => {
            let engine = resource.tag("engine").unwrap_or("redis").to_lowercase();
            catalog
                .lookup_cache_node(resource.sku.trim(), &engine)
                .map(|price| vec![rate("node_hourly", "USD/hr", price.hourly_rate_usd)])
                .unwrap_or_default()
        }
        ServiceKind::S3 => catalog
            .lookup_s3_class(resource.sku.trim())
            .or_else(|| catalog.lookup_s3_class("Standard"))
            .map(|price| vec![rate("storage", "USD/GB-month", price.rate_per_gb_month_usd)])
            .unwrap_or_default(),
        ServiceKind::Lambda => catalog
            .lambda_rates()
            .map(|rates| {
                vec![
                    rate("requests_x86_64", "USD/request", rates.x86_64.rate_per_request_usd),
                    rate("duration_x86_64", "USD/GB-second", rates.x86_64.rate_per_gb_second_usd),
                    rate("requests_arm64", "USD/request", rates.arm64.rate_per_request_usd),
                    rate("duration_arm64", "USD/GB-second", rates.arm64.rate_per_gb_second_usd),
                ]
            })
            .unwrap_or_default(),
        ServiceKind::Dynamodb => catalog
            .dynamodb_rates()
            .map(|rates| {
                vec![
                    rate("read_request", "USD/request", rates.read_request_usd),
                    rate("write_request", "USD/request", rates.write_request_usd),
                    rate("rcu_hourly", "USD/RCU-hr", rates.rcu_hour_usd),
                    rate("wcu_hourly", "USD/WCU-hr", rates.wcu_hour_usd),
                    rate("storage", "USD/GB-month", rates.storage_gb_month_usd),
                ]
            })
            .unwrap_or_default(),
        ServiceKind::Rds => {
            let engine = resource.tag("engine").unwrap_or("mysql").to_lowercase();
            let mut components: Vec<RateComponent> = catalog
                .lookup_rds_instance(resource.sku.trim(), &engine)
                .map(|price| vec![rate("instance_hourly", "USD/hr", price.hourly_rate_usd)])
                .unwrap_or_default();
            if let Some(storage) = catalog.lookup_rds_storage("General Purpose") {
                components.push(rate("storage", "USD/GB-month", storage.rate_per_gb_month_usd));
            }
            components
        }
        _ => Vec::new(),
    }
}

fn rate(name: &str, unit: &str, rate_usd: f64) -> RateComponent {
    RateComponent { name: name.to_string(), unit: unit.to_string(), rate_usd }
}
