//! Environmental-impact estimation, following the Cloud Carbon Footprint
//! methodology: operational carbon from coefficient tables and regional grid
//! factors, embodied carbon amortized over server lifespan.

pub mod compute;
pub mod embodied;
pub mod gpu;
pub mod grid;
pub mod power;
pub mod storage;

use serde::{Deserialize, Serialize};

use crate::constants::{HOURS_PER_MONTH, LAMBDA_ARM_FACTOR, LAMBDA_MB_PER_VCPU, PUE};
use crate::dispatch::ServiceKind;
use crate::estimators::tags;
use crate::pricing::PricingCatalog;
use crate::resource::ResourceDescriptor;

use compute::OperationalCarbon;
use storage::StorageTechnology;

pub const METRIC_KIND_CARBON_FOOTPRINT: &str = "carbon-footprint";
pub const METRIC_KIND_EMBODIED_CARBON: &str = "embodied-carbon";
pub const METRIC_KIND_ENERGY: &str = "energy";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactMetric {
    pub kind: String,
    pub value: f64,
    pub unit: String,
}

impl ImpactMetric {
    fn carbon_grams(value: f64) -> Self {
        Self { kind: METRIC_KIND_CARBON_FOOTPRINT.into(), value, unit: "gCO2e".into() }
    }

    fn embodied_grams(value: f64) -> Self {
        Self { kind: METRIC_KIND_EMBODIED_CARBON.into(), value, unit: "gCO2e".into() }
    }

    fn energy_kwh(value: f64) -> Self {
        Self { kind: METRIC_KIND_ENERGY.into(), value, unit: "kWh".into() }
    }
}

/// Monthly impact metrics for a resource, or an empty list for services
/// without a carbon model. Utilization priority: per-resource tag over the
/// request-level value over the CCF default of 50%.
pub fn estimate(
    resource: &ResourceDescriptor,
    catalog: &PricingCatalog,
    request_utilization_pct: Option<f64>,
) -> Vec<ImpactMetric> {
    let kind = resource.service_kind();
    if !kind.supports_carbon() {
        return Vec::new();
    }

    let grid_factor = grid::factor(&resource.region);
    let utilization = resolve_utilization(resource, request_utilization_pct);

    match kind {
        ServiceKind::Ec2 => instance_metrics(&resource.sku, 1.0, utilization, grid_factor, catalog),
        ServiceKind::Elasticache => {
            // Cache nodes are EC2 machines behind a `cache.` prefix.
            let analogue = resource.sku.trim().trim_start_matches("cache.").to_string();
            let nodes = tags::numeric(resource, &["num_cache_clusters", "num_nodes", "nodes"], 1.0);
            instance_metrics(&analogue, nodes.value, utilization, grid_factor, catalog)
        }
        ServiceKind::Rds => rds_metrics(resource, utilization, grid_factor, catalog),
        ServiceKind::Lambda => lambda_metrics(resource, grid_factor),
        ServiceKind::Ebs => {
            let size = tags::numeric(resource, &["size", "volume_size"], 8.0);
            let technology = match resource.sku.trim() {
                "st1" | "sc1" | "standard" => StorageTechnology::Hdd,
                _ => StorageTechnology::Ssd,
            };
            storage_metrics(size.value, technology, 2.0, grid_factor)
        }
        ServiceKind::S3 => {
            let size = tags::numeric(resource, &["size"], 1.0);
            let replication = match resource.sku.trim().to_lowercase().replace('-', "_").as_str() {
                "onezone_ia" | "one_zone_ia" => 1.0,
                _ => 3.0,
            };
            storage_metrics(size.value, StorageTechnology::Hdd, replication, grid_factor)
        }
        ServiceKind::Dynamodb => {
            let size = tags::numeric(resource, &["storage_gb"], 0.0);
            storage_metrics(size.value, StorageTechnology::Ssd, 3.0, grid_factor)
        }
        // The control plane is shared and multi-tenant; worker nodes carry
        // the carbon and are estimated as EC2 instances.
        ServiceKind::Eks => vec![ImpactMetric::carbon_grams(0.0)],
        _ => Vec::new(),
    }
}

fn resolve_utilization(resource: &ResourceDescriptor, request_pct: Option<f64>) -> f64 {
    let pct = resource
        .tag("utilization_percentage")
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .or(request_pct)
        .unwrap_or(50.0);
    (pct / 100.0).clamp(0.0, 1.0)
}

fn instance_metrics(
    instance_type: &str,
    node_count: f64,
    utilization: f64,
    grid_factor: f64,
    catalog: &PricingCatalog,
) -> Vec<ImpactMetric> {
    let instance_type = instance_type.trim();
    if instance_type.is_empty() {
        return Vec::new();
    }

    let power_spec = match power::lookup(instance_type) {
        Some(spec) => spec.clone(),
        None => {
            let vcpu = catalog
                .lookup_ec2_instance(instance_type)
                .map(|price| price.vcpu)
                .unwrap_or(1);
            power::default_spec(instance_type, vcpu)
        }
    };
    let gpu_spec = gpu::lookup(instance_type);

    let operational = compute::operational(
        &power_spec,
        gpu_spec,
        utilization,
        HOURS_PER_MONTH,
        grid_factor,
    );
    let embodied_g =
        embodied::embodied_kg(instance_type, power_spec.vcpu_count, HOURS_PER_MONTH) * 1000.0;

    vec![
        ImpactMetric::carbon_grams(operational.carbon_grams * node_count),
        ImpactMetric::embodied_grams(embodied_g * node_count),
        ImpactMetric::energy_kwh(operational.energy_kwh * node_count),
    ]
}

fn rds_metrics(
    resource: &ResourceDescriptor,
    utilization: f64,
    grid_factor: f64,
    catalog: &PricingCatalog,
) -> Vec<ImpactMetric> {
    let analogue = resource.sku.trim().trim_start_matches("db.").to_string();
    if analogue.is_empty() {
        return Vec::new();
    }
    let multi_az = resource
        .tag("multi_az")
        .is_some_and(|v| v.eq_ignore_ascii_case("true"));
    let az_factor = if multi_az { 2.0 } else { 1.0 };

    let mut metrics = instance_metrics(&analogue, az_factor, utilization, grid_factor, catalog);

    let size = tags::numeric(resource, &["allocated_storage", "storage_gb"], 20.0);
    let storage = storage::operational(
        size.value * az_factor,
        HOURS_PER_MONTH,
        StorageTechnology::Ssd,
        2.0,
        grid_factor,
    );
    for metric in &mut metrics {
        match metric.kind.as_str() {
            METRIC_KIND_CARBON_FOOTPRINT => metric.value += storage.carbon_grams,
            METRIC_KIND_ENERGY => metric.value += storage.energy_kwh,
            _ => {}
        }
    }
    metrics
}

/// Serverless compute: memory maps to vCPU-equivalents at 1792 MB per vCPU,
/// runtime is invocation count times duration, utilization is fixed at 50%.
fn lambda_metrics(resource: &ResourceDescriptor, grid_factor: f64) -> Vec<ImpactMetric> {
    let memory_mb = tags::numeric(resource, &["memory_mb"], 128.0).value;
    let invocations = tags::numeric(resource, &["requests_per_month"], 0.0).value;
    let duration_ms = tags::numeric(resource, &["avg_duration_ms"], 100.0).value;
    let arm = resource
        .tag("architecture")
        .is_some_and(|arch| arch.eq_ignore_ascii_case("arm64"));

    let vcpu_equivalent = memory_mb / LAMBDA_MB_PER_VCPU;
    let running_hours = duration_ms * invocations / 3_600_000.0;

    let avg_watts = power::AVERAGE_MIN_WATTS
        + 0.5 * (power::AVERAGE_MAX_WATTS - power::AVERAGE_MIN_WATTS);
    let mut energy_kwh = avg_watts * vcpu_equivalent * running_hours / 1000.0 * PUE;
    if arm {
        energy_kwh *= LAMBDA_ARM_FACTOR;
    }

    let carbon = OperationalCarbon {
        energy_kwh,
        carbon_grams: energy_kwh * grid_factor * 1_000_000.0,
    };
    vec![
        ImpactMetric::carbon_grams(carbon.carbon_grams),
        ImpactMetric::energy_kwh(carbon.energy_kwh),
    ]
}

fn storage_metrics(
    size_gb: f64,
    technology: StorageTechnology,
    replication: f64,
    grid_factor: f64,
) -> Vec<ImpactMetric> {
    let result = storage::operational(size_gb, HOURS_PER_MONTH, technology, replication, grid_factor);
    vec![
        ImpactMetric::carbon_grams(result.carbon_grams),
        ImpactMetric::energy_kwh(result.energy_kwh),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> &'static PricingCatalog {
        PricingCatalog::get().expect("catalog")
    }

    fn resource(resource_type: &str, sku: &str, tags: &[(&str, &str)]) -> ResourceDescriptor {
        let mut resource = ResourceDescriptor {
            resource_type: resource_type.into(),
            sku: sku.into(),
            region: "us-east-1".into(),
            ..Default::default()
        };
        for (key, value) in tags {
            resource.tags.insert(key.to_string(), value.to_string());
        }
        resource
    }

    fn metric(metrics: &[ImpactMetric], kind: &str) -> f64 {
        metrics.iter().find(|m| m.kind == kind).map(|m| m.value).unwrap_or(f64::NAN)
    }

    #[test]
    fn t3_micro_monthly_carbon_lands_in_the_expected_band() {
        let metrics = estimate(&resource("ec2", "t3.micro", &[]), catalog(), None);
        let carbon = metric(&metrics, METRIC_KIND_CARBON_FOOTPRINT);
        assert!(carbon > 500.0 && carbon < 5000.0, "got {carbon} g");
        assert_eq!(
            metrics.iter().find(|m| m.kind == METRIC_KIND_CARBON_FOOTPRINT).unwrap().unit,
            "gCO2e"
        );
    }

    #[test]
    fn utilization_tag_overrides_the_request_level_value() {
        let low = estimate(
            &resource("ec2", "m5.large", &[("utilization_percentage", "10")]),
            catalog(),
            Some(90.0),
        );
        let high = estimate(&resource("ec2", "m5.large", &[]), catalog(), Some(90.0));
        assert!(
            metric(&low, METRIC_KIND_CARBON_FOOTPRINT)
                < metric(&high, METRIC_KIND_CARBON_FOOTPRINT)
        );
    }

    #[test]
    fn carbon_is_monotone_in_request_utilization() {
        let mut previous = -1.0;
        for pct in [0.0, 25.0, 50.0, 75.0, 100.0] {
            let metrics = estimate(&resource("ec2", "m5.large", &[]), catalog(), Some(pct));
            let carbon = metric(&metrics, METRIC_KIND_CARBON_FOOTPRINT);
            assert!(carbon >= previous);
            previous = carbon;
        }
    }

    #[test]
    fn gpu_instances_emit_more_than_their_cpu_baseline() {
        let gpu = estimate(&resource("ec2", "p3.2xlarge", &[]), catalog(), None);
        let cpu = estimate(&resource("ec2", "m5.2xlarge", &[]), catalog(), None);
        assert!(
            metric(&gpu, METRIC_KIND_CARBON_FOOTPRINT)
                > metric(&cpu, METRIC_KIND_CARBON_FOOTPRINT)
        );
    }

    #[test]
    fn lambda_with_zero_invocations_is_zero_carbon() {
        let metrics = estimate(&resource("lambda", "", &[]), catalog(), None);
        assert_eq!(metric(&metrics, METRIC_KIND_CARBON_FOOTPRINT), 0.0);
    }

    #[test]
    fn arm64_lambda_discounts_energy_by_a_fifth() {
        let tags = [
            ("memory_mb", "1792"),
            ("requests_per_month", "1000000"),
            ("avg_duration_ms", "1000"),
        ];
        let x86 = estimate(&resource("lambda", "", &tags), catalog(), None);
        let mut arm_tags = tags.to_vec();
        arm_tags.push(("architecture", "arm64"));
        let arm = estimate(&resource("lambda", "", &arm_tags), catalog(), None);
        let ratio = metric(&arm, METRIC_KIND_ENERGY) / metric(&x86, METRIC_KIND_ENERGY);
        assert!((ratio - LAMBDA_ARM_FACTOR).abs() < 1e-9);
    }

    #[test]
    fn multi_az_rds_doubles_the_estimate() {
        let single = estimate(&resource("rds", "db.m5.large", &[]), catalog(), None);
        let multi = estimate(
            &resource("rds", "db.m5.large", &[("multi_az", "true")]),
            catalog(),
            None,
        );
        let ratio = metric(&multi, METRIC_KIND_CARBON_FOOTPRINT)
            / metric(&single, METRIC_KIND_CARBON_FOOTPRINT);
        assert!((ratio - 2.0).abs() < 1e-9);
    }

    #[test]
    fn elasticache_scales_with_node_count() {
        let one = estimate(&resource("elasticache", "cache.m5.large", &[]), catalog(), None);
        let three = estimate(
            &resource("elasticache", "cache.m5.large", &[("num_nodes", "3")]),
            catalog(),
            None,
        );
        let ratio = metric(&three, METRIC_KIND_CARBON_FOOTPRINT)
            / metric(&one, METRIC_KIND_CARBON_FOOTPRINT);
        assert!((ratio - 3.0).abs() < 1e-9);
    }

    #[test]
    fn eks_control_plane_reports_zero_carbon() {
        let metrics = estimate(&resource("eks", "", &[]), catalog(), None);
        assert_eq!(metric(&metrics, METRIC_KIND_CARBON_FOOTPRINT), 0.0);
    }

    #[test]
    fn zero_cost_network_kinds_have_no_metrics() {
        assert!(estimate(&resource("vpc", "", &[]), catalog(), None).is_empty());
        assert!(estimate(&resource("elb", "alb", &[]), catalog(), None).is_empty());
    }
}
