//! Price-record value types held by the in-memory catalog.

use serde::Serialize;

/// On-demand Linux/Shared-tenancy EC2 instance rate.
#[derive(Debug, Clone, Serialize)]
pub struct InstancePrice {
    pub instance_type: String,
    pub vcpu: u32,
    pub hourly_rate_usd: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VolumePrice {
    pub volume_type: String,
    pub rate_per_gb_month_usd: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DbInstancePrice {
    pub instance_type: String,
    pub engine: String,
    pub deployment_option: String,
    pub hourly_rate_usd: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheNodePrice {
    pub instance_type: String,
    pub engine: String,
    pub hourly_rate_usd: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StorageClassPrice {
    pub storage_class: String,
    pub rate_per_gb_month_usd: f64,
}

/// Request and duration rates for one Lambda architecture.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LambdaArchRates {
    pub rate_per_request_usd: f64,
    pub rate_per_gb_second_usd: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LambdaRates {
    pub x86_64: LambdaArchRates,
    pub arm64: LambdaArchRates,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DynamoDbRates {
    pub read_request_usd: f64,
    pub write_request_usd: f64,
    pub rcu_hour_usd: f64,
    pub wcu_hour_usd: f64,
    pub storage_gb_month_usd: f64,
}

/// Fixed-hourly plus capacity-unit rates for one load balancer type.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadBalancerPrice {
    pub lb_type: String,
    pub fixed_hourly_usd: f64,
    pub capacity_unit_hourly_usd: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NatGatewayPrice {
    pub hourly_usd: f64,
    pub data_processed_gb_usd: f64,
}

/// One step of a tiered rate schedule. `upper_bound` is exclusive;
/// `f64::INFINITY` marks the open-ended final tier.
#[derive(Debug, Clone, Serialize)]
pub struct PriceTier {
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub rate_usd: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CloudWatchRates {
    pub custom_metrics: Vec<PriceTier>,
    pub log_ingestion_gb: Vec<PriceTier>,
    pub log_storage_gb: Vec<PriceTier>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClusterPrice {
    pub support_type: String,
    pub hourly_rate_usd: f64,
}

/// Bill a volume against an ordered tier schedule; each tier charges the
/// portion of the volume that falls inside its bounds.
pub fn tiered_cost(tiers: &[PriceTier], volume: f64) -> f64 {
    tiers
        .iter()
        .map(|tier| {
            let portion = (volume.min(tier.upper_bound) - tier.lower_bound).max(0.0);
            portion * tier.rate_usd
        })
        .sum()
}
