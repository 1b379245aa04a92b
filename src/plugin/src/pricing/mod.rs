//! In-memory pricing catalog.
//!
//! Parsed once per process from the embedded blobs, then read-only. The
//! initializer fans out one worker per service; workers write disjoint
//! indices, so parsing needs no locking, and publication through the
//! `OnceCell` gives readers a happens-before edge on the finished catalog.

mod loader;
mod types;

pub use loader::ParseError;
pub use types::*;

use std::collections::HashMap;

use once_cell::sync::OnceCell;
use thiserror::Error;
use tracing::{info, warn};

use crate::embedded;

static CATALOG: OnceCell<PricingCatalog> = OnceCell::new();

/// Services whose pricing data must parse for the binary to be usable.
/// Everything else degrades to $0 estimates with an explanatory detail.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("pricing data for critical service {service} is corrupted: {message}")]
    Corrupted { service: &'static str, message: String },
}

pub struct PricingCatalog {
    region: String,
    ec2: HashMap<String, InstancePrice>,
    ebs: HashMap<String, VolumePrice>,
    rds: loader::RdsIndex,
    elasticache: HashMap<String, CacheNodePrice>,
    s3: HashMap<String, StorageClassPrice>,
    lambda: Option<LambdaRates>,
    dynamodb: Option<DynamoDbRates>,
    elb: HashMap<String, LoadBalancerPrice>,
    natgw: Option<NatGatewayPrice>,
    cloudwatch: Option<CloudWatchRates>,
    eks: HashMap<String, ClusterPrice>,
}

impl PricingCatalog {
    /// Initialize on first access; at most one initialization succeeds per
    /// process. Critical-service corruption is returned to the caller (and
    /// is fatal at startup).
    pub fn get() -> Result<&'static PricingCatalog, CatalogError> {
        CATALOG.get_or_try_init(Self::initialize)
    }

    fn initialize() -> Result<PricingCatalog, CatalogError> {
        let blobs = embedded::blobs();

        let (ec2, ebs, rds, elasticache, s3, lambda, dynamodb, elb, natgw, cloudwatch, eks) =
            std::thread::scope(|scope| {
                let ec2 = scope.spawn(|| loader::parse_ec2(blobs.ec2));
                let ebs = scope.spawn(|| loader::parse_ebs(blobs.ebs));
                let rds = scope.spawn(|| loader::parse_rds(blobs.rds));
                let elasticache = scope.spawn(|| loader::parse_elasticache(blobs.elasticache));
                let s3 = scope.spawn(|| loader::parse_s3(blobs.s3));
                let lambda = scope.spawn(|| loader::parse_lambda(blobs.lambda));
                let dynamodb = scope.spawn(|| loader::parse_dynamodb(blobs.dynamodb));
                let elb = scope.spawn(|| loader::parse_elb(blobs.elb));
                let natgw = scope.spawn(|| loader::parse_natgw(blobs.natgw));
                let cloudwatch = scope.spawn(|| loader::parse_cloudwatch(blobs.cloudwatch));
                let eks = scope.spawn(|| loader::parse_eks(blobs.eks));

                (
                    join(ec2),
                    join(ebs),
                    join(rds),
                    join(elasticache),
                    join(s3),
                    join(lambda),
                    join(dynamodb),
                    join(elb),
                    join(natgw),
                    join(cloudwatch),
                    join(eks),
                )
            });

        let ec2 = critical("ec2", ec2)?;
        let ebs = critical("ebs", ebs)?;

        let region = match ec2.region.clone().or_else(|| {
            embedded::compiled_region().map(str::to_string)
        }) {
            Some(region) => region,
            None => {
                return Err(CatalogError::Corrupted {
                    service: "ec2",
                    message: "no region tag in EC2 pricing metadata".into(),
                })
            }
        };

        let catalog = PricingCatalog {
            region,
            ec2: ec2.instances,
            ebs,
            rds: non_critical("rds", rds).unwrap_or_default(),
            elasticache: non_critical("elasticache", elasticache).unwrap_or_default(),
            s3: non_critical("s3", s3).unwrap_or_default(),
            lambda: non_critical("lambda", lambda),
            dynamodb: non_critical("dynamodb", dynamodb),
            elb: non_critical("elb", elb).unwrap_or_default(),
            natgw: non_critical("natgw", natgw),
            cloudwatch: non_critical("cloudwatch", cloudwatch),
            eks: non_critical("eks", eks).unwrap_or_default(),
        };

        info!(
            region = %catalog.region,
            ec2_instances = catalog.ec2.len(),
            ebs_volumes = catalog.ebs.len(),
            "pricing catalog initialized"
        );
        Ok(catalog)
    }

    /// Region extracted from EC2 pricing metadata; the authoritative
    /// identifier for mismatch checks.
    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn lookup_ec2_instance(&self, instance_type: &str) -> Option<&InstancePrice> {
        self.ec2.get(instance_type)
    }

    pub fn lookup_ebs_volume(&self, volume_type: &str) -> Option<&VolumePrice> {
        self.ebs.get(volume_type)
    }

    pub fn lookup_rds_instance(&self, instance_type: &str, engine: &str) -> Option<&DbInstancePrice> {
        self.rds
            .instances
            .get(&format!("{instance_type}:{}", engine.to_lowercase()))
    }

    pub fn lookup_rds_storage(&self, volume_type: &str) -> Option<&VolumePrice> {
        self.rds.storage.get(volume_type)
    }

    pub fn lookup_cache_node(&self, instance_type: &str, engine: &str) -> Option<&CacheNodePrice> {
        self.elasticache
            .get(&format!("{instance_type}:{}", engine.to_lowercase()))
    }

    pub fn lookup_s3_class(&self, storage_class: &str) -> Option<&StorageClassPrice> {
        self.s3.get(storage_class)
    }

    pub fn lambda_rates(&self) -> Option<&LambdaRates> {
        self.lambda.as_ref()
    }

    pub fn dynamodb_rates(&self) -> Option<&DynamoDbRates> {
        self.dynamodb.as_ref()
    }

    pub fn lookup_load_balancer(&self, lb_type: &str) -> Option<&LoadBalancerPrice> {
        self.elb.get(lb_type)
    }

    pub fn natgw_price(&self) -> Option<&NatGatewayPrice> {
        self.natgw.as_ref()
    }

    pub fn cloudwatch_rates(&self) -> Option<&CloudWatchRates> {
        self.cloudwatch.as_ref()
    }

    pub fn lookup_eks_cluster(&self, support_type: &str) -> Option<&ClusterPrice> {
        self.eks.get(support_type)
    }

    pub fn ec2_instance_count(&self) -> usize {
        self.ec2.len()
    }
}

fn join<T>(handle: std::thread::ScopedJoinHandle<'_, Result<T, ParseError>>) -> Result<T, ParseError> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(ParseError::Invalid("parser worker panicked".into())),
    }
}

fn critical<T>(service: &'static str, result: Result<T, ParseError>) -> Result<T, CatalogError> {
    result.map_err(|e| CatalogError::Corrupted { service, message: e.to_string() })
}

/// Non-critical blobs degrade: the estimator sees no data and answers $0
/// with an explanatory detail. A user-unusable binary is worse than a
/// degraded one.
fn non_critical<T>(service: &'static str, result: Result<T, ParseError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(service, error = %e, "non-critical pricing blob failed to parse; lookups degrade to $0");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_initializes_from_embedded_blobs() {
        let catalog = PricingCatalog::get().expect("catalog");
        assert!(catalog.ec2_instance_count() > 0);
        assert!(!catalog.region().is_empty());
    }

    #[test]
    fn catalog_is_a_process_singleton() {
        let a = PricingCatalog::get().expect("catalog") as *const PricingCatalog;
        let b = PricingCatalog::get().expect("catalog") as *const PricingCatalog;
        assert_eq!(a, b);
    }

    #[test]
    fn fallback_build_reports_us_east_1() {
        let catalog = PricingCatalog::get().expect("catalog");
        let expected = embedded::compiled_region().unwrap_or("us-east-1");
        assert_eq!(catalog.region(), expected);
    }

    #[test]
    fn known_lookups_resolve() {
        let catalog = PricingCatalog::get().expect("catalog");
        assert!(catalog.lookup_ec2_instance("t3.micro").is_some());
        assert!(catalog.lookup_ebs_volume("gp2").is_some());
        assert!(catalog.lookup_eks_cluster("standard").is_some());
        assert!(catalog.lookup_load_balancer("alb").is_some());
        assert!(catalog.lambda_rates().is_some());
        assert!(catalog.dynamodb_rates().is_some());
        assert!(catalog.natgw_price().is_some());
        assert!(catalog.cloudwatch_rates().is_some());
    }

    #[test]
    fn unknown_lookups_return_none() {
        let catalog = PricingCatalog::get().expect("catalog");
        assert!(catalog.lookup_ec2_instance("does.not.exist").is_none());
        assert!(catalog.lookup_cache_node("cache.t3.micro", "keydb").is_none());
    }

    #[test]
    fn every_indexed_rate_is_positive() {
        let catalog = PricingCatalog::get().expect("catalog");
        assert!(catalog
            .lookup_ec2_instance("t3.micro")
            .is_some_and(|p| p.hourly_rate_usd > 0.0));
        assert!(catalog
            .lookup_ebs_volume("gp3")
            .is_some_and(|p| p.rate_per_gb_month_usd > 0.0));
    }
}
