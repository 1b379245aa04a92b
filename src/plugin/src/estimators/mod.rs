//! Per-service cost formulas.
//!
//! Estimators read the catalog and answer every expected data gap (unknown
//! SKU, missing tag, degraded non-critical service) with a $0 success and an
//! explanatory billing detail. Only structural problems - a missing SKU
//! where one is mandated - surface as errors.

pub mod tags;

mod cloudwatch;
mod dynamodb;
mod ebs;
mod ec2;
mod eks;
mod elasticache;
mod elb;
mod lambda;
mod natgw;
mod rds;
mod s3;

use thiserror::Error;

use crate::constants::{DEV_PROFILE_HOURS_PER_MONTH, HOURS_PER_MONTH};
use crate::dispatch::ServiceKind;
use crate::pricing::PricingCatalog;
use crate::resource::{ResourceDescriptor, UsageProfile};

#[derive(Debug, Clone)]
pub struct CostEstimate {
    /// Rate for the service's primary billing dimension (hourly rate,
    /// GB-month rate, ...). Zero when no rate applies.
    pub unit_price: f64,
    pub cost_per_month: f64,
    pub billing_detail: String,
}

impl CostEstimate {
    pub fn new(unit_price: f64, cost_per_month: f64, billing_detail: impl Into<String>) -> Self {
        Self { unit_price, cost_per_month, billing_detail: billing_detail.into() }
    }

    pub fn zero(billing_detail: impl Into<String>) -> Self {
        Self::new(0.0, 0.0, billing_detail)
    }
}

#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("{service} resources require a SKU ({role})")]
    MissingSku { service: ServiceKind, role: &'static str },
}

/// Route a normalized resource to its service estimator and apply the usage
/// profile. The caller has already verified the region.
pub fn project(
    resource: &ResourceDescriptor,
    catalog: &PricingCatalog,
    profile: UsageProfile,
) -> Result<CostEstimate, EstimateError> {
    let kind = resource.service_kind();

    if kind.is_free() {
        return Ok(CostEstimate::zero(format!(
            "{kind} resources carry no direct charge"
        )));
    }

    let mut estimate = match kind {
        ServiceKind::Ec2 => ec2::estimate(resource, catalog)?,
        ServiceKind::Ebs => ebs::estimate(resource, catalog)?,
        ServiceKind::Eks => eks::estimate(resource, catalog),
        ServiceKind::Elb => elb::estimate(resource, catalog),
        ServiceKind::Natgw => natgw::estimate(resource, catalog),
        ServiceKind::Cloudwatch => cloudwatch::estimate(resource, catalog),
        ServiceKind::Elasticache => elasticache::estimate(resource, catalog)?,
        ServiceKind::S3 => s3::estimate(resource, catalog),
        ServiceKind::Lambda => lambda::estimate(resource, catalog),
        ServiceKind::Dynamodb => dynamodb::estimate(resource, catalog),
        ServiceKind::Rds => rds::estimate(resource, catalog)?,
        // Free kinds short-circuited above.
        ServiceKind::Vpc | ServiceKind::Subnet | ServiceKind::SecurityGroup => {
            CostEstimate::zero(format!("{kind} resources carry no direct charge"))
        }
        ServiceKind::Unknown => CostEstimate::zero(format!(
            "unrecognized resource type \"{}\"",
            resource.resource_type
        )),
    };

    if profile == UsageProfile::Development && kind.is_time_based() && estimate.cost_per_month > 0.0
    {
        let scale = DEV_PROFILE_HOURS_PER_MONTH / HOURS_PER_MONTH;
        estimate.cost_per_month *= scale;
        estimate.billing_detail.push_str(" (dev profile)");
    }

    Ok(estimate)
}
