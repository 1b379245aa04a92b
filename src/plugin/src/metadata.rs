//! Response enrichment: growth-type classification and lineage derivation.
//! Both are hints consumed by the orchestrator for forecasting and
//! blast-radius visualization.

use serde::{Deserialize, Serialize};

use crate::dispatch::ServiceKind;
use crate::resource::ResourceDescriptor;

/// Whether a service's spend tends to stay flat or grow with stored volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrowthType {
    Static,
    Linear,
    Unspecified,
}

pub fn growth_type(kind: ServiceKind) -> GrowthType {
    match kind {
        ServiceKind::Ec2
        | ServiceKind::Ebs
        | ServiceKind::Eks
        | ServiceKind::Elb
        | ServiceKind::Natgw
        | ServiceKind::Cloudwatch
        | ServiceKind::Elasticache
        | ServiceKind::Rds => GrowthType::Static,
        ServiceKind::S3 | ServiceKind::Dynamodb => GrowthType::Linear,
        _ => GrowthType::Unspecified,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineageRelation {
    AttachedTo,
    ManagedBy,
    Within,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lineage {
    pub relation: LineageRelation,
    pub parent: String,
}

/// Parent-child relation derived from tags, in priority order:
/// an attaching instance beats a managing cluster beats the enclosing
/// network.
pub fn lineage(resource: &ResourceDescriptor) -> Option<Lineage> {
    if let Some(instance_id) = resource.tag("instance_id") {
        return Some(Lineage {
            relation: LineageRelation::AttachedTo,
            parent: instance_id.to_string(),
        });
    }
    if let Some(cluster) = resource.tag("cluster_name") {
        return Some(Lineage {
            relation: LineageRelation::ManagedBy,
            parent: cluster.to_string(),
        });
    }
    if let Some(network) = resource.first_tag(&["vpc_id", "subnet_id"]) {
        return Some(Lineage {
            relation: LineageRelation::Within,
            parent: network.to_string(),
        });
    }
    None
}
