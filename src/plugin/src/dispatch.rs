//! Resource-type normalization.
//!
//! Every handler that needs a service tag goes through [`ServiceKind::normalize`].
//! Projected-cost, actual-cost, pricing-spec and recommendations must never
//! re-implement this mapping; the closed enum is the single dispatch authority.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceKind {
    Ec2,
    Ebs,
    Eks,
    S3,
    Lambda,
    Rds,
    Dynamodb,
    Elasticache,
    Elb,
    Natgw,
    Cloudwatch,
    Vpc,
    Subnet,
    SecurityGroup,
    Unknown,
}

impl ServiceKind {
    /// Normalize a resource-type string, accepting both the legacy short form
    /// (`"ec2"`, `"natGateway"`) and the qualified Pulumi form
    /// (`"aws:ec2/instance:Instance"`). Idempotent: normalizing a canonical
    /// tag yields the same kind.
    pub fn normalize(resource_type: &str) -> Self {
        let lowered = resource_type.trim().to_lowercase();

        if let Some(rest) = lowered.strip_prefix("aws:") {
            let (module, kind) = match rest.split_once('/') {
                Some((module, rest)) => {
                    (module, rest.split(':').next().unwrap_or(rest))
                }
                None => (rest, ""),
            };
            return Self::from_module_and_kind(module, kind);
        }

        Self::from_alias(&lowered)
    }

    fn from_module_and_kind(module: &str, kind: &str) -> Self {
        match module {
            // The ec2 Pulumi module also hosts the zero-cost network
            // primitives and NAT gateways.
            "ec2" => match kind {
                "vpc" => Self::Vpc,
                "subnet" => Self::Subnet,
                "securitygroup" => Self::SecurityGroup,
                "natgateway" => Self::Natgw,
                "volume" => Self::Ebs,
                _ => Self::Ec2,
            },
            "ebs" => Self::Ebs,
            "eks" => Self::Eks,
            "s3" => Self::S3,
            "lambda" => Self::Lambda,
            "rds" => Self::Rds,
            "dynamodb" => Self::Dynamodb,
            "elasticache" => Self::Elasticache,
            "lb" | "alb" | "elb" | "elasticloadbalancing" | "elasticloadbalancingv2" => Self::Elb,
            "cloudwatch" => Self::Cloudwatch,
            "vpc" => match kind {
                "natgateway" => Self::Natgw,
                _ => Self::Vpc,
            },
            _ => Self::Unknown,
        }
    }

    fn from_alias(tag: &str) -> Self {
        match tag {
            "ec2" | "instance" => Self::Ec2,
            "ebs" | "volume" => Self::Ebs,
            "eks" => Self::Eks,
            "s3" | "bucket" => Self::S3,
            "lambda" => Self::Lambda,
            "rds" => Self::Rds,
            "dynamodb" | "dynamo" => Self::Dynamodb,
            "elasticache" => Self::Elasticache,
            "elb" | "alb" | "nlb" | "lb" | "loadbalancer" | "load-balancer" => Self::Elb,
            "natgw" | "natgateway" | "nat-gateway" | "nat_gateway" => Self::Natgw,
            "cloudwatch" | "cloudwatch-logs" => Self::Cloudwatch,
            "vpc" => Self::Vpc,
            "subnet" => Self::Subnet,
            "security-group" | "security_group" | "securitygroup" | "sg" => Self::SecurityGroup,
            _ => Self::Unknown,
        }
    }

    /// Canonical short tag, round-trippable through [`Self::normalize`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ec2 => "ec2",
            Self::Ebs => "ebs",
            Self::Eks => "eks",
            Self::S3 => "s3",
            Self::Lambda => "lambda",
            Self::Rds => "rds",
            Self::Dynamodb => "dynamodb",
            Self::Elasticache => "elasticache",
            Self::Elb => "elb",
            Self::Natgw => "natgw",
            Self::Cloudwatch => "cloudwatch",
            Self::Vpc => "vpc",
            Self::Subnet => "subnet",
            Self::SecurityGroup => "security-group",
            Self::Unknown => "unknown",
        }
    }

    /// Network primitives that always price at $0.
    pub fn is_free(&self) -> bool {
        matches!(self, Self::Vpc | Self::Subnet | Self::SecurityGroup)
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Services billed per running hour; the dev usage profile scales these.
    pub fn is_time_based(&self) -> bool {
        matches!(
            self,
            Self::Ec2 | Self::Eks | Self::Elb | Self::Natgw | Self::Elasticache | Self::Rds
        )
    }

    /// Services for which a carbon estimate is advertised and produced.
    pub fn supports_carbon(&self) -> bool {
        matches!(
            self,
            Self::Ec2
                | Self::Ebs
                | Self::S3
                | Self::Lambda
                | Self::Rds
                | Self::Dynamodb
                | Self::Elasticache
                | Self::Eks
        )
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ec2", ServiceKind::Ec2)]
    #[case("aws:ec2/instance:Instance", ServiceKind::Ec2)]
    #[case("aws:ebs/volume:Volume", ServiceKind::Ebs)]
    #[case("aws:ec2/vpc:Vpc", ServiceKind::Vpc)]
    #[case("aws:ec2/subnet:Subnet", ServiceKind::Subnet)]
    #[case("aws:ec2/securityGroup:SecurityGroup", ServiceKind::SecurityGroup)]
    #[case("aws:ec2/natGateway:NatGateway", ServiceKind::Natgw)]
    #[case("natGateway", ServiceKind::Natgw)]
    #[case("nat_gateway", ServiceKind::Natgw)]
    #[case("aws:s3/bucketV2:BucketV2", ServiceKind::S3)]
    #[case("aws:lambda/function:Function", ServiceKind::Lambda)]
    #[case("aws:rds/instance:Instance", ServiceKind::Rds)]
    #[case("aws:dynamodb/table:Table", ServiceKind::Dynamodb)]
    #[case("aws:elasticache/replicationGroup:ReplicationGroup", ServiceKind::Elasticache)]
    #[case("aws:lb/loadBalancer:LoadBalancer", ServiceKind::Elb)]
    #[case("aws:cloudwatch/logGroup:LogGroup", ServiceKind::Cloudwatch)]
    #[case("aws:eks/cluster:Cluster", ServiceKind::Eks)]
    #[case("eks", ServiceKind::Eks)]
    #[case("aws:sagemaker/endpoint:Endpoint", ServiceKind::Unknown)]
    #[case("gibberish", ServiceKind::Unknown)]
    fn normalizes_short_and_qualified_forms(#[case] input: &str, #[case] expected: ServiceKind) {
        assert_eq!(ServiceKind::normalize(input), expected);
    }

    #[test]
    fn normalize_is_idempotent() {
        let inputs = [
            "ec2",
            "aws:ec2/instance:Instance",
            "aws:lb/loadBalancer:LoadBalancer",
            "natGateway",
            "aws:ec2/securityGroup:SecurityGroup",
            "unknown-thing",
        ];
        for input in inputs {
            let once = ServiceKind::normalize(input);
            let twice = ServiceKind::normalize(once.as_str());
            assert_eq!(once, twice, "{input} did not normalize idempotently");
        }
    }

    #[test]
    fn free_kinds_are_marked() {
        assert!(ServiceKind::Vpc.is_free());
        assert!(ServiceKind::Subnet.is_free());
        assert!(ServiceKind::SecurityGroup.is_free());
        assert!(!ServiceKind::Ec2.is_free());
    }
}
