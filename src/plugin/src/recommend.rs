//! Optimization recommendations: a small rule set over a single resource
//! descriptor. Each rule is independent; unmatched rules contribute nothing.

use serde::{Deserialize, Serialize};

use crate::constants::{DEV_PROFILE_HOURS_PER_MONTH, HOURS_PER_MONTH};
use crate::dispatch::ServiceKind;
use crate::estimators::tags;
use crate::pricing::PricingCatalog;
use crate::resource::{ResourceDescriptor, UsageProfile};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub rule_id: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_monthly_savings: Option<f64>,
}

pub fn recommend(
    resource: &ResourceDescriptor,
    catalog: &PricingCatalog,
    profile: UsageProfile,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();
    match resource.service_kind() {
        ServiceKind::Ebs => {
            if let Some(rec) = gp2_to_gp3(resource, catalog) {
                recommendations.push(rec);
            }
        }
        ServiceKind::Ec2 => {
            if let Some(rec) = previous_generation_instance(resource, catalog) {
                recommendations.push(rec);
            }
            if let Some(rec) = oversized_dev_instance(resource, catalog, profile) {
                recommendations.push(rec);
            }
        }
        ServiceKind::Lambda => {
            if let Some(rec) = lambda_arm64(resource) {
                recommendations.push(rec);
            }
        }
        ServiceKind::Dynamodb => {
            if let Some(rec) = idle_provisioned_table(resource) {
                recommendations.push(rec);
            }
        }
        _ => {}
    }
    recommendations
}

fn gp2_to_gp3(resource: &ResourceDescriptor, catalog: &PricingCatalog) -> Option<Recommendation> {
    if resource.sku.trim() != "gp2" {
        return None;
    }
    let gp2 = catalog.lookup_ebs_volume("gp2")?;
    let gp3 = catalog.lookup_ebs_volume("gp3")?;
    if gp3.rate_per_gb_month_usd >= gp2.rate_per_gb_month_usd {
        return None;
    }
    let size = tags::numeric(resource, &["size", "volume_size"], 8.0).value;
    Some(Recommendation {
        rule_id: "EBS_GP2_TO_GP3".into(),
        description: "gp3 offers the same baseline performance as gp2 at a lower GB-month rate"
            .into(),
        suggested_sku: Some("gp3".into()),
        estimated_monthly_savings: Some(
            (gp2.rate_per_gb_month_usd - gp3.rate_per_gb_month_usd) * size,
        ),
    })
}

fn previous_generation_instance(
    resource: &ResourceDescriptor,
    catalog: &PricingCatalog,
) -> Option<Recommendation> {
    let instance_type = resource.sku.trim();
    let (family, size) = instance_type.split_once('.')?;
    let successor_family = match family {
        "t2" => "t3",
        "m4" => "m5",
        "c4" => "c5",
        "r4" => "r5",
        _ => return None,
    };
    let suggested = format!("{successor_family}.{size}");

    let current = catalog.lookup_ec2_instance(instance_type);
    let upgraded = catalog.lookup_ec2_instance(&suggested);
    let savings = match (current, upgraded) {
        (Some(current), Some(upgraded)) if upgraded.hourly_rate_usd < current.hourly_rate_usd => {
            Some((current.hourly_rate_usd - upgraded.hourly_rate_usd) * HOURS_PER_MONTH)
        }
        _ => None,
    };

    Some(Recommendation {
        rule_id: "EC2_PREVIOUS_GENERATION".into(),
        description: format!(
            "{family} is a previous-generation family; {successor_family} delivers better price/performance"
        ),
        suggested_sku: Some(suggested),
        estimated_monthly_savings: savings,
    })
}

fn lambda_arm64(resource: &ResourceDescriptor) -> Option<Recommendation> {
    let architecture = resource.tag("architecture").unwrap_or("x86_64");
    if architecture.eq_ignore_ascii_case("arm64") {
        return None;
    }
    if tags::numeric(resource, &["requests_per_month"], 0.0).value <= 0.0 {
        return None;
    }
    Some(Recommendation {
        rule_id: "LAMBDA_ARM64".into(),
        description: "arm64 (Graviton) duration pricing is about 20% below x86_64".into(),
        suggested_sku: None,
        estimated_monthly_savings: None,
    })
}

/// A development-profile box at `large` or above is usually idle headroom;
/// suggest the next size down when the catalog actually prices it.
fn oversized_dev_instance(
    resource: &ResourceDescriptor,
    catalog: &PricingCatalog,
    profile: UsageProfile,
) -> Option<Recommendation> {
    if profile != UsageProfile::Development {
        return None;
    }
    let instance_type = resource.sku.trim();
    let (family, size) = instance_type.split_once('.')?;
    let smaller_size = match size {
        "large" => "medium",
        "xlarge" => "large",
        "2xlarge" => "xlarge",
        "4xlarge" => "2xlarge",
        "8xlarge" => "4xlarge",
        "12xlarge" => "8xlarge",
        "16xlarge" => "8xlarge",
        "24xlarge" => "12xlarge",
        _ => return None,
    };
    let suggested = format!("{family}.{smaller_size}");

    let current = catalog.lookup_ec2_instance(instance_type)?;
    let smaller = catalog.lookup_ec2_instance(&suggested)?;
    if smaller.hourly_rate_usd >= current.hourly_rate_usd {
        return None;
    }

    Some(Recommendation {
        rule_id: "EC2_OVERSIZED_DEV_INSTANCE".into(),
        description: format!(
            "{instance_type} under a development usage profile; dev workloads rarely need more than a {smaller_size}"
        ),
        suggested_sku: Some(suggested),
        estimated_monthly_savings: Some(
            (current.hourly_rate_usd - smaller.hourly_rate_usd) * DEV_PROFILE_HOURS_PER_MONTH,
        ),
    })
}

fn idle_provisioned_table(resource: &ResourceDescriptor) -> Option<Recommendation> {
    if !resource.sku.trim().eq_ignore_ascii_case("provisioned") {
        return None;
    }
    let rcu = tags::numeric(resource, &["rcu", "read_capacity_units"], 0.0).value;
    let wcu = tags::numeric(resource, &["wcu", "write_capacity_units"], 0.0).value;
    if rcu > 0.0 || wcu > 0.0 {
        return None;
    }
    Some(Recommendation {
        rule_id: "DYNAMODB_ON_DEMAND".into(),
        description:
            "provisioned table with zero capacity units; on-demand mode bills only for actual requests"
                .into(),
        suggested_sku: Some("on-demand".into()),
        estimated_monthly_savings: None,
    })
}
