//! CCF instance power coefficients, embedded as delimited text.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::warn;

/// Per-vCPU power draw bounds for one instance type.
#[derive(Debug, Clone)]
pub struct InstancePowerSpec {
    pub instance_type: String,
    pub vcpu_count: u32,
    pub min_watts_per_vcpu: f64,
    pub max_watts_per_vcpu: f64,
}

/// CCF averages, applied when an instance type is missing from the table.
pub const AVERAGE_MIN_WATTS: f64 = 0.74;
pub const AVERAGE_MAX_WATTS: f64 = 3.50;

const RAW_TABLE: &str = include_str!("../../data/ccf/instance_power.csv");

static TABLE: Lazy<HashMap<String, InstancePowerSpec>> = Lazy::new(|| parse_table(RAW_TABLE));

pub fn lookup(instance_type: &str) -> Option<&'static InstancePowerSpec> {
    TABLE.get(instance_type)
}

/// Spec for an instance type absent from the table: CCF average wattage at
/// the caller-supplied vCPU count (taken from pricing metadata).
pub fn default_spec(instance_type: &str, vcpu_count: u32) -> InstancePowerSpec {
    InstancePowerSpec {
        instance_type: instance_type.to_string(),
        vcpu_count: vcpu_count.max(1),
        min_watts_per_vcpu: AVERAGE_MIN_WATTS,
        max_watts_per_vcpu: AVERAGE_MAX_WATTS,
    }
}

fn parse_table(raw: &str) -> HashMap<String, InstancePowerSpec> {
    let mut table = HashMap::new();
    for line in raw.lines().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        let parsed = (|| {
            let [instance_type, vcpu, min_watts, max_watts] = fields.as_slice() else {
                return None;
            };
            Some(InstancePowerSpec {
                instance_type: instance_type.to_string(),
                vcpu_count: vcpu.parse().ok()?,
                min_watts_per_vcpu: min_watts.parse().ok()?,
                max_watts_per_vcpu: max_watts.parse().ok()?,
            })
        })();
        match parsed {
            Some(spec) => {
                table.insert(spec.instance_type.clone(), spec);
            }
            None => warn!(line, "skipping malformed instance power row"),
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_parses_and_contains_common_types() {
        assert!(lookup("t3.micro").is_some());
        assert!(lookup("m5.large").is_some());
        assert!(lookup("p3.2xlarge").is_some());
    }

    #[test]
    fn every_row_satisfies_the_power_invariants() {
        for spec in TABLE.values() {
            assert!(spec.vcpu_count >= 1, "{}: vcpu < 1", spec.instance_type);
            assert!(
                spec.min_watts_per_vcpu >= 0.0,
                "{}: negative min watts",
                spec.instance_type
            );
            assert!(
                spec.min_watts_per_vcpu <= spec.max_watts_per_vcpu,
                "{}: min watts above max",
                spec.instance_type
            );
        }
    }

    #[test]
    fn default_spec_uses_ccf_averages() {
        let spec = default_spec("z99.mega", 16);
        assert_eq!(spec.vcpu_count, 16);
        assert_eq!(spec.min_watts_per_vcpu, AVERAGE_MIN_WATTS);
        assert_eq!(spec.max_watts_per_vcpu, AVERAGE_MAX_WATTS);
    }

    #[test]
    fn default_spec_clamps_vcpus_to_at_least_one() {
        assert_eq!(default_spec("tiny", 0).vcpu_count, 1);
    }
}
