//! GPU TDP table for accelerated instance families.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct GpuSpec {
    pub instance_type: String,
    pub gpu_model: String,
    pub gpu_count: u32,
    pub tdp_per_gpu_watts: f64,
}

const RAW_TABLE: &str = include_str!("../../data/ccf/gpu_specs.csv");

static TABLE: Lazy<HashMap<String, GpuSpec>> = Lazy::new(|| parse_table(RAW_TABLE));

pub fn lookup(instance_type: &str) -> Option<&'static GpuSpec> {
    TABLE.get(instance_type)
}

fn parse_table(raw: &str) -> HashMap<String, GpuSpec> {
    let mut table = HashMap::new();
    for line in raw.lines().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        let parsed = (|| {
            let [instance_type, gpu_model, gpu_count, tdp_watts] = fields.as_slice() else {
                return None;
            };
            Some(GpuSpec {
                instance_type: instance_type.to_string(),
                gpu_model: gpu_model.to_string(),
                gpu_count: gpu_count.parse().ok()?,
                tdp_per_gpu_watts: tdp_watts.parse().ok()?,
            })
        })();
        match parsed {
            Some(spec) => {
                table.insert(spec.instance_type.clone(), spec);
            }
            None => warn!(line, "skipping malformed GPU spec row"),
        }
    }
    table
}
