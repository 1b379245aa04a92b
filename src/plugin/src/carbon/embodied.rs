//! Embodied carbon: manufacturing emissions amortized over the server's
//! lifespan and attributed by the instance's share of the host.

use crate::constants::{EMBODIED_KG_PER_SERVER, HOURS_PER_MONTH, SERVER_LIFESPAN_MONTHS};

/// Largest instance size per family, in vCPUs. An instance's host share is
/// its vCPU count over this number. Unknown families get full share (the
/// conservative upper bound).
fn family_max_vcpus(family: &str) -> Option<f64> {
    let max = match family {
        "t2" | "t3" | "t3a" | "t4g" => 8.0,
        "m5" | "m5a" | "c5" | "c5a" | "r5" | "r5a" => 96.0,
        "m6i" | "c6i" | "r6i" | "x2idn" => 128.0,
        "m6g" | "c6g" | "r6g" | "m7g" | "c7g" => 64.0,
        "i3" | "p3" => 64.0,
        "p4d" | "g4dn" => 96.0,
        "g5" => 192.0,
        _ => return None,
    };
    Some(max)
}

fn family_of(instance_type: &str) -> &str {
    instance_type.split('.').next().unwrap_or(instance_type)
}

/// Embodied kilograms CO2e attributed to `hours` of runtime.
pub fn embodied_kg(instance_type: &str, instance_vcpus: u32, hours: f64) -> f64 {
    let months = hours / HOURS_PER_MONTH;
    let monthly_per_server = EMBODIED_KG_PER_SERVER / SERVER_LIFESPAN_MONTHS;
    let vcpu_share = match family_max_vcpus(family_of(instance_type)) {
        Some(max) => (f64::from(instance_vcpus) / max).min(1.0),
        None => 1.0,
    };
    monthly_per_server * vcpu_share * months
}
