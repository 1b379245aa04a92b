//! Operational carbon for CPU (and optionally GPU) compute.

use crate::constants::PUE;

use super::gpu::GpuSpec;
use super::power::InstancePowerSpec;

#[derive(Debug, Clone, Copy, Default)]
pub struct OperationalCarbon {
    pub energy_kwh: f64,
    pub carbon_grams: f64,
}

/// CCF compute formula: linear interpolation between idle and full-load
/// per-vCPU wattage, GPU TDP added proportionally to utilization, datacenter
/// overhead applied through PUE, grid factor converts kWh to grams.
pub fn operational(
    power: &InstancePowerSpec,
    gpu: Option<&GpuSpec>,
    utilization: f64,
    hours: f64,
    grid_factor: f64,
) -> OperationalCarbon {
    let utilization = utilization.clamp(0.0, 1.0);

    let avg_watts_per_vcpu = power.min_watts_per_vcpu
        + utilization * (power.max_watts_per_vcpu - power.min_watts_per_vcpu);
    let cpu_energy_kwh = avg_watts_per_vcpu * f64::from(power.vcpu_count) * hours / 1000.0;

    let gpu_energy_kwh = gpu
        .map(|gpu| f64::from(gpu.gpu_count) * gpu.tdp_per_gpu_watts * utilization * hours / 1000.0)
        .unwrap_or(0.0);

    let energy_kwh = (cpu_energy_kwh + gpu_energy_kwh) * PUE;
    OperationalCarbon {
        energy_kwh,
        carbon_grams: energy_kwh * grid_factor * 1_000_000.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carbon::power;

    fn spec(vcpu: u32, min: f64, max: f64) -> InstancePowerSpec {
        InstancePowerSpec {
            instance_type: "test".into(),
            vcpu_count: vcpu,
            min_watts_per_vcpu: min,
            max_watts_per_vcpu: max,
        }
    }

    #[test]
    fn formula_matches_a_hand_computed_case() {
        // 2 vCPUs at 1.0-3.0 W, 50% load, 100 h, 0.0004 mt/kWh:
        // avg 2 W/vCPU -> 4 W -> 0.4 kWh -> 0.454 kWh with PUE -> 181.6 g.
        let result = operational(&spec(2, 1.0, 3.0), None, 0.5, 100.0, 0.0004);
        assert!((result.energy_kwh - 0.454).abs() < 1e-9);
        assert!((result.carbon_grams - 181.6).abs() < 1e-6);
    }

    #[test]
    fn carbon_is_monotone_in_utilization() {
        let spec = spec(4, 1.0, 4.0);
        let mut previous = -1.0;
        for step in 0..=10 {
            let utilization = f64::from(step) / 10.0;
            let carbon =
                operational(&spec, None, utilization, 730.0, 0.0004).carbon_grams;
            assert!(carbon >= previous);
            previous = carbon;
        }
    }

    #[test]
    fn utilization_is_clamped_to_the_unit_interval() {
        let spec = spec(2, 1.0, 3.0);
        let over = operational(&spec, None, 1.7, 100.0, 0.0004);
        let full = operational(&spec, None, 1.0, 100.0, 0.0004);
        assert_eq!(over.carbon_grams, full.carbon_grams);

        let under = operational(&spec, None, -0.3, 100.0, 0.0004);
        let idle = operational(&spec, None, 0.0, 100.0, 0.0004);
        assert_eq!(under.carbon_grams, idle.carbon_grams);
    }

    #[test]
    fn gpu_contribution_is_additive() {
        let power_spec = power::lookup("p3.2xlarge").unwrap();
        let gpu_spec = crate::carbon::gpu::lookup("p3.2xlarge").unwrap();
        let without = operational(power_spec, None, 0.5, 730.0, 0.0004);
        let with = operational(power_spec, Some(gpu_spec), 0.5, 730.0, 0.0004);
        assert!(with.carbon_grams > without.carbon_grams);

        // 1 x 300 W at 50% for 730 h = 109.5 kWh before PUE.
        let gpu_kwh = (with.energy_kwh - without.energy_kwh) / crate::constants::PUE;
        assert!((gpu_kwh - 109.5).abs() < 1e-9);
    }
}
