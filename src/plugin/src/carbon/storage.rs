//! Operational carbon for storage, per the CCF coefficient methodology.

use crate::constants::{HDD_WH_PER_TB_HOUR, PUE, SSD_WH_PER_TB_HOUR};

use super::compute::OperationalCarbon;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageTechnology {
    Ssd,
    Hdd,
}

impl StorageTechnology {
    pub fn wh_per_tb_hour(&self) -> f64 {
        match self {
            Self::Ssd => SSD_WH_PER_TB_HOUR,
            Self::Hdd => HDD_WH_PER_TB_HOUR,
        }
    }
}

pub fn operational(
    size_gb: f64,
    hours: f64,
    technology: StorageTechnology,
    replication_factor: f64,
    grid_factor: f64,
) -> OperationalCarbon {
    let size_tb = size_gb / 1024.0;
    let energy_kwh =
        size_tb * hours * technology.wh_per_tb_hour() * replication_factor / 1000.0 * PUE;
    OperationalCarbon {
        energy_kwh,
        carbon_grams: energy_kwh * grid_factor * 1_000_000.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formula_matches_a_hand_computed_case() {
        // 1024 GB = 1 TB SSD, 1000 h, replication 2:
        // 1 x 1000 x 1.2 x 2 / 1000 = 2.4 kWh -> 2.724 with PUE.
        let result = operational(1024.0, 1000.0, StorageTechnology::Ssd, 2.0, 0.0004);
        assert!((result.energy_kwh - 2.724).abs() < 1e-9);
        assert!((result.carbon_grams - 1089.6).abs() < 1e-6);
    }

    #[test]
    fn hdd_draws_less_than_ssd() {
        let ssd = operational(1000.0, 730.0, StorageTechnology::Ssd, 1.0, 0.0004);
        let hdd = operational(1000.0, 730.0, StorageTechnology::Hdd, 1.0, 0.0004);
        assert!(hdd.carbon_grams < ssd.carbon_grams);
    }

    #[test]
    fn zero_size_is_zero_carbon() {
        let result = operational(0.0, 730.0, StorageTechnology::Ssd, 3.0, 0.0004);
        assert_eq!(result.carbon_grams, 0.0);
    }
}
