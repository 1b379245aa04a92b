//! Regional grid carbon intensity, in metric tons CO2e per kWh.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::warn;

use crate::constants::DEFAULT_GRID_FACTOR;

pub(crate) const RAW_TABLE: &str = include_str!("../../data/ccf/grid_factors.csv");

static TABLE: Lazy<HashMap<String, f64>> = Lazy::new(|| parse_table(RAW_TABLE));

/// Grid factor for a region; the CCF default applies to regions absent
/// from the table.
pub fn factor(region: &str) -> f64 {
    TABLE.get(region).copied().unwrap_or(DEFAULT_GRID_FACTOR)
}

fn parse_table(raw: &str) -> HashMap<String, f64> {
    let mut table = HashMap::new();
    for line in raw.lines().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.split_once(',') {
            Some((region, value)) => match value.parse::<f64>() {
                Ok(factor) if factor > 0.0 => {
                    table.insert(region.to_string(), factor);
                }
                _ => warn!(line, "skipping non-positive grid factor row"),
            },
            None => warn!(line, "skipping malformed grid factor row"),
        }
    }
    table
}
