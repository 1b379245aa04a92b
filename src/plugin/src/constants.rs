pub const PLUGIN_NAME: &str = "aws-public";
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Billing convention shared by every time-based estimator.
pub const HOURS_PER_MONTH: f64 = 730.0;

/// Worker hours per month assumed by the dev usage profile (8h x 20d).
pub const DEV_PROFILE_HOURS_PER_MONTH: f64 = 160.0;

/// Datacenter power usage effectiveness, per the CCF methodology.
pub const PUE: f64 = 1.135;

/// Grid carbon intensity applied when a region is absent from the table,
/// in metric tons CO2e per kWh.
pub const DEFAULT_GRID_FACTOR: f64 = 0.00039278;

/// CCF serverless convention: one vCPU-equivalent per 1792 MB of memory.
pub const LAMBDA_MB_PER_VCPU: f64 = 1792.0;

/// Power draw discount for Graviton/ARM Lambda functions.
pub const LAMBDA_ARM_FACTOR: f64 = 0.80;

/// Embodied-carbon amortization defaults: kilograms per server chassis
/// spread over the expected service lifespan.
pub const EMBODIED_KG_PER_SERVER: f64 = 1000.0;
pub const SERVER_LIFESPAN_MONTHS: f64 = 48.0;

/// Storage power coefficients in watt-hours per terabyte-hour.
pub const SSD_WH_PER_TB_HOUR: f64 = 1.2;
pub const HDD_WH_PER_TB_HOUR: f64 = 0.65;

/// Request metadata header carrying the orchestrator's trace id.
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Upper bound on a single recommendations batch.
pub const MAX_RECOMMENDATION_BATCH: usize = 100;

pub const DEFAULT_EBS_SIZE_GB: f64 = 8.0;
pub const DEFAULT_RDS_STORAGE_GB: f64 = 20.0;
pub const DEFAULT_LAMBDA_MEMORY_MB: f64 = 128.0;
pub const DEFAULT_LAMBDA_DURATION_MS: f64 = 100.0;
