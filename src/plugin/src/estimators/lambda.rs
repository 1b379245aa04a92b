use super::tags;
use super::CostEstimate;
use crate::constants::{DEFAULT_LAMBDA_DURATION_MS, DEFAULT_LAMBDA_MEMORY_MB};
use crate::pricing::PricingCatalog;
use crate::resource::ResourceDescriptor;

pub(super) fn estimate(resource: &ResourceDescriptor, catalog: &PricingCatalog) -> CostEstimate {
    let Some(rates) = catalog.lambda_rates() else {
        return CostEstimate::zero("no Lambda rates in this region");
    };

    let memory_mb = tags::numeric(resource, &["memory_mb"], DEFAULT_LAMBDA_MEMORY_MB).value;
    let invocations = tags::numeric(resource, &["requests_per_month"], 0.0).value;
    let duration_ms = tags::numeric(resource, &["avg_duration_ms"], DEFAULT_LAMBDA_DURATION_MS).value;

    let architecture = resource
        .tag("architecture")
        .map(str::to_lowercase)
        .unwrap_or_else(|| "x86_64".to_string());
    let arch_rates = match architecture.as_str() {
        "arm64" => &rates.arm64,
        _ => &rates.x86_64,
    };

    let gb_seconds = (memory_mb / 1024.0) * (duration_ms / 1000.0) * invocations;
    let request_cost = invocations * arch_rates.rate_per_request_usd;
    let compute_cost = gb_seconds * arch_rates.rate_per_gb_second_usd;

    CostEstimate::new(
        arch_rates.rate_per_gb_second_usd,
        request_cost + compute_cost,
        format!(
            "{invocations} invocations ({architecture}) x {memory_mb} MB x {duration_ms} ms = {gb_seconds:.2} GB-seconds"
        ),
    )
}
