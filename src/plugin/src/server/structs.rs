//! Wire message shapes for the RPC surface. Field names and optionality
//! follow the host protocol; unchanged values must round-trip byte-exactly,
//! so optional enrichment fields are omitted rather than serialized as null.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::carbon::ImpactMetric;
use crate::metadata::{GrowthType, Lineage};
use crate::recommend::Recommendation;
use crate::resource::{ResourceDescriptor, UsageProfile};

#[derive(Debug, Serialize)]
pub struct NameResponse {
    pub name: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct SupportsRequest {
    pub resource: ResourceDescriptor,
}

#[derive(Debug, Serialize)]
pub struct SupportsResponse {
    pub supported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub supported_metrics: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectedCostRequest {
    pub resource: ResourceDescriptor,
    #[serde(default)]
    pub usage_profile: Option<UsageProfile>,
    /// Request-level compute utilization, in percent.
    #[serde(default)]
    pub utilization_percentage: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CostResponse {
    pub unit_price: f64,
    pub currency: String,
    pub cost_per_month: f64,
    pub billing_detail: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub impact_metrics: Vec<ImpactMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_type: Option<GrowthType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lineage: Option<Lineage>,
}

#[derive(Debug, Deserialize)]
pub struct ActualCostRequest {
    pub resource: ResourceDescriptor,
    /// May carry a JSON document of additional tags.
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActualCostResponse {
    pub cost: f64,
    pub currency: String,
    pub runtime_hours: f64,
    /// `aws-public-fallback[confidence:LEVEL] <note>`.
    pub source: String,
}

#[derive(Debug, Deserialize)]
pub struct PricingSpecRequest {
    pub resource: ResourceDescriptor,
}

/// One rate the service bills on, without any usage multiplication.
#[derive(Debug, Serialize, Deserialize)]
pub struct RateComponent {
    pub name: String,
    pub unit: String,
    pub rate_usd: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PricingSpecResponse {
    pub service: String,
    pub sku: String,
    pub region: String,
    pub currency: String,
    pub rates: Vec<RateComponent>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationsRequest {
    #[serde(default)]
    pub target_resources: Vec<ResourceDescriptor>,
    /// Applies to the whole batch; drives the oversized-dev-instance rule.
    #[serde(default)]
    pub usage_profile: Option<UsageProfile>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub results: Vec<RecommendationResult>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResult {
    pub index: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ElementError>,
}

/// Per-element failure inside a batch; the batch itself still succeeds.
#[derive(Debug, Serialize)]
pub struct ElementError {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub region: String,
}
