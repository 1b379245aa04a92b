//! Actual-cost fallback: prorates the projected monthly cost over an
//! observed runtime window. Without live billing data, the window comes from
//! the request or from lifecycle tags, with a confidence grade recording how
//! much was inferred.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::constants::HOURS_PER_MONTH;

pub const CREATED_TAG: &str = "pulumi:created";
pub const EXTERNAL_TAG: &str = "pulumi:external";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

#[derive(Debug, Error)]
pub enum ActualCostError {
    #[error("no usable start time: provide start explicitly or tag the resource with {CREATED_TAG}")]
    MissingStart,
    #[error("invalid {CREATED_TAG} timestamp: {0}")]
    BadTimestamp(String),
    #[error("window end precedes start")]
    NegativeWindow,
}

#[derive(Debug, Clone)]
pub struct ActualCost {
    pub cost: f64,
    pub runtime_hours: f64,
    pub confidence: Confidence,
    pub note: String,
}

impl ActualCost {
    /// Wire form: `aws-public-fallback[confidence:LEVEL] <note>`.
    pub fn source_label(&self) -> String {
        format!(
            "aws-public-fallback[confidence:{}] {}",
            self.confidence.as_str(),
            self.note
        )
    }
}

/// Merge request-level tags over tags embedded as a JSON document in the
/// resource id. Explicit-field tags win on key collision.
pub fn merge_tags(
    request_tags: &HashMap<String, String>,
    resource_id: Option<&str>,
) -> HashMap<String, String> {
    let mut merged: HashMap<String, String> = resource_id
        .and_then(|raw| serde_json::from_str::<HashMap<String, String>>(raw).ok())
        .unwrap_or_default();
    for (key, value) in request_tags {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// `assumption` names a significant assumption the caller had to make
/// (an unsupported service, a rate that could not be resolved); it caps the
/// confidence at LOW regardless of how good the window source was.
pub fn prorate(
    projected_monthly: f64,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    tags: &HashMap<String, String>,
    now: DateTime<Utc>,
    assumption: Option<String>,
) -> Result<ActualCost, ActualCostError> {
    let (start, window_confidence, window_note) = resolve_start(start, tags)?;
    let (confidence, mut note) = match assumption {
        Some(reason) => (Confidence::Low, format!("{reason}; {window_note}")),
        None => (window_confidence, window_note),
    };
    let end = end.unwrap_or(now);

    if end < start {
        return Err(ActualCostError::NegativeWindow);
    }

    let runtime_hours = (end - start).num_seconds() as f64 / 3600.0;
    if runtime_hours == 0.0 {
        note = "zero-length window, no runtime to bill".to_string();
    }

    let cost = projected_monthly * (runtime_hours / HOURS_PER_MONTH);
    debug!(runtime_hours, cost, confidence = confidence.as_str(), "prorated actual cost");

    Ok(ActualCost { cost, runtime_hours, confidence, note })
}

fn resolve_start(
    explicit: Option<DateTime<Utc>>,
    tags: &HashMap<String, String>,
) -> Result<(DateTime<Utc>, Confidence, String), ActualCostError> {
    if let Some(start) = explicit {
        return Ok((start, Confidence::High, "explicit observation window".to_string()));
    }

    let Some(created) = tags.get(CREATED_TAG) else {
        return Err(ActualCostError::MissingStart);
    };
    let start = DateTime::parse_from_rfc3339(created)
        .map_err(|e| ActualCostError::BadTimestamp(e.to_string()))?
        .with_timezone(&Utc);

    let imported = tags
        .get(EXTERNAL_TAG)
        .is_some_and(|v| v.eq_ignore_ascii_case("true"));
    if imported {
        // The creation tag on an imported resource records the import, not
        // the original creation.
        Ok((
            start,
            Confidence::Medium,
            format!("runtime inferred from {CREATED_TAG} on an imported resource"),
        ))
    } else {
        Ok((
            start,
            Confidence::High,
            format!("runtime inferred from {CREATED_TAG}"),
        ))
    }
}
