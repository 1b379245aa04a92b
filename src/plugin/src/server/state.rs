use std::sync::Arc;

use axum::http::HeaderMap;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::PluginConfig;
use crate::constants::TRACE_ID_HEADER;
use crate::errors::PluginError;
use crate::pricing::PricingCatalog;

#[derive(Clone)]
pub(super) struct AppState {
    pub cancellation_token: CancellationToken,
    pub config: Arc<PluginConfig>,
}

impl AppState {
    pub fn new(cancellation_token: CancellationToken, config: Arc<PluginConfig>) -> Self {
        Self { cancellation_token, config }
    }

    /// Handlers check cancellation at each component boundary: dispatcher
    /// entry, estimator entry, and response assembly.
    pub fn ensure_live(&self, trace_id: &str) -> Result<(), PluginError> {
        if self.cancellation_token.is_cancelled() {
            return Err(PluginError::Cancelled { trace_id: trace_id.to_string() });
        }
        Ok(())
    }

    pub fn catalog(&self, trace_id: &str) -> Result<&'static PricingCatalog, PluginError> {
        PricingCatalog::get().map_err(|e| PluginError::DataCorruption {
            message: e.to_string(),
            trace_id: trace_id.to_string(),
        })
    }
}

/// Trace id from the well-known request header, or a fresh v4 UUID when the
/// host did not send one. Every log record for the request carries it.
pub(super) fn trace_id_from(headers: &HeaderMap) -> String {
    headers
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
