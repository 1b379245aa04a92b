use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type PluginResult<T> = Result<T, PluginError>;

/// Typed errors propagated on the wire. Expected data gaps (unknown SKU,
/// missing tag) are NOT errors; estimators answer those with a $0 success
/// and an explanatory billing detail.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The resource's region does not match the region compiled into this
    /// binary.
    #[error("resource region {required_region} is not served by this {plugin_region} binary")]
    UnsupportedRegion {
        plugin_region: String,
        required_region: String,
        trace_id: String,
    },

    /// Required request fields are missing or malformed.
    #[error("invalid resource: {message}")]
    InvalidResource { message: String, trace_id: String },

    /// A critical service's pricing blob failed to parse.
    #[error("pricing data corrupted: {message}")]
    DataCorruption { message: String, trace_id: String },

    /// Deprecated; kept for wire compatibility, no new uses.
    #[error("not implemented: {message}")]
    NotImplemented { message: String, trace_id: String },

    /// The host cancelled the request.
    #[error("request cancelled")]
    Cancelled { trace_id: String },
}

impl PluginError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedRegion { .. } => "UNSUPPORTED_REGION",
            Self::InvalidResource { .. } => "INVALID_RESOURCE",
            Self::DataCorruption { .. } => "DATA_CORRUPTION",
            Self::NotImplemented { .. } => "NOT_IMPLEMENTED",
            Self::Cancelled { .. } => "CANCELLED",
        }
    }

    pub fn trace_id(&self) -> &str {
        match self {
            Self::UnsupportedRegion { trace_id, .. }
            | Self::InvalidResource { trace_id, .. }
            | Self::DataCorruption { trace_id, .. }
            | Self::NotImplemented { trace_id, .. }
            | Self::Cancelled { trace_id } => trace_id,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::UnsupportedRegion { .. } | Self::InvalidResource { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::DataCorruption { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotImplemented { .. } => StatusCode::NOT_IMPLEMENTED,
            // Client-closed-request, the conventional cancellation status.
            Self::Cancelled { .. } => {
                StatusCode::from_u16(499).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    /// The error detail map always carries the trace id so the host can
    /// correlate the response with the diagnostic log stream.
    fn details(&self) -> serde_json::Value {
        match self {
            Self::UnsupportedRegion {
                plugin_region,
                required_region,
                trace_id,
            } => json!({
                "pluginRegion": plugin_region,
                "requiredRegion": required_region,
                "trace_id": trace_id,
            }),
            _ => json!({ "trace_id": self.trace_id() }),
        }
    }
}

impl IntoResponse for PluginError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "code": self.code(),
            "message": self.to_string(),
            "details": self.details(),
        }));
        (self.status(), body).into_response()
    }
}
