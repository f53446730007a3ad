//! Error types for the relay
//!
//! One enum per boundary: configuration at startup, alert parsing and the
//! broker relay per request, and `ApiError` where both meet the HTTP layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// Startup configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Malformed webhook bodies and alert messages
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlertError {
    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),

    #[error("JSON body must be an object")]
    NotAnObject,

    #[error("Alert message 'alert_message' not found")]
    MissingAlertMessage,

    #[error("Invalid alert message format: missing {field} in '{message}'")]
    MissingField { field: &'static str, message: String },

    #[error("Invalid AMOUNT '{0}': expected a positive number")]
    InvalidAmount(String),
}

/// Failures of the catalog-fetch / order-submit pipeline
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Session credential (SSID) not configured")]
    NotConfigured,

    #[error("Failed to fetch instrument list: {0}")]
    CatalogFetch(String),

    #[error("Asset '{symbol}' not available")]
    InstrumentNotFound { symbol: String },

    #[error("Failed to submit order: {0}")]
    OrderSubmission(String),

    #[error("{message}")]
    BrokerRejected { message: String, response: Value },
}

pub type RelayResult<T> = Result<T, RelayError>;

/// Errors surfaced by the webhook handler
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] AlertError),

    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Relay(_) | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), self.to_string())
    }
}

/// `{"status":"error","message":...}` with the given status
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let message: String = message.into();
    (status, Json(json!({"status": "error", "message": message}))).into_response()
}
