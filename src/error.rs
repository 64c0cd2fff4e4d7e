//! Error types for the proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;
use crate::source::SourceError;

// == Proxy Error Enum ==
/// Unified error type for the HTTP layer.
///
/// Every variant is terminated at the handler boundary as a JSON error body.
#[derive(Error, Debug, Clone)]
pub enum ProxyError {
    /// A required query parameter is missing or empty
    #[error("{0}")]
    InvalidRequest(String),

    /// The upstream source answered but nothing matched
    #[error("{0}")]
    NotFound(String),

    /// The upstream source failed (transport, status or decode)
    #[error("Upstream product source failed: {0}")]
    Upstream(String),

    /// Unexpected failure inside the proxy
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::NotFound(_) => StatusCode::NOT_FOUND,
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SourceError> for ProxyError {
    fn from(err: SourceError) -> Self {
        ProxyError::Upstream(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ProxyError::InvalidRequest(msg) | ProxyError::NotFound(msg) => {
                ErrorResponse::new(msg.clone())
            }
            ProxyError::Upstream(details) => {
                ErrorResponse::with_details("Upstream product source failed", details.clone())
            }
            ProxyError::Internal(details) => {
                error!(error = %details, "request failed with an internal error");
                ErrorResponse::with_details("Internal server error", details.clone())
            }
        };

        (status, Json(body)).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;
