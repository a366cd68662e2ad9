//! Relay error payloads and their HTTP mapping.
//!
//! Every failure leaves the relay as `{ "error": ..., "code": ..., "details":
//! ..., "traceId": ... }`. Provider failures always use status 500 and carry
//! the provider's own error body in `details` so developers can inspect it.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use crate::middleware::trace::{TRACE_ID_HEADER, TraceId};

/// Convenient result alias for relay handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Stable machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or misses a required field.
    InvalidRequest,
    /// The verification provider could not be reached or rejected the call.
    UpstreamFailure,
    /// An unexpected error occurred inside the relay.
    InternalError,
}

impl ErrorCode {
    fn status(self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::UpstreamFailure | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Relay error response payload.
///
/// # Examples
/// ```
/// use fastpass::inbound::http::error::{Error, ErrorCode};
/// use serde_json::json;
///
/// let err = Error::upstream("Failed to create user")
///     .with_details(json!({ "error": { "code": "invalid_client" } }));
/// assert_eq!(err.code, ErrorCode::UpstreamFailure);
/// assert!(err.details.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    /// Human-readable failure category, e.g. `Failed to create user`.
    #[serde(rename = "error")]
    pub message: String,
    /// Stable machine-readable error code.
    pub code: ErrorCode,
    /// Raw provider error body or validation context, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Correlation identifier for the failing request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl Error {
    /// Create a new error, capturing the trace identifier in scope.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            details: None,
            trace_id: TraceId::current().map(|id| id.to_string()),
        }
    }

    /// Attach structured details to the error.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach details only when some are available.
    #[must_use]
    pub fn with_optional_details(mut self, details: Option<Value>) -> Self {
        self.details = details;
        self
    }

    /// Attach a trace identifier to the error.
    #[must_use]
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::UpstreamFailure`].
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamFailure, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to relay error");
        Self::internal("Internal server error")
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code, ErrorCode::InternalError) {
        Error {
            message: "Internal server error".to_owned(),
            code: ErrorCode::InternalError,
            details: None,
            trace_id: error.trace_id.clone(),
        }
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        self.code.status()
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = &self.trace_id {
            builder.insert_header((TRACE_ID_HEADER, id.clone()));
        }
        builder.json(redact_if_internal(self))
    }
}

#[cfg(test)]
mod tests;
