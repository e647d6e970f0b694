use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stafflane_core::{Timestamp, now_utc};
use stafflane_query::QueryError;

/// Machine-readable error detail inside the error envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorDetail {
    pub message: String,
    pub code: String,
}

/// The wire shape of every error response:
/// `{ "error": { "message", "code" }, "timestamp": ISO8601 }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
    pub timestamp: Timestamp,
}

/// High-level API errors mapped to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {message}")]
    BadRequest {
        message: String,
        code: &'static str,
    },
    #[error("Internal server error: {message}")]
    Internal {
        message: String,
        code: &'static str,
    },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>, code: &'static str) -> Self {
        Self::BadRequest {
            message: message.into(),
            code,
        }
    }

    pub fn internal(message: impl Into<String>, code: &'static str) -> Self {
        Self::Internal {
            message: message.into(),
            code,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_envelope(&self) -> ErrorEnvelope {
        let (message, code) = match self {
            ApiError::BadRequest { message, code } | ApiError::Internal { message, code } => {
                (message.clone(), (*code).to_string())
            }
        };
        ErrorEnvelope {
            error: ErrorDetail { message, code },
            timestamp: now_utc(),
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        // QueryError's Display never carries the underlying store cause,
        // so the message is safe to echo to the client as-is
        if err.is_validation() {
            ApiError::bad_request(err.to_string(), err.code())
        } else {
            ApiError::internal(err.to_string(), err.code())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, axum::Json(self.to_envelope())).into_response()
    }
}
