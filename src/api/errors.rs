//! API Error Handling
//!
//! Structured error responses with HTTP status codes and request tracking.

use crate::errors::FairplayError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level API error response with request tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub request_id: String,
    pub error: ErrorBody,
}

/// Error body with structured information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable error code (ROUND_NOT_FOUND, INVALID_NONCE, ...)
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

#[derive(Debug)]
pub enum ApiErrorKind {
    Engine(FairplayError),
    BadRequest(String),
}

/// API error types with request tracking
#[derive(Debug)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub request_id: String,
}

impl ApiError {
    pub fn engine(request_id: String, error: FairplayError) -> Self {
        Self {
            kind: ApiErrorKind::Engine(error),
            request_id,
        }
    }

    pub fn bad_request(request_id: String, message: String) -> Self {
        Self {
            kind: ApiErrorKind::BadRequest(message),
            request_id,
        }
    }

    /// Malformed or mistyped JSON body
    pub fn from_rejection(request_id: String, rejection: JsonRejection) -> Self {
        Self::bad_request(request_id, rejection.body_text())
    }

    pub fn status(&self) -> StatusCode {
        match &self.kind {
            ApiErrorKind::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiErrorKind::Engine(e) => match e {
                FairplayError::InvalidClientSeed
                | FairplayError::InvalidNonce(_)
                | FairplayError::InvalidParameter { .. }
                | FairplayError::InvalidBetAmount(_) => StatusCode::BAD_REQUEST,
                FairplayError::RoundNotFound(_) => StatusCode::NOT_FOUND,
                FairplayError::RoundRevealed(_) | FairplayError::RoundNotRevealed(_) => {
                    StatusCode::CONFLICT
                }
                FairplayError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
                FairplayError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    pub fn code(&self) -> &'static str {
        match &self.kind {
            ApiErrorKind::BadRequest(_) => "BAD_REQUEST",
            ApiErrorKind::Engine(e) => e.code(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ApiErrorKind::Engine(e) => write!(f, "[{}] {}: {}", self.request_id, e.code(), e),
            ApiErrorKind::BadRequest(msg) => {
                write!(f, "[{}] Bad Request: {}", self.request_id, msg)
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = match &self.kind {
            ApiErrorKind::Engine(e) => e.to_string(),
            ApiErrorKind::BadRequest(msg) => msg.clone(),
        };

        if status.is_server_error() {
            tracing::error!(request_id = %self.request_id, code, "{}", message);
        }

        let body = Json(ErrorResponse {
            request_id: self.request_id,
            error: ErrorBody {
                code: code.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}
