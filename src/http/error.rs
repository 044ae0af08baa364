//! Response error mapping.
//!
//! Every failure surfaces as the uniform body `{"error": "<code>: <message>"}`.
//! Store failures keep the store's own error code in the message; the HTTP
//! status is always 500 for those.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Request-terminating errors the gateway produces.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, malformed, or rejected credentials. Maps to 403 by wire
    /// contract (not 401), matching what deployed clients expect.
    #[error("{0}")]
    Unauthenticated(String),

    /// Request body failed validation.
    #[error("{0}")]
    InvalidInput(String),

    /// The document store reported a failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// No such route.
    #[error("Not found.")]
    NotFound,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::FORBIDDEN,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Code prefix of the `{error}` body. For store failures this is the
    /// store's error code, not the HTTP status.
    fn code(&self) -> String {
        match self {
            ApiError::Store(e) => e.code(),
            other => other.status().as_u16().to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({ "error": format!("{}: {}", self.code(), self) });
        (status, Json(body)).into_response()
    }
}
