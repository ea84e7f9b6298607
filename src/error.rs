//! HTTP error type for the stats endpoint.
//!
//! Client-facing messages are fixed and generic; underlying causes are logged
//! server-side only.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::connection::InvalidUrlParameter;

/// Request-aborting errors. Per-database and per-collection scan failures are
/// absorbed upstream and never reach this type.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, empty, or malformed `url` parameter.
    #[error("Invalid URL parameter")]
    InvalidUrl,

    /// The upstream connection could not be established or used.
    #[error("Error connecting to MongoDB")]
    Connection(anyhow::Error),

    /// No route matched the request.
    #[error("Endpoint not found")]
    NotFound,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidUrl => StatusCode::BAD_REQUEST,
            Self::Connection(cause) => {
                tracing::error!("Error connecting to MongoDB: {:#}", cause);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::NotFound => StatusCode::NOT_FOUND,
        };

        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<InvalidUrlParameter> for ApiError {
    fn from(_: InvalidUrlParameter) -> Self {
        Self::InvalidUrl
    }
}
