//! Error types for the lab AI gateway.

use std::time::Duration;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::envelope::ErrorSignal;

/// Failures surfaced to HTTP clients.
///
/// Every handler returns this type on its error path; the `IntoResponse`
/// impl is the only place a failure is turned into a wire response.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed, missing or out-of-range input.
    #[error("{0}")]
    Validation(String),

    /// No caller context was attached to the request.
    #[error("{0}")]
    Unauthenticated(String),

    /// The caller is known but lacks an attribute the operation needs.
    #[error("{0}")]
    MissingAttribute(String),

    /// The collaborator reported failure. Carries the operation's fixed message.
    #[error("{0}")]
    Backend(&'static str),

    #[error("Route not found")]
    RouteNotFound,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MissingAttribute(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::RouteNotFound => StatusCode::NOT_FOUND,
        }
    }

    pub fn to_signal(&self) -> ErrorSignal {
        ErrorSignal::new(self.status_code(), self.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::Backend(message) => tracing::error!(status = status.as_u16(), %message, "Request failed"),
            other => tracing::warn!(status = status.as_u16(), message = %other, "Request rejected"),
        }
        (status, Json(self.to_signal())).into_response()
    }
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// LLM provider errors. These stay inside the collaborator.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
