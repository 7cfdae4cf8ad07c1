//! HTTP handlers for the AI operations.
//!
//! Every handler follows the same path: validate the request, make exactly
//! one collaborator call, then normalize the outcome into the envelope.
//! Validation failures return before the collaborator is touched.

pub mod chat;
pub mod lab;

use std::sync::Arc;

use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::ai::LabAi;
use crate::auth;
use crate::error::ApiError;

/// Source of the current time for response timestamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Application state shared across handlers. Holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    pub ai: Arc<dyn LabAi>,
    pub clock: Clock,
}

impl AppState {
    pub fn new(ai: Arc<dyn LabAi>) -> Self {
        Self {
            ai,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the clock, e.g. with a fixed instant in tests.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

/// Build the Axum router with every gateway route.
pub fn gateway_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/ai/chat", post(chat::chat_completion))
        .route("/api/ai/guidance", get(chat::guidance))
        .route("/api/ai/onboarding", post(chat::onboarding_chat))
        .route("/api/ai/lab/scene", post(lab::analyze_scene))
        .route("/api/ai/lab/audio", post(lab::transcribe_audio))
        .route("/api/ai/lab/command", post(lab::interpret_command))
        .route("/api/ai/sensors/insights", post(lab::sensor_insights))
        .fallback(not_found)
        .with_state(state)
}

/// The full application: routes plus the cross-cutting layers.
///
/// With `trust_caller_headers`, callers are taken from the `x-user-*` headers
/// an authenticating proxy sets; otherwise every request is unauthenticated.
pub fn build_app(state: AppState, trust_caller_headers: bool) -> Router {
    let mut app = gateway_routes(state);
    if trust_caller_headers {
        app = app.layer(middleware::from_fn(auth::trusted_caller_headers));
    }
    app.layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "lab-ai-gateway"
    }))
}

async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

/// Presence test shared by the handlers: absent, `null` and `""` are missing.
pub(crate) fn non_empty_string(value: Option<serde_json::Value>) -> Option<String> {
    match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}
