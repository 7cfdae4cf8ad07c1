//! Lab AI Gateway: request validation and orchestration in front of AI lab operations.

pub mod ai;
pub mod auth;
pub mod config;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod lab;
pub mod onboarding;
