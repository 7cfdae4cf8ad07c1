//! AI collaborators behind the gateway.
//!
//! The gateway only sees the [`LabAi`] trait: each call returns an outcome
//! with a success flag and a payload. [`GroqClient`] is the production
//! implementation; tests plug in stubs.

pub mod groq;
pub mod prompts;
pub mod types;

pub use groq::GroqClient;
pub use types::*;

use async_trait::async_trait;

use crate::lab::{AudioCommand, InsightRequest, Scenario};

/// The AI-backed operations the gateway dispatches to.
///
/// Implementations report failure through the outcome's `success` flag
/// rather than an error; the gateway decides what the client sees.
#[async_trait]
pub trait LabAi: Send + Sync {
    /// General chat completion over an ordered conversation.
    async fn chat_completion(&self, messages: &[ChatMessage]) -> ChatCompletion;

    /// Guidance on recording a kind of data against a wallet.
    async fn blockchain_guidance(&self, wallet_address: &str, data_type: DataType) -> TextOutcome;

    /// Safety analysis of a simulated lab scene.
    async fn analyze_lab_image(&self, scenario: Scenario) -> SceneOutcome;

    /// Transcription of a simulated recording.
    async fn transcribe_lab_audio(&self, command: &AudioCommand) -> TranscriptionOutcome;

    /// Interpretation of a spoken or typed lab command.
    async fn interpret_lab_command(&self, text: &str) -> TextOutcome;

    /// Narrative insights for a set of sensor readings.
    async fn sensor_insights(&self, request: InsightRequest) -> TextOutcome;
}
