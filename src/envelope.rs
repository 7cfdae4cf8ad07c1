//! Uniform response envelopes and the per-operation message catalogue.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::ApiError;

/// Body of every successful response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub payload: T,
    pub message: String,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(payload: T, message: impl Into<String>) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            payload,
            message: message.into(),
            success: true,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

/// Body of every failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSignal {
    pub status_code: u16,
    pub message: String,
    pub success: bool,
}

impl ErrorSignal {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            message: message.into(),
            success: false,
        }
    }
}

/// The operations exposed by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ChatCompletion,
    Guidance,
    Onboarding,
    SceneAnalysis,
    AudioTranscription,
    CommandInterpretation,
    SensorInsights,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::ChatCompletion,
        Operation::Guidance,
        Operation::Onboarding,
        Operation::SceneAnalysis,
        Operation::AudioTranscription,
        Operation::CommandInterpretation,
        Operation::SensorInsights,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChatCompletion => "chat_completion",
            Self::Guidance => "guidance",
            Self::Onboarding => "onboarding",
            Self::SceneAnalysis => "scene_analysis",
            Self::AudioTranscription => "audio_transcription",
            Self::CommandInterpretation => "command_interpretation",
            Self::SensorInsights => "sensor_insights",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            Self::ChatCompletion => "Chat completion successful",
            Self::Guidance => "Blockchain guidance fetched successfully",
            Self::Onboarding => "Onboarding chat response successful",
            Self::SceneAnalysis => "Lab scene analysis completed",
            Self::AudioTranscription => "Audio transcription successful",
            Self::CommandInterpretation => "Command interpretation successful",
            Self::SensorInsights => "Sensor data insights generated successfully",
        }
    }

    /// Fixed message reported when the collaborator fails. Never the
    /// collaborator's own error text.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::ChatCompletion => "Failed to get response from Groq",
            Self::Guidance => "Failed to get guidance from Groq",
            Self::Onboarding => "Failed to get onboarding response from Groq",
            Self::SceneAnalysis => "Failed to analyze lab scene",
            Self::AudioTranscription => "Failed to transcribe audio",
            Self::CommandInterpretation => "Failed to interpret command",
            Self::SensorInsights => "Failed to generate insights for sensor data",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything a collaborator returns that carries a success indicator.
pub trait Outcome {
    fn succeeded(&self) -> bool;
}

/// Turn a collaborator outcome into the success envelope, or into the
/// operation's backend failure when the outcome reports failure.
///
/// `shape` only runs on success, so the failure path never reads the payload.
pub fn normalize<O, P, F>(operation: Operation, outcome: O, shape: F) -> Result<ApiResponse<P>, ApiError>
where
    O: Outcome,
    P: Serialize,
    F: FnOnce(O) -> P,
{
    if !outcome.succeeded() {
        return Err(ApiError::Backend(operation.failure_message()));
    }
    Ok(ApiResponse::ok(shape(outcome), operation.success_message()))
}
