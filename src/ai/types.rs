//! Chat messages and collaborator outcome types.

use serde::{Deserialize, Serialize};

use crate::envelope::Outcome;
use crate::lab::Severity;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Kind of data a guidance request is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Prediction,
    Monitoring,
}

impl DataType {
    /// Parse the query-string form. Matching is exact.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "prediction" => Some(Self::Prediction),
            "monitoring" => Some(Self::Monitoring),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prediction => "prediction",
            Self::Monitoring => "monitoring",
        }
    }
}

/// Token accounting reported by the chat backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Result of a chat completion.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletion {
    pub success: bool,
    pub message: String,
    pub usage: Option<Usage>,
}

impl ChatCompletion {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            message: reason.into(),
            usage: None,
        }
    }
}

/// Result of an operation that only produces text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOutcome {
    pub success: bool,
    pub message: String,
}

impl TextOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            message: reason.into(),
        }
    }
}

/// Result of a scene analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneOutcome {
    pub success: bool,
    pub message: String,
    pub severity: Severity,
}

/// Result of an audio transcription.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionOutcome {
    pub success: bool,
    pub message: String,
    pub confidence: f64,
}

impl Outcome for ChatCompletion {
    fn succeeded(&self) -> bool {
        self.success
    }
}

impl Outcome for TextOutcome {
    fn succeeded(&self) -> bool {
        self.success
    }
}

impl Outcome for SceneOutcome {
    fn succeeded(&self) -> bool {
        self.success
    }
}

impl Outcome for TranscriptionOutcome {
    fn succeeded(&self) -> bool {
        self.success
    }
}
