//! Groq-backed implementation of [`LabAi`] over the OpenAI-compatible API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::prompts;
use super::types::{
    ChatCompletion, ChatMessage, DataType, SceneOutcome, TextOutcome, TranscriptionOutcome, Usage,
};
use super::LabAi;
use crate::config::GroqConfig;
use crate::error::LlmError;
use crate::lab::{AudioCommand, InsightRequest, Scenario};

const PROVIDER: &str = "groq";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Sampling settings for one call.
#[derive(Debug, Clone, Copy)]
struct Sampling {
    temperature: f32,
    max_tokens: u32,
}

const CHAT: Sampling = Sampling {
    temperature: 0.7,
    max_tokens: 1024,
};
const PRECISE: Sampling = Sampling {
    temperature: 0.2,
    max_tokens: 512,
};

/// HTTP client for Groq chat completions.
pub struct GroqClient {
    http: reqwest::Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Text and usage from a successful call.
#[derive(Debug)]
struct Completion {
    content: String,
    usage: Option<Usage>,
}

impl GroqClient {
    pub fn new(config: &GroqConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        tracing::info!("Using Groq (model: {})", config.model);
        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &[ChatMessage], sampling: Sampling) -> Result<Completion, LlmError> {
        let body = CompletionBody {
            model: &self.model,
            messages,
            temperature: sampling.temperature,
            max_tokens: sampling.max_tokens,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(LlmError::AuthFailed {
                provider: PROVIDER.to_string(),
            });
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(LlmError::RateLimited {
                provider: PROVIDER.to_string(),
                retry_after,
            });
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: format!("HTTP {status}: {}", text.chars().take(300).collect::<String>()),
            });
        }

        let parsed: CompletionResponse = response.json().await.map_err(|e| LlmError::InvalidResponse {
            provider: PROVIDER.to_string(),
            reason: e.to_string(),
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| LlmError::InvalidResponse {
                provider: PROVIDER.to_string(),
                reason: "response contained no message content".to_string(),
            })?;

        Ok(Completion {
            content,
            usage: parsed.usage,
        })
    }

    /// Run a text-only call, logging and flattening any error into a failed outcome.
    async fn text(&self, operation: &str, messages: &[ChatMessage], sampling: Sampling) -> TextOutcome {
        match self.complete(messages, sampling).await {
            Ok(completion) => TextOutcome::ok(completion.content),
            Err(e) => {
                tracing::error!(operation, error = %e, "Groq call failed");
                TextOutcome::failed(e.to_string())
            }
        }
    }
}

#[async_trait]
impl LabAi for GroqClient {
    async fn chat_completion(&self, messages: &[ChatMessage]) -> ChatCompletion {
        match self.complete(messages, CHAT).await {
            Ok(completion) => ChatCompletion {
                success: true,
                message: completion.content,
                usage: completion.usage,
            },
            Err(e) => {
                tracing::error!(operation = "chat_completion", error = %e, "Groq call failed");
                ChatCompletion::failed(e.to_string())
            }
        }
    }

    async fn blockchain_guidance(&self, wallet_address: &str, data_type: DataType) -> TextOutcome {
        let messages = prompts::guidance_messages(wallet_address, data_type);
        self.text("guidance", &messages, CHAT).await
    }

    async fn analyze_lab_image(&self, scenario: Scenario) -> SceneOutcome {
        let messages = prompts::scene_messages(scenario);
        let outcome = self.text("scene_analysis", &messages, PRECISE).await;
        SceneOutcome {
            success: outcome.success,
            message: outcome.message,
            severity: scenario.severity(),
        }
    }

    async fn transcribe_lab_audio(&self, command: &AudioCommand) -> TranscriptionOutcome {
        let (messages, confidence) = prompts::transcription_messages(command);
        let outcome = self.text("audio_transcription", &messages, PRECISE).await;
        TranscriptionOutcome {
            success: outcome.success,
            message: outcome.message,
            confidence,
        }
    }

    async fn interpret_lab_command(&self, text: &str) -> TextOutcome {
        let messages = prompts::command_messages(text);
        self.text("command_interpretation", &messages, PRECISE).await
    }

    async fn sensor_insights(&self, request: InsightRequest) -> TextOutcome {
        let messages = prompts::sensor_messages(&request);
        self.text("sensor_insights", &messages, CHAT).await
    }
}
