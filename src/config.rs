//! Configuration types.

use secrecy::SecretString;

use crate::error::ConfigError;

pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_PORT: u16 = 5000;

/// Settings for the Groq chat-completions backend.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    pub api_key: SecretString,
    pub model: String,
    /// Base URL of the OpenAI-compatible API, without a trailing slash.
    pub base_url: String,
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub port: u16,
    /// Attach callers from `x-user-*` headers set by an authenticating proxy.
    pub trust_caller_headers: bool,
    pub groq: GroqConfig,
}

impl GatewayConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup (used by tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GROQ_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("GROQ_API_KEY".to_string()))?;

        let model = lookup("GROQ_MODEL").unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string());
        let base_url = lookup("GROQ_BASE_URL")
            .unwrap_or_else(|| DEFAULT_GROQ_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let port = match lookup("GATEWAY_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "GATEWAY_PORT".to_string(),
                message: format!("{raw:?} is not a port number ({e})"),
            })?,
            None => DEFAULT_PORT,
        };

        let trust_caller_headers = match lookup("GATEWAY_TRUST_CALLER_HEADERS") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| ConfigError::InvalidValue {
                key: "GATEWAY_TRUST_CALLER_HEADERS".to_string(),
                message: format!("{raw:?} is not a boolean"),
            })?,
            None => false,
        };

        Ok(Self {
            port,
            trust_caller_headers,
            groq: GroqConfig {
                api_key: SecretString::from(api_key),
                model,
                base_url,
            },
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
