//! Conversational operations: chat completion, guidance and onboarding.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AppState, non_empty_string};
use crate::ai::{ChatMessage, DataType, Usage};
use crate::auth::{AuthenticatedCaller, Caller};
use crate::envelope::{ApiResponse, Operation, normalize};
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::onboarding::{ProfileData, assemble_conversation};

// ── Chat completion ─────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ChatBody {
    pub messages: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ChatPayload {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Parse a non-empty conversation. Every entry must be a well-formed message.
pub fn validate_messages(raw: Option<Value>) -> Result<Vec<ChatMessage>, ApiError> {
    let items = match raw {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => return Err(ApiError::validation("Valid messages array is required")),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<ChatMessage>(item).map_err(|_| {
                ApiError::Validation(format!(
                    "Message at index {index} must have a role (system, user or assistant) and text content"
                ))
            })
        })
        .collect()
}

/// POST /api/ai/chat
pub async fn chat_completion(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ChatBody>,
) -> Result<ApiResponse<ChatPayload>, ApiError> {
    let messages = validate_messages(body.messages)?;

    tracing::info!(operation = %Operation::ChatCompletion, messages = messages.len(), "Dispatching");
    let completion = state.ai.chat_completion(&messages).await;

    normalize(Operation::ChatCompletion, completion, |c| ChatPayload {
        message: c.message,
        usage: c.usage,
    })
}

// ── Guidance ────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct GuidanceQuery {
    #[serde(rename = "dataType")]
    pub data_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GuidancePayload {
    pub guidance: String,
}

/// Check, in order: an authenticated caller, a wallet on that caller, and a
/// supported data type.
pub fn validate_guidance<'a>(
    caller: Option<&'a AuthenticatedCaller>,
    data_type: Option<&str>,
) -> Result<(&'a str, DataType), ApiError> {
    let caller = caller.ok_or_else(|| ApiError::Unauthenticated("Unauthorized request".to_string()))?;

    let wallet = caller.wallet().ok_or_else(|| {
        ApiError::MissingAttribute(
            "Wallet address not found for user. Cannot get blockchain guidance.".to_string(),
        )
    })?;

    let data_type = data_type
        .and_then(DataType::parse)
        .ok_or_else(|| ApiError::validation("Valid data type is required (prediction or monitoring)"))?;

    Ok((wallet, data_type))
}

/// GET /api/ai/guidance?dataType=prediction|monitoring
///
/// A query string that does not parse is treated as a missing `dataType`, so
/// it cannot pre-empt the caller and wallet checks.
pub async fn guidance(
    State(state): State<AppState>,
    Caller(caller): Caller,
    query: Result<Query<GuidanceQuery>, QueryRejection>,
) -> Result<ApiResponse<GuidancePayload>, ApiError> {
    let data_type = match query {
        Ok(Query(query)) => query.data_type,
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "Guidance query string rejected");
            None
        }
    };
    let (wallet, data_type) = validate_guidance(caller.as_ref(), data_type.as_deref())?;

    tracing::info!(
        operation = %Operation::Guidance,
        data_type = data_type.as_str(),
        "Dispatching"
    );
    let outcome = state.ai.blockchain_guidance(wallet, data_type).await;

    normalize(Operation::Guidance, outcome, |o| GuidancePayload { guidance: o.message })
}

// ── Onboarding ──────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct OnboardingBody {
    pub message: Option<Value>,
    pub history: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingPayload {
    pub message: String,
    pub profile_data: ProfileData,
}

/// Read caller-supplied history. Anything that is not a list of well-formed
/// messages is dropped rather than rejected.
pub fn parse_history(raw: Option<Value>) -> Vec<ChatMessage> {
    match raw {
        Some(value @ Value::Array(_)) => match serde_json::from_value::<Vec<ChatMessage>>(value) {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed onboarding history");
                Vec::new()
            }
        },
        None => Vec::new(),
        Some(_) => {
            tracing::warn!("Ignoring onboarding history that is not a list");
            Vec::new()
        }
    }
}

/// POST /api/ai/onboarding
pub async fn onboarding_chat(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<OnboardingBody>,
) -> Result<ApiResponse<OnboardingPayload>, ApiError> {
    let message = non_empty_string(body.message).ok_or_else(|| ApiError::validation("Message is required"))?;

    let conversation = assemble_conversation(parse_history(body.history), &message);

    tracing::info!(operation = %Operation::Onboarding, messages = conversation.len(), "Dispatching");
    let completion = state.ai.chat_completion(&conversation).await;

    normalize(Operation::Onboarding, completion, |c| OnboardingPayload {
        message: c.message,
        profile_data: ProfileData::extract(&message),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::handlers::testing::{Call, LEAKY_FAILURE, StubAi, body, state};
    use crate::onboarding::{ExperienceLevel, ONBOARDING_SYSTEM_PROMPT, ProfileRole};

    fn caller(wallet: Option<&str>) -> Caller {
        let mut caller = AuthenticatedCaller::new("user-1");
        caller.wallet_address = wallet.map(str::to_string);
        Caller(Some(caller))
    }

    fn query(raw: &str) -> Result<Query<GuidanceQuery>, QueryRejection> {
        let uri: axum::http::Uri = format!("/api/ai/guidance?{raw}").parse().unwrap();
        Query::try_from_uri(&uri)
    }

    #[tokio::test]
    async fn chat_rejects_missing_empty_or_non_list_messages() {
        for raw in [json!({}), json!({"messages": []}), json!({"messages": "hi"}), json!({"messages": null})] {
            let ai = StubAi::succeeding();
            let err = chat_completion(State(state(ai.clone())), ApiJson(body(raw)))
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::Validation(ref m) if m == "Valid messages array is required"));
            assert!(ai.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn chat_rejects_unknown_roles_with_index() {
        let ai = StubAi::succeeding();
        let raw = json!({"messages": [
            {"role": "user", "content": "hi"},
            {"role": "tool", "content": "x"}
        ]});
        let err = chat_completion(State(state(ai.clone())), ApiJson(body(raw)))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m.contains("index 1")));
        assert!(ai.calls().is_empty());
    }

    #[tokio::test]
    async fn chat_passes_messages_through_and_returns_usage() {
        let ai = StubAi::succeeding();
        let raw = json!({"messages": [{"role": "user", "content": "What is CRISPR?"}]});
        let response = chat_completion(State(state(ai.clone())), ApiJson(body(raw)))
            .await
            .unwrap();

        assert_eq!(ai.calls(), vec![Call::Chat(vec![ChatMessage::user("What is CRISPR?")])]);
        assert_eq!(response.message, "Chat completion successful");
        assert_eq!(response.payload.message, "stub reply");
        assert_eq!(response.payload.usage.unwrap().total_tokens, 15);
    }

    #[tokio::test]
    async fn chat_backend_failure_uses_fixed_message() {
        let ai = StubAi::failing();
        let raw = json!({"messages": [{"role": "user", "content": "hi"}]});
        let err = chat_completion(State(state(ai.clone())), ApiJson(body(raw)))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Backend("Failed to get response from Groq")));
        assert!(!err.to_string().contains(LEAKY_FAILURE));
        assert_eq!(ai.calls().len(), 1);
    }

    #[test]
    fn guidance_validation_order() {
        assert!(matches!(
            validate_guidance(None, Some("prediction")),
            Err(ApiError::Unauthenticated(_))
        ));

        let no_wallet = AuthenticatedCaller::new("u");
        assert!(matches!(
            validate_guidance(Some(&no_wallet), None),
            Err(ApiError::MissingAttribute(_))
        ));

        let with_wallet = AuthenticatedCaller::new("u").with_wallet("0xabc");
        assert!(matches!(
            validate_guidance(Some(&with_wallet), Some("forecast")),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(validate_guidance(Some(&with_wallet), None), Err(ApiError::Validation(_))));
        assert_eq!(
            validate_guidance(Some(&with_wallet), Some("monitoring")).unwrap(),
            ("0xabc", DataType::Monitoring)
        );
    }

    #[tokio::test]
    async fn guidance_status_codes() {
        let ai = StubAi::succeeding();

        let err = guidance(State(state(ai.clone())), Caller(None), query("dataType=prediction"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code().as_u16(), 401);

        let err = guidance(State(state(ai.clone())), caller(None), query("dataType=prediction"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code().as_u16(), 400);

        let err = guidance(State(state(ai.clone())), caller(Some("0xabc")), query("dataType=forecast"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code().as_u16(), 400);

        assert!(ai.calls().is_empty());
    }

    #[tokio::test]
    async fn unparseable_query_does_not_pre_empt_caller_checks() {
        let ai = StubAi::succeeding();
        let duplicated = "dataType=prediction&dataType=monitoring";
        assert!(query(duplicated).is_err());

        let err = guidance(State(state(ai.clone())), Caller(None), query(duplicated))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(_)));

        let err = guidance(State(state(ai.clone())), caller(None), query(duplicated))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingAttribute(_)));

        let err = guidance(State(state(ai.clone())), caller(Some("0xabc")), query(duplicated))
            .await
            .unwrap_err();
        assert!(
            matches!(err, ApiError::Validation(ref m) if m == "Valid data type is required (prediction or monitoring)")
        );
        assert!(ai.calls().is_empty());
    }

    #[test]
    fn null_history_is_empty() {
        let raw: OnboardingBody = body(json!({"message": "hi", "history": null}));
        assert!(raw.history.is_none());
        assert!(parse_history(raw.history).is_empty());
    }

    #[tokio::test]
    async fn guidance_dispatches_wallet_and_data_type() {
        let ai = StubAi::succeeding();
        let response = guidance(State(state(ai.clone())), caller(Some("0xabc")), query("dataType=prediction"))
            .await
            .unwrap();

        assert_eq!(ai.calls(), vec![Call::Guidance("0xabc".to_string(), DataType::Prediction)]);
        assert_eq!(response.payload.guidance, "stub guidance");
        assert_eq!(response.message, "Blockchain guidance fetched successfully");
    }

    #[tokio::test]
    async fn onboarding_requires_message() {
        for raw in [json!({}), json!({"message": ""}), json!({"message": 7}), json!({"history": []})] {
            let ai = StubAi::succeeding();
            let err = onboarding_chat(State(state(ai.clone())), ApiJson(body(raw)))
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::Validation(ref m) if m == "Message is required"));
            assert!(ai.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn onboarding_assembles_conversation_in_order() {
        let ai = StubAi::succeeding();
        let raw = json!({"message": "hello", "history": [{"role": "user", "content": "hi"}]});
        onboarding_chat(State(state(ai.clone())), ApiJson(body(raw)))
            .await
            .unwrap();

        assert_eq!(
            ai.calls(),
            vec![Call::Chat(vec![
                ChatMessage::system(ONBOARDING_SYSTEM_PROMPT),
                ChatMessage::user("hi"),
                ChatMessage::user("hello"),
            ])]
        );
    }

    #[tokio::test]
    async fn onboarding_drops_malformed_history() {
        let ai = StubAi::succeeding();
        let raw = json!({"message": "hello", "history": [{"role": "robot", "content": "beep"}]});
        onboarding_chat(State(state(ai.clone())), ApiJson(body(raw)))
            .await
            .unwrap();

        let calls = ai.calls();
        let Call::Chat(messages) = &calls[0] else {
            panic!("expected a chat call");
        };
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1], ChatMessage::user("hello"));
    }

    #[tokio::test]
    async fn onboarding_profile_comes_from_newest_message_only() {
        let ai = StubAi::succeeding();
        let raw = json!({
            "message": "I am an advanced researcher interested in CRISPR and DNA",
            "history": [{"role": "user", "content": "I love biology and I'm a scientist"}]
        });
        let response = onboarding_chat(State(state(ai.clone())), ApiJson(body(raw)))
            .await
            .unwrap();

        let profile = &response.payload.profile_data;
        assert_eq!(profile.role, ProfileRole::Researcher);
        assert_eq!(profile.experience_level, ExperienceLevel::Advanced);
        assert!(profile.interests.contains(&"crispr".to_string()));
        assert!(profile.interests.contains(&"dna".to_string()));
        assert!(!profile.interests.contains(&"biology".to_string()));
        assert_eq!(response.payload.message, "stub reply");
    }

    #[tokio::test]
    async fn onboarding_backend_failure_is_distinct_from_chat() {
        let ai = StubAi::failing();
        let err = onboarding_chat(State(state(ai)), ApiJson(body(json!({"message": "hi"}))))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Backend("Failed to get onboarding response from Groq")));
    }
}
