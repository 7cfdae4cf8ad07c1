//! Lab operations: scene analysis, audio, commands and sensor insights.

use axum::extract::State;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AppState, non_empty_string};
use crate::envelope::{ApiResponse, Operation, normalize};
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::lab::{AudioCommand, Scenario, SensorReading, Severity, coerce_number, extract_recommendations};

// ── Scene analysis ──────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct SceneBody {
    pub scenario: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ScenePayload {
    pub scenario: Scenario,
    pub alert: String,
    pub severity: Severity,
}

/// Absent, `""`, `false` and `0` are missing; any other non-string is invalid.
pub fn validate_scenario(raw: Option<Value>) -> Result<Scenario, ApiError> {
    let required = || ApiError::validation("Scenario identifier is required");
    let invalid = || ApiError::validation("Invalid scenario identifier");

    match raw {
        None | Some(Value::Bool(false)) => Err(required()),
        Some(Value::String(s)) if s.is_empty() => Err(required()),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Err(required()),
        Some(Value::String(s)) => s.parse::<Scenario>().map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

/// POST /api/ai/lab/scene
pub async fn analyze_scene(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SceneBody>,
) -> Result<ApiResponse<ScenePayload>, ApiError> {
    let scenario = validate_scenario(body.scenario)?;

    tracing::info!(operation = %Operation::SceneAnalysis, %scenario, "Dispatching");
    let outcome = state.ai.analyze_lab_image(scenario).await;

    normalize(Operation::SceneAnalysis, outcome, |o| ScenePayload {
        scenario,
        alert: o.message,
        severity: o.severity,
    })
}

// ── Audio transcription ─────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct AudioBody {
    #[serde(rename = "audioCommand")]
    pub audio_command: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct AudioPayload {
    pub transcription: String,
    pub confidence: f64,
}

/// POST /api/ai/lab/audio
pub async fn transcribe_audio(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<AudioBody>,
) -> Result<ApiResponse<AudioPayload>, ApiError> {
    let command = body
        .audio_command
        .and_then(AudioCommand::from_value)
        .ok_or_else(|| ApiError::validation("Audio command identifier is required"))?;

    tracing::info!(operation = %Operation::AudioTranscription, "Dispatching");
    let outcome = state.ai.transcribe_lab_audio(&command).await;

    normalize(Operation::AudioTranscription, outcome, |o| AudioPayload {
        transcription: o.message,
        confidence: o.confidence,
    })
}

// ── Command interpretation ──────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CommandBody {
    pub text: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct CommandPayload {
    pub interpretation: String,
}

/// POST /api/ai/lab/command
pub async fn interpret_command(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CommandBody>,
) -> Result<ApiResponse<CommandPayload>, ApiError> {
    let text = non_empty_string(body.text).ok_or_else(|| ApiError::validation("Command text is required"))?;

    tracing::info!(operation = %Operation::CommandInterpretation, chars = text.len(), "Dispatching");
    let outcome = state.ai.interpret_lab_command(&text).await;

    normalize(Operation::CommandInterpretation, outcome, |o| CommandPayload {
        interpretation: o.message,
    })
}

// ── Sensor insights ─────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct SensorBody {
    pub temperature: Option<Value>,
    pub humidity: Option<Value>,
    pub pressure: Option<Value>,
    pub co2: Option<Value>,
    pub oxygen: Option<Value>,
    pub ph: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct SensorPayload {
    pub insights: String,
    pub recommendations: Vec<String>,
    /// RFC 3339 with millisecond precision and a `Z` suffix.
    pub timestamp: String,
}

/// Build a reading. Temperature and humidity must be present and numeric;
/// the other readings are dropped when absent or not numeric.
pub fn validate_reading(body: SensorBody) -> Result<SensorReading, ApiError> {
    let (Some(temperature), Some(humidity)) = (body.temperature, body.humidity) else {
        return Err(ApiError::validation("Temperature and humidity are required"));
    };

    let temperature =
        coerce_number(&temperature).ok_or_else(|| ApiError::validation("Temperature must be numeric"))?;
    let humidity = coerce_number(&humidity).ok_or_else(|| ApiError::validation("Humidity must be numeric"))?;

    let optional = |value: Option<Value>| value.as_ref().and_then(coerce_number);

    Ok(SensorReading {
        temperature,
        humidity,
        pressure: optional(body.pressure),
        co2: optional(body.co2),
        oxygen: optional(body.oxygen),
        ph: optional(body.ph),
    })
}

/// POST /api/ai/sensors/insights
pub async fn sensor_insights(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SensorBody>,
) -> Result<ApiResponse<SensorPayload>, ApiError> {
    let reading = validate_reading(body)?;
    if reading.ph.is_some() {
        tracing::debug!("pH reading accepted but not forwarded to insights");
    }

    tracing::info!(operation = %Operation::SensorInsights, "Dispatching");
    let outcome = state.ai.sensor_insights(reading.insight_request()).await;

    let timestamp = state.now().to_rfc3339_opts(SecondsFormat::Millis, true);
    normalize(Operation::SensorInsights, outcome, |o| SensorPayload {
        recommendations: extract_recommendations(&o.message),
        insights: o.message,
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::handlers::testing::{Call, LEAKY_FAILURE, STUB_INSIGHTS, StubAi, body, state};
    use crate::lab::InsightRequest;

    #[test]
    fn scenario_validation_messages() {
        let required = |raw| matches!(validate_scenario(raw), Err(ApiError::Validation(ref m)) if m == "Scenario identifier is required");
        let invalid = |raw| matches!(validate_scenario(raw), Err(ApiError::Validation(ref m)) if m == "Invalid scenario identifier");

        assert!(required(None));
        assert!(required(Some(json!(""))));
        assert!(required(Some(json!(false))));
        assert!(required(Some(json!(0))));
        assert!(required(Some(json!(0.0))));
        assert!(invalid(Some(json!("unknown_scenario"))));
        assert!(invalid(Some(json!(3))));
        assert!(invalid(Some(json!(true))));
        assert!(invalid(Some(json!({"id": "no_gloves"}))));
        assert_eq!(validate_scenario(Some(json!("no_gloves"))).unwrap(), Scenario::NoGloves);
    }

    #[test]
    fn null_scenario_deserializes_as_missing() {
        let raw: SceneBody = body(json!({"scenario": null}));
        assert!(raw.scenario.is_none());
        assert!(
            matches!(validate_scenario(raw.scenario), Err(ApiError::Validation(ref m)) if m == "Scenario identifier is required")
        );
    }

    #[tokio::test]
    async fn falsy_scenario_is_required_not_invalid() {
        for raw in [json!({"scenario": false}), json!({"scenario": 0})] {
            let ai = StubAi::succeeding();
            let err = analyze_scene(State(state(ai.clone())), ApiJson(body(raw)))
                .await
                .unwrap_err();
            assert_eq!(err.to_signal().message, "Scenario identifier is required");
            assert!(ai.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn unknown_scenario_is_not_dispatched() {
        let ai = StubAi::succeeding();
        let err = analyze_scene(State(state(ai.clone())), ApiJson(body(json!({"scenario": "unknown_scenario"}))))
            .await
            .unwrap_err();
        assert_eq!(err.status_code().as_u16(), 400);
        assert!(ai.calls().is_empty());
    }

    #[tokio::test]
    async fn spill_scenario_returns_alert_and_severity() {
        let ai = StubAi::succeeding();
        let response = analyze_scene(State(state(ai.clone())), ApiJson(body(json!({"scenario": "spill_detected"}))))
            .await
            .unwrap();

        assert_eq!(ai.calls(), vec![Call::Scene(Scenario::SpillDetected)]);
        let payload = serde_json::to_value(&response.payload).unwrap();
        assert_eq!(payload, json!({"scenario": "spill_detected", "alert": "stub alert", "severity": "high"}));
    }

    #[tokio::test]
    async fn audio_requires_command() {
        for raw in [json!({}), json!({"audioCommand": ""}), json!({"audioCommand": null})] {
            let ai = StubAi::succeeding();
            let err = transcribe_audio(State(state(ai.clone())), ApiJson(body(raw)))
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::Validation(ref m) if m == "Audio command identifier is required"));
            assert!(ai.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn audio_dispatches_identifier() {
        let ai = StubAi::succeeding();
        let response = transcribe_audio(State(state(ai.clone())), ApiJson(body(json!({"audioCommand": "log_sample"}))))
            .await
            .unwrap();
        assert_eq!(ai.calls(), vec![Call::Audio(AudioCommand::Identifier("log_sample".into()))]);
        assert_eq!(response.payload.transcription, "stub transcript");
        assert_eq!(response.payload.confidence, 0.9);
    }

    #[tokio::test]
    async fn command_requires_text() {
        let ai = StubAi::succeeding();
        let err = interpret_command(State(state(ai.clone())), ApiJson(body(json!({"text": ""}))))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m == "Command text is required"));
        assert!(ai.calls().is_empty());
    }

    #[tokio::test]
    async fn command_failure_hides_backend_detail() {
        let ai = StubAi::failing();
        let err = interpret_command(State(state(ai)), ApiJson(body(json!({"text": "pause run"}))))
            .await
            .unwrap_err();
        assert_eq!(err.to_signal().message, "Failed to interpret command");
        assert!(!err.to_signal().message.contains(LEAKY_FAILURE));
    }

    #[test]
    fn reading_requires_temperature_and_humidity() {
        let err = validate_reading(body(json!({"temperature": 21}))).unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m == "Temperature and humidity are required"));

        let err = validate_reading(body(json!({"temperature": "warm", "humidity": 40}))).unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m == "Temperature must be numeric"));

        let err = validate_reading(body(json!({"temperature": 21, "humidity": []}))).unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m == "Humidity must be numeric"));
    }

    #[test]
    fn optional_readings_are_absent_not_zero() {
        let reading = validate_reading(body(json!({
            "temperature": "22.5",
            "humidity": 45,
            "pressure": "1013",
            "oxygen": "n/a"
        })))
        .unwrap();
        assert_eq!(reading.temperature, 22.5);
        assert_eq!(reading.pressure, Some(1013.0));
        assert_eq!(reading.co2, None);
        assert_eq!(reading.oxygen, None);
    }

    #[tokio::test]
    async fn sensor_dispatch_coerces_and_drops_ph() {
        let ai = StubAi::succeeding();
        let raw = json!({"temperature": 21, "humidity": "40", "pressure": "1013", "ph": 7.2});
        let response = sensor_insights(State(state(ai.clone())), ApiJson(body(raw)))
            .await
            .unwrap();

        // pH is accepted but never reaches the backend or the response.
        assert_eq!(
            ai.calls(),
            vec![Call::Sensors(InsightRequest {
                temperature: 21.0,
                humidity: 40.0,
                pressure: Some(1013.0),
                co2: None,
                oxygen: None,
            })]
        );
        let payload = serde_json::to_value(&response.payload).unwrap();
        assert!(payload.get("ph").is_none());
        assert_eq!(payload["insights"], STUB_INSIGHTS);
        assert_eq!(payload["recommendations"], json!(["Recommendation: keep incubator doors closed."]));
        assert_eq!(payload["timestamp"], "2024-05-01T12:00:00.000Z");
    }

    #[tokio::test]
    async fn sensor_backend_failure() {
        let ai = StubAi::failing();
        let err = sensor_insights(State(state(ai)), ApiJson(body(json!({"temperature": 1, "humidity": 2}))))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Backend("Failed to generate insights for sensor data")));
    }

    #[tokio::test]
    async fn identical_requests_yield_identical_envelopes() {
        let ai = StubAi::succeeding();
        let raw = json!({"temperature": 21, "humidity": 40, "co2": 600});
        let first = sensor_insights(State(state(ai.clone())), ApiJson(body(raw.clone())))
            .await
            .unwrap();
        let second = sensor_insights(State(state(ai.clone())), ApiJson(body(raw)))
            .await
            .unwrap();
        assert_eq!(serde_json::to_vec(&first).unwrap(), serde_json::to_vec(&second).unwrap());
    }
}
