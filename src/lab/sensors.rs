//! Sensor readings: numeric coercion and recommendation filtering.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

/// Marker the insight text uses to flag an actionable paragraph.
pub const RECOMMENDATION_MARKER: &str = "Recommendation";

static LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").expect("valid float pattern")
});

/// One set of environmental readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorReading {
    pub temperature: f64,
    pub humidity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub co2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oxygen: Option<f64>,
    /// Accepted from clients but not sent to the insights backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ph: Option<f64>,
}

impl SensorReading {
    /// The readings forwarded to the insights backend. `ph` is not among them.
    pub fn insight_request(&self) -> InsightRequest {
        InsightRequest {
            temperature: self.temperature,
            humidity: self.humidity,
            pressure: self.pressure,
            co2: self.co2,
            oxygen: self.oxygen,
        }
    }
}

/// Arguments of a sensor insights call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InsightRequest {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: Option<f64>,
    pub co2: Option<f64>,
    pub oxygen: Option<f64>,
}

/// Coerce a JSON value to a finite number.
///
/// Numbers pass through. Strings are read by their leading numeric prefix,
/// so `"1013 hPa"` is 1013 and `"hPa"` is not a number.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => LEADING_FLOAT
            .find(s.trim_start())
            .and_then(|m| m.as_str().parse::<f64>().ok()),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Keep the blank-line separated segments of `insights` that mention the
/// recommendation marker, in their original order.
pub fn extract_recommendations(insights: &str) -> Vec<String> {
    insights
        .split("\n\n")
        .filter(|segment| segment.contains(RECOMMENDATION_MARKER))
        .map(str::to_string)
        .collect()
}
