//! Audio command descriptors for simulated transcription.

use serde::Serialize;
use serde_json::{Map, Value};

/// Commands the simulated microphone has canned recordings for.
pub const KNOWN_COMMANDS: [(&str, &str); 5] = [
    ("start_centrifuge", "Start the centrifuge at four thousand RPM for ten minutes."),
    ("record_observation", "Record observation: colonies on plate three show blue-white screening."),
    ("check_temperature", "What is the current temperature inside incubator two?"),
    ("log_sample", "Log sample B-twelve as received and stored at minus eighty."),
    ("emergency_stop", "Emergency stop. Shut down all running equipment now."),
];

/// A simulated audio input: a recording identifier or a free-form descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AudioCommand {
    Identifier(String),
    Descriptor(Map<String, Value>),
}

impl AudioCommand {
    /// Read an audio command from a request field.
    ///
    /// Blank strings, empty objects and non-string, non-object values do not
    /// count as present.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(Self::Identifier(s)),
            Value::Object(map) if !map.is_empty() => Some(Self::Descriptor(map)),
            _ => None,
        }
    }

    /// Canned utterance for a known identifier.
    pub fn known_utterance(&self) -> Option<&'static str> {
        match self {
            Self::Identifier(id) => KNOWN_COMMANDS
                .iter()
                .find(|(known, _)| *known == id.as_str())
                .map(|(_, utterance)| *utterance),
            Self::Descriptor(_) => None,
        }
    }
}
