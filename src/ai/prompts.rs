//! Prompt construction for each collaborator operation.

use super::types::{ChatMessage, DataType};
use crate::lab::sensors::RECOMMENDATION_MARKER;
use crate::lab::{AudioCommand, InsightRequest, Scenario};

/// Confidence reported for recordings with a canned utterance.
pub const KNOWN_COMMAND_CONFIDENCE: f64 = 0.94;
/// Confidence reported for free-form descriptors.
pub const DESCRIPTOR_CONFIDENCE: f64 = 0.82;
/// Confidence reported for identifiers without a canned utterance.
pub const UNKNOWN_COMMAND_CONFIDENCE: f64 = 0.71;

const LAB_ASSISTANT_PERSONA: &str = "You are a laboratory assistant for a genomics research platform. \
You help researchers work safely and keep accurate records. Be concise and concrete.";

/// Messages for a blockchain guidance request.
pub fn guidance_messages(wallet_address: &str, data_type: DataType) -> Vec<ChatMessage> {
    let focus = match data_type {
        DataType::Prediction => {
            "storing gene-editing prediction results on-chain: what to hash, what to keep off-chain, and how to make a result verifiable later"
        }
        DataType::Monitoring => {
            "anchoring lab monitoring data on-chain: batching sensor logs, timestamping, and proving that readings were not altered"
        }
    };
    vec![
        ChatMessage::system(format!(
            "{LAB_ASSISTANT_PERSONA} You also advise on recording research data on a blockchain."
        )),
        ChatMessage::user(format!(
            "My wallet address is {wallet_address}. Give me step-by-step guidance on {focus}. \
             Keep it under 200 words."
        )),
    ]
}

/// Messages for a simulated scene analysis.
pub fn scene_messages(scenario: Scenario) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(format!(
            "{LAB_ASSISTANT_PERSONA} You monitor a lab camera feed and raise safety alerts."
        )),
        ChatMessage::user(format!(
            "Camera observation: {}\n\nWrite one short alert (at most two sentences) for the people in the lab. \
             If nothing is wrong, say so briefly.",
            scenario.scene_description()
        )),
    ]
}

/// Messages for a simulated transcription, plus the confidence to report.
pub fn transcription_messages(command: &AudioCommand) -> (Vec<ChatMessage>, f64) {
    let system = ChatMessage::system(format!(
        "{LAB_ASSISTANT_PERSONA} You act as a speech-to-text engine. Reply with the transcript only."
    ));
    match (command, command.known_utterance()) {
        (_, Some(utterance)) => (
            vec![
                system,
                ChatMessage::user(format!(
                    "The recording contains this utterance: \"{utterance}\". Return the transcript exactly as spoken."
                )),
            ],
            KNOWN_COMMAND_CONFIDENCE,
        ),
        (AudioCommand::Descriptor(descriptor), None) => (
            vec![
                system,
                ChatMessage::user(format!(
                    "Produce a plausible transcript of a researcher speaking in the lab, matching this description: {}",
                    serde_json::Value::Object(descriptor.clone())
                )),
            ],
            DESCRIPTOR_CONFIDENCE,
        ),
        (AudioCommand::Identifier(id), None) => (
            vec![
                system,
                ChatMessage::user(format!(
                    "Produce a plausible transcript of a researcher giving the lab command \"{}\".",
                    id.replace('_', " ")
                )),
            ],
            UNKNOWN_COMMAND_CONFIDENCE,
        ),
    }
}

/// Messages for interpreting a lab command.
pub fn command_messages(text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(format!(
            "{LAB_ASSISTANT_PERSONA} Interpret commands given to lab equipment. \
             State the intended action, the target device, any parameters, and any safety concern."
        )),
        ChatMessage::user(text.to_string()),
    ]
}

/// Messages for sensor insights. Readings that are absent are left out.
pub fn sensor_messages(request: &InsightRequest) -> Vec<ChatMessage> {
    let mut readings = vec![
        format!("- Temperature: {} °C", request.temperature),
        format!("- Humidity: {} %", request.humidity),
    ];
    if let Some(pressure) = request.pressure {
        readings.push(format!("- Pressure: {pressure} hPa"));
    }
    if let Some(co2) = request.co2 {
        readings.push(format!("- CO2: {co2} ppm"));
    }
    if let Some(oxygen) = request.oxygen {
        readings.push(format!("- Oxygen: {oxygen} %"));
    }

    vec![
        ChatMessage::system(format!(
            "{LAB_ASSISTANT_PERSONA} You analyse environmental sensor data for a wet lab."
        )),
        ChatMessage::user(format!(
            "Current readings:\n{}\n\nAssess whether these conditions suit sample storage and experiments. \
             Separate paragraphs with a blank line. Start every actionable paragraph with \"{RECOMMENDATION_MARKER}:\".",
            readings.join("\n")
        )),
    ]
}
