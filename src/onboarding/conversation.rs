//! Conversation assembly for onboarding turns.

use crate::ai::ChatMessage;

/// Persona and goal of the onboarding assistant. Always the first message.
pub const ONBOARDING_SYSTEM_PROMPT: &str = "You are the onboarding guide for a gene-editing research studio. \
Your goal is to learn enough about the user to personalise their workspace. \
Find out whether they are a student or a researcher, how much experience they have with CRISPR, \
and which topics they care about most. Ask one thing at a time, keep replies short and friendly, \
and do not overload them with information.";

/// Build the message sequence for one onboarding turn: the system prompt,
/// then prior history in its original order, then the newest user message.
pub fn assemble_conversation(history: Vec<ChatMessage>, message: &str) -> Vec<ChatMessage> {
    let mut conversation = Vec::with_capacity(history.len() + 2);
    conversation.push(ChatMessage::system(ONBOARDING_SYSTEM_PROMPT));
    conversation.extend(history);
    conversation.push(ChatMessage::user(message));
    conversation
}
