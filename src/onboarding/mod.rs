//! Onboarding chat: a guided first conversation with a new user.
//!
//! Each turn is sent to the chat backend behind a fixed system prompt, and
//! the newest user message is scanned for profile hints.

pub mod conversation;
pub mod profile;

pub use conversation::{ONBOARDING_SYSTEM_PROMPT, assemble_conversation};
pub use profile::{ExperienceLevel, INTEREST_KEYWORDS, ProfileData, ProfileRole};
