//! Keyword heuristics that derive a profile from an onboarding message.

use serde::Serialize;

/// Interest keywords, in the order they are reported.
pub const INTEREST_KEYWORDS: [&str; 6] = ["gene editing", "crispr", "biology", "science", "dna", "research"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileRole {
    #[default]
    Student,
    Researcher,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

/// Profile attributes inferred from what a new user says about themselves.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    pub role: ProfileRole,
    pub experience_level: ExperienceLevel,
    pub interests: Vec<String>,
}

impl ProfileData {
    /// Extract a profile from a single message. Matching is case-insensitive
    /// substring search; nothing outside `message` is consulted.
    pub fn extract(message: &str) -> Self {
        let lower = message.to_lowercase();
        let mentions = |needle: &str| lower.contains(needle);

        let role = if mentions("researcher") || mentions("scientist") {
            ProfileRole::Researcher
        } else {
            ProfileRole::Student
        };

        let experience_level = if mentions("advanced") || mentions("expert") {
            ExperienceLevel::Advanced
        } else if mentions("intermediate") {
            ExperienceLevel::Intermediate
        } else {
            ExperienceLevel::Beginner
        };

        let interests = INTEREST_KEYWORDS
            .into_iter()
            .filter(|keyword| mentions(*keyword))
            .map(str::to_string)
            .collect();

        Self {
            role,
            experience_level,
            interests,
        }
    }
}
