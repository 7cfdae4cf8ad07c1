//! Simulated lab-scene scenarios.

use serde::Serialize;

/// A simulated lab condition that scene analysis can be asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    NormalLab,
    SpillDetected,
    NoGloves,
    ContaminationRisk,
    EquipmentMisuse,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::NormalLab,
        Scenario::SpillDetected,
        Scenario::NoGloves,
        Scenario::ContaminationRisk,
        Scenario::EquipmentMisuse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NormalLab => "normal_lab",
            Self::SpillDetected => "spill_detected",
            Self::NoGloves => "no_gloves",
            Self::ContaminationRisk => "contamination_risk",
            Self::EquipmentMisuse => "equipment_misuse",
        }
    }

    /// What the simulated camera "sees" for this scenario.
    pub fn scene_description(&self) -> &'static str {
        match self {
            Self::NormalLab => {
                "Researchers in lab coats and gloves work at clean benches. Reagents are capped and labelled, and the biosafety cabinet sash is at the working height."
            }
            Self::SpillDetected => {
                "A clear liquid is pooling on the bench beside an overturned tube rack, spreading toward a power strip. Nobody has placed absorbent material yet."
            }
            Self::NoGloves => {
                "A researcher is pipetting samples from a labelled biohazard container with bare hands."
            }
            Self::ContaminationRisk => {
                "Open culture plates sit outside the biosafety cabinet next to a used pipette tip box, and the cabinet sash is fully raised."
            }
            Self::EquipmentMisuse => {
                "A centrifuge is running with an unbalanced rotor load and the lid latch is not engaged. The unit is visibly vibrating."
            }
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::NormalLab => Severity::Low,
            Self::NoGloves | Self::EquipmentMisuse => Severity::Medium,
            Self::SpillDetected | Self::ContaminationRisk => Severity::High,
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scenario| scenario.as_str() == s)
            .ok_or_else(|| format!("unknown scenario: {s}"))
    }
}

/// Alert severity reported by scene analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}
