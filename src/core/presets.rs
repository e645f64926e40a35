use serde::Serialize;

/// Canned inputs for a persona.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetProfile {
    pub annual_estimate: f64,
    pub start_month: u32,
    pub description: &'static str,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Preset {
    /// No canned values; the caller supplies its own numbers.
    Custom,
    HighCostOncology,
    InsulinDependent,
    ChronicMixedMeds,
    OccasionalUser,
}

pub const CUSTOM_HINT: &str = "Enter your own numbers.";

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Custom,
        Preset::HighCostOncology,
        Preset::InsulinDependent,
        Preset::ChronicMixedMeds,
        Preset::OccasionalUser,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Preset::Custom => "Custom",
            Preset::HighCostOncology => "High cost oncology patient",
            Preset::InsulinDependent => "Insulin dependent diabetic",
            Preset::ChronicMixedMeds => "Chronic condition on mixed meds",
            Preset::OccasionalUser => "Occasional user",
        }
    }

    pub fn profile(self) -> Option<PresetProfile> {
        match self {
            Preset::Custom => None,
            Preset::HighCostOncology => Some(PresetProfile {
                annual_estimate: 5000.0,
                start_month: 2,
                description: "Very high cost drugs, likely to hit the cap early in the year.",
            }),
            Preset::InsulinDependent => Some(PresetProfile {
                annual_estimate: 2500.0,
                start_month: 1,
                description: "Steady monthly use of insulin and other meds.",
            }),
            Preset::ChronicMixedMeds => Some(PresetProfile {
                annual_estimate: 1800.0,
                start_month: 1,
                description: "Multiple chronic medications, moderate annual costs.",
            }),
            Preset::OccasionalUser => Some(PresetProfile {
                annual_estimate: 600.0,
                start_month: 1,
                description: "Only occasional prescriptions through the year.",
            }),
        }
    }

    pub fn description(self) -> &'static str {
        self.profile()
            .map(|profile| profile.description)
            .unwrap_or(CUSTOM_HINT)
    }

    /// Case-insensitive lookup by display label.
    pub fn from_label(label: &str) -> Option<Preset> {
        let wanted = label.trim();
        Preset::ALL
            .into_iter()
            .find(|preset| preset.label().eq_ignore_ascii_case(wanted))
    }
}
