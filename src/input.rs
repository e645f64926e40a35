//! Validation of raw user input shared by the HTTP API and the CLI.

use crate::core::{Preset, ScenarioSet, run_scenarios};
use crate::error::InputError;

/// Start month used when neither the caller nor a preset supplies one.
pub const DEFAULT_START_MONTH: u32 = 1;

/// Parses an annual estimate typed by a user. Accepts an optional leading `$`
/// and `,` thousands separators.
pub fn parse_annual_estimate(raw: &str) -> Result<f64, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::MissingAnnualEstimate);
    }
    let cleaned: String = trimmed
        .strip_prefix('$')
        .unwrap_or(trimmed)
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let value = cleaned
        .trim()
        .parse::<f64>()
        .map_err(|_| InputError::InvalidAnnualEstimate(trimmed.to_string()))?;
    validate_annual_estimate(value)
}

pub fn validate_annual_estimate(value: f64) -> Result<f64, InputError> {
    if !value.is_finite() || value < 0.0 {
        return Err(InputError::AnnualEstimateOutOfRange(value));
    }
    Ok(value)
}

pub fn parse_start_month(raw: &str) -> Result<u32, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::MissingStartMonth);
    }
    let value = trimmed
        .parse::<i64>()
        .map_err(|_| InputError::InvalidStartMonth(trimmed.to_string()))?;
    validate_start_month(value)
}

pub fn validate_start_month(value: i64) -> Result<u32, InputError> {
    if !(1..=12).contains(&value) {
        return Err(InputError::StartMonthOutOfRange(value));
    }
    Ok(value as u32)
}

pub fn parse_preset(raw: &str) -> Result<Preset, InputError> {
    Preset::from_label(raw).ok_or_else(|| InputError::UnknownPreset(raw.trim().to_string()))
}

/// Validated inputs for one scenario run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioRequest {
    pub annual_estimate: f64,
    pub start_month: u32,
    pub preset: Preset,
}

impl ScenarioRequest {
    /// Explicit values win over the preset's canned values.
    pub fn resolve(
        preset: Option<Preset>,
        annual_estimate: Option<f64>,
        start_month: Option<i64>,
    ) -> Result<Self, InputError> {
        let preset = preset.unwrap_or(Preset::Custom);
        let profile = preset.profile();

        let annual_estimate = match annual_estimate {
            Some(value) => validate_annual_estimate(value)?,
            None => profile
                .map(|p| p.annual_estimate)
                .ok_or(InputError::MissingAnnualEstimate)?,
        };
        let start_month = match start_month {
            Some(value) => validate_start_month(value)?,
            None => profile
                .map(|p| p.start_month)
                .unwrap_or(DEFAULT_START_MONTH),
        };

        Ok(Self {
            annual_estimate,
            start_month,
            preset,
        })
    }

    pub fn run(&self) -> ScenarioSet {
        run_scenarios(self.annual_estimate, i64::from(self.start_month))
    }

    /// Name used in the narrative: the preset label when it carries a profile.
    pub fn subject(&self) -> &'static str {
        if self.preset.profile().is_some() {
            self.preset.label()
        } else {
            "This example"
        }
    }
}
