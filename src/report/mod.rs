mod chart;
mod format;
mod narrative;

pub use chart::{
    ChartOptions, ChartSeries, render_line_chart, scenario_chart, smoothing_chart,
};
pub use format::{format_currency, format_month_table, format_number};
pub use narrative::narrative;

use serde::Serialize;

use crate::core::{MONTH_NAMES, ScenarioSet, SummaryStats};
use crate::input::ScenarioRequest;

/// Everything a presentation layer shows for one run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    pub preset: &'static str,
    pub preset_description: &'static str,
    pub months: [&'static str; 12],
    pub scenarios: ScenarioSet,
    pub summary: SummaryStats,
    pub narrative: String,
}

impl ScenarioReport {
    pub fn build(request: &ScenarioRequest) -> Self {
        let scenarios = request.run();
        let summary = scenarios.summary();
        let narrative = narrative(
            request.subject(),
            scenarios.annual_estimate,
            scenarios.start_month,
            &summary,
        );
        Self {
            preset: request.preset.label(),
            preset_description: request.preset.description(),
            months: MONTH_NAMES,
            scenarios,
            summary,
            narrative,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Preset;

    #[test]
    fn report_uses_preset_in_narrative() {
        let request = ScenarioRequest::resolve(Some(Preset::InsulinDependent), None, None)
            .expect("preset supplies inputs");
        let report = ScenarioReport::build(&request);
        assert_eq!(report.preset, "Insulin dependent diabetic");
        assert_eq!(report.scenarios.start_month, 1);
        assert!(report.narrative.starts_with("Insulin dependent diabetic with"));
        assert!((report.summary.amount_avoided - 500.0).abs() < 1e-6);
    }

    #[test]
    fn report_serializes_camel_case_fields() {
        let request = ScenarioRequest::resolve(None, Some(3000.0), Some(7)).expect("valid");
        let json = serde_json::to_string(&ScenarioReport::build(&request)).expect("serializes");
        assert!(json.contains("\"presetDescription\""));
        assert!(json.contains("\"annualEstimate\":3000.0"));
        assert!(json.contains("\"startMonth\":7"));
        assert!(json.contains("\"amountAvoided\""));
        assert!(json.contains("\"peakMonthIndex\""));
        assert!(json.contains("\"smoothed\":["));
        assert!(json.contains("\"months\":[\"Jan\""));
    }
}
