mod engine;
mod presets;
mod types;

pub use engine::{
    allocate_capped, allocate_capped_smoothed, allocate_uncapped, clamp_start_month,
    run_scenarios, series_stats, summarize,
};
pub use presets::{CUSTOM_HINT, Preset, PresetProfile};
pub use types::{
    CAP, MONTH_NAMES, MONTHLY_WEIGHTS, MONTHS_IN_YEAR, MonthlyPayments, Scenario, ScenarioSet,
    SeriesStats, SummaryStats,
};
