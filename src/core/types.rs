use serde::Serialize;

pub const MONTHS_IN_YEAR: usize = 12;

/// Annual out-of-pocket ceiling applied by the capped scenarios.
pub const CAP: f64 = 2000.0;

/// Share of a year's spending expected in each calendar month, January first.
pub const MONTHLY_WEIGHTS: [f64; MONTHS_IN_YEAR] = [
    0.15, 0.12, 0.11, 0.10, 0.10, 0.08, 0.08, 0.07, 0.07, 0.06, 0.04, 0.02,
];

pub const MONTH_NAMES: [&str; MONTHS_IN_YEAR] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One payment per calendar month.
pub type MonthlyPayments = [f64; MONTHS_IN_YEAR];

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    Uncapped,
    Capped,
    CappedSmoothed,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [
        Scenario::Uncapped,
        Scenario::Capped,
        Scenario::CappedSmoothed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Scenario::Uncapped => "No cap",
            Scenario::Capped => "Cap only",
            Scenario::CappedSmoothed => "Cap + smoothing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSet {
    pub annual_estimate: f64,
    pub start_month: u32,
    pub uncapped: MonthlyPayments,
    pub capped: MonthlyPayments,
    pub smoothed: MonthlyPayments,
}

impl ScenarioSet {
    pub fn series(&self, scenario: Scenario) -> &MonthlyPayments {
        match scenario {
            Scenario::Uncapped => &self.uncapped,
            Scenario::Capped => &self.capped,
            Scenario::CappedSmoothed => &self.smoothed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStats {
    pub total: f64,
    pub peak: f64,
    /// Zero-based month index of the first month reaching `peak`.
    pub peak_month_index: usize,
}

impl SeriesStats {
    pub fn peak_month_name(&self) -> &'static str {
        MONTH_NAMES[self.peak_month_index]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub uncapped: SeriesStats,
    pub capped: SeriesStats,
    pub smoothed: SeriesStats,
    pub amount_avoided: f64,
}
