use thiserror::Error;

/// Rejected user input, reported before the allocation engine is called.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("Please enter an annual out of pocket estimate.")]
    MissingAnnualEstimate,

    #[error("Annual estimate must be a number, got {0:?}.")]
    InvalidAnnualEstimate(String),

    #[error("Annual estimate must be a finite number >= 0, got {0}.")]
    AnnualEstimateOutOfRange(f64),

    #[error("Please enter a start month between 1 and 12.")]
    MissingStartMonth,

    #[error("Start month must be a whole number between 1 and 12, got {0:?}.")]
    InvalidStartMonth(String),

    #[error("Start month must be between 1 and 12, got {0}.")]
    StartMonthOutOfRange(i64),

    #[error("Unknown preset {0:?}.")]
    UnknownPreset(String),
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CliResult<T> = Result<T, CliError>;
