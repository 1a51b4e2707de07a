use thiserror::Error;

/// Configuration resolution errors. All of these are fatal: callers fix the
/// config and re-invoke, nothing here is retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// A required field is absent or empty.
    #[error("missing required config field '{0}'")]
    MissingField(String),
    /// A field is present but has the wrong type or an out-of-domain value.
    #[error("invalid value for config field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("invalid date in config field '{field}': '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { field: String, value: String },
    #[error("invalid date range: DATE_START {start} is after DATE_END {end}")]
    InvalidDateRange { start: String, end: String },
    #[error("ENRICHMENT.START_DATE {start_date} is outside the baseline window [{date_start}, {date_end}]")]
    EnrichmentWindow {
        start_date: String,
        date_start: String,
        date_end: String,
    },
    /// None of the recognized backend keys is present.
    #[error("config must contain exactly one backend key, none of {0:?} found")]
    NoBackendSpecified(Vec<&'static str>),
    /// More than one backend key is present.
    #[error("ambiguous backend selection, config contains {0:?}")]
    AmbiguousBackend(Vec<&'static str>),
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
