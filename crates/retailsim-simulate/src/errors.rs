use chrono::NaiveDate;
use thiserror::Error;

use retailsim_core::ConfigError;
use retailsim_enrich::EnrichError;
use retailsim_jobs::JobError;

use crate::registry::FunctionKind;

/// Errors emitted by the simulation engine. Every variant is fatal; no
/// fallback function or backend is ever substituted.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("no {kind} function registered under '{name}'")]
    UnknownFunction { kind: FunctionKind, name: String },
    #[error("function module '{0}' not found")]
    ModuleNotFound(String),
    #[error("synthesizer backend selected but no synthesizer implementation is installed")]
    SynthesizerUnavailable,
    #[error("invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Enrich(#[from] EnrichError),
    #[error(transparent)]
    Job(#[from] JobError),
}

/// Convenience alias for simulation results.
pub type SimResult<T> = std::result::Result<T, SimulationError>;
