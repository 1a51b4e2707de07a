use thiserror::Error;

/// Errors emitted by the enrichment engine.
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("enrichment fraction must be within [0, 1], got {0}")]
    InvalidFraction(f64),
    #[error("invalid effect spec: {0}")]
    InvalidEffectSpec(String),
}

/// Convenience alias for enrichment results.
pub type EnrichResult<T> = std::result::Result<T, EnrichError>;
