//! Core contracts for the retail simulator.
//!
//! This crate defines the canonical record types shared across the
//! simulation, enrichment, and persistence crates, plus configuration
//! resolution: defaults, deep merge, validation, and early parsing of the
//! backend selector into a tagged variant.

pub mod config;
pub mod error;
pub mod types;

pub use config::{
    BackendSpec, EnrichmentConfig, MetricsParams, ResolvedConfig, RuleConfig, StageConfig,
    SynthesizerConfig, deep_merge, default_config, load_config, resolve_config,
};
pub use error::{ConfigError, ConfigResult};
pub use types::{EnrichedProduct, Product, Sale, round2};

/// Date format used for every calendar date in configs, tables, and ids.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
