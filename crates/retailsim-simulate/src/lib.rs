//! Simulation engine for synthetic e-commerce catalog and transaction
//! data.
//!
//! The pipeline is: resolved configuration → backend dispatch → seeded
//! rule-based (or external synthesizer) generation → optional enrichment
//! treatment → job-based persistence. Pluggable behavior goes through an
//! explicit [`Registry`] value handed to the [`Simulator`], so tests and
//! embedders each own their function table.

pub mod backend;
pub mod engine;
pub mod errors;
pub mod registry;
pub mod rules;

pub use backend::{Backend, Synthesizer};
pub use engine::{SimulationOutput, SimulationRun, Simulator};
pub use errors::{SimResult, SimulationError};
pub use registry::{
    CharacteristicsFn, CharacteristicsRequest, FunctionKind, FunctionModule, MetricsFn,
    MetricsRequest, Registry,
};
pub use rules::{generate_characteristics, generate_sales};
