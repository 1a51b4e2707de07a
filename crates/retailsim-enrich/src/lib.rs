//! Enrichment treatment engine.
//!
//! Assigns a treatment flag to a seeded, fixed-size sample of products,
//! parses effect specifications from config, and applies effect functions
//! to the sales of treated products. Effect functions own the cutover
//! comparison: the engine never pre-filters rows by date, so a correct
//! effect is a no-op for sales strictly before the cutover.

pub mod apply;
pub mod assign;
pub mod effect;
pub mod errors;
pub mod library;
pub mod spec;

pub use apply::apply_enrichment_to_sales;
pub use assign::assign_enrichment;
pub use effect::{EffectContext, EffectFn, EffectParams, EnrichmentPhase, classify};
pub use errors::{EnrichError, EnrichResult};
pub use library::{DEFAULT_EFFECT_SIZE, RAMP_DAYS, combined_boost, probability_boost, quantity_boost};
pub use spec::{BUILTIN_EFFECT_MODULE, EffectSpec, parse_effect_spec};
