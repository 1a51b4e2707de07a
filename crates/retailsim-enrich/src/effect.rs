use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use retailsim_core::Sale;

use crate::errors::EnrichResult;
use crate::library::RAMP_DAYS;

/// A registered treatment effect function. Takes a sale row and the
/// enrichment context, returns the transformed row as a new value.
pub type EffectFn = Arc<dyn Fn(&Sale, &EffectContext) -> EnrichResult<Sale> + Send + Sync>;

/// Context handed to every effect invocation: the cutover date plus the
/// parameter map from the effect spec.
#[derive(Debug, Clone)]
pub struct EffectContext {
    pub start: NaiveDate,
    pub params: EffectParams,
}

impl EffectContext {
    pub fn new(start: NaiveDate, params: Map<String, Value>) -> Self {
        Self {
            start,
            params: EffectParams::new(params),
        }
    }
}

/// Typed accessors over the effect parameter map.
#[derive(Debug, Clone, Default)]
pub struct EffectParams {
    map: Map<String, Value>,
}

impl EffectParams {
    pub fn new(map: Map<String, Value>) -> Self {
        Self { map }
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.map.get(key).and_then(Value::as_f64)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.map.get(key).and_then(Value::as_i64)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.map.get(key).and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Per-row treatment phase. Classification is stateless: it depends only on
/// the treatment flag and the sale date relative to the cutover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentPhase {
    Untreated,
    PreCutover,
    Ramping,
    Full,
}

/// Classify a sale row by treatment flag and date.
pub fn classify(treated: bool, date: NaiveDate, cutover: NaiveDate) -> EnrichmentPhase {
    if !treated {
        return EnrichmentPhase::Untreated;
    }
    if date < cutover {
        return EnrichmentPhase::PreCutover;
    }
    if (date - cutover).num_days() < RAMP_DAYS {
        EnrichmentPhase::Ramping
    } else {
        EnrichmentPhase::Full
    }
}
