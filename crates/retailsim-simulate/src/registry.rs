//! Explicit function registry for pluggable generation and enrichment
//! behavior.
//!
//! The registry is a plain value handed to the [`Simulator`], not a
//! process-wide map: each embedder (and each test) constructs its own,
//! pre-seeded with the built-in defaults. Re-registering a name overwrites
//! silently; explicit override is the supported customization pattern.
//!
//! [`Simulator`]: crate::engine::Simulator

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use rand::RngCore;
use serde_json::{Map, Value};

use retailsim_core::{Product, Sale};
use retailsim_enrich::{EffectFn, combined_boost, probability_boost, quantity_boost};

use crate::errors::{SimResult, SimulationError};
use crate::rules;

/// Kinds of pluggable functions the registry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Characteristics,
    Metrics,
    Enrichment,
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FunctionKind::Characteristics => "characteristics",
            FunctionKind::Metrics => "metrics",
            FunctionKind::Enrichment => "enrichment",
        };
        f.write_str(label)
    }
}

/// Inputs for a characteristics generation call.
#[derive(Debug, Clone)]
pub struct CharacteristicsRequest {
    pub num_products: usize,
    /// Raw stage params, passed through for custom generators.
    pub params: Map<String, Value>,
}

/// Inputs for a metrics generation call.
#[derive(Debug, Clone)]
pub struct MetricsRequest {
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub sale_probability: f64,
    /// Raw stage params, passed through for custom generators.
    pub params: Map<String, Value>,
}

/// A registered characteristics generator.
pub type CharacteristicsFn =
    Arc<dyn Fn(&CharacteristicsRequest, &mut dyn RngCore) -> SimResult<Vec<Product>> + Send + Sync>;

/// A registered metrics generator.
pub type MetricsFn = Arc<
    dyn Fn(&[Product], &MetricsRequest, &mut dyn RngCore) -> SimResult<Vec<Sale>> + Send + Sync,
>;

/// A named bundle of registerable functions.
///
/// This is the capability-interface form of plugin loading: anything that
/// exposes functions of the expected signatures under a discoverable
/// module name can be adapted into registry entries, no dynamic loading
/// involved.
pub trait FunctionModule: Send + Sync {
    fn name(&self) -> &str;

    fn characteristics(&self) -> Vec<(String, CharacteristicsFn)> {
        Vec::new()
    }

    fn metrics(&self) -> Vec<(String, MetricsFn)> {
        Vec::new()
    }

    fn effects(&self) -> Vec<(String, EffectFn)> {
        Vec::new()
    }
}

/// The built-in effect library exposed as a provider module, so
/// `register_module` and structured effect specs can address it by name.
struct BuiltinEffects;

impl FunctionModule for BuiltinEffects {
    fn name(&self) -> &str {
        retailsim_enrich::BUILTIN_EFFECT_MODULE
    }

    fn effects(&self) -> Vec<(String, EffectFn)> {
        vec![
            ("quantity_boost".to_string(), Arc::new(quantity_boost) as EffectFn),
            ("probability_boost".to_string(), Arc::new(probability_boost) as EffectFn),
            ("combined_boost".to_string(), Arc::new(combined_boost) as EffectFn),
        ]
    }
}

/// Mapping from symbolic names to callables, per function kind.
#[derive(Default)]
pub struct Registry {
    characteristics: HashMap<String, CharacteristicsFn>,
    metrics: HashMap<String, MetricsFn>,
    effects: HashMap<String, EffectFn>,
    providers: Vec<Arc<dyn FunctionModule>>,
}

impl Registry {
    /// An empty registry with no functions and no providers.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry pre-seeded with the rule-based generators under
    /// `"default"` and the built-in effect library.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();

        let default_characteristics: CharacteristicsFn =
            Arc::new(|request: &CharacteristicsRequest, rng: &mut dyn RngCore| {
                Ok(rules::generate_characteristics_with(
                    request.num_products,
                    rng,
                ))
            });
        registry.register_characteristics("default", default_characteristics);

        let default_metrics: MetricsFn =
            Arc::new(|products: &[Product], request: &MetricsRequest, rng: &mut dyn RngCore| {
                rules::generate_sales_with(
                    products,
                    request.date_start,
                    request.date_end,
                    request.sale_probability,
                    rng,
                )
            });
        registry.register_metrics("default", default_metrics);

        let effects = BuiltinEffects;
        for (name, f) in effects.effects() {
            registry.register_effect(name, f);
        }
        registry.install_module(Arc::new(effects));
        registry
    }

    pub fn register_characteristics(&mut self, name: impl Into<String>, f: CharacteristicsFn) {
        self.characteristics.insert(name.into(), f);
    }

    pub fn register_metrics(&mut self, name: impl Into<String>, f: MetricsFn) {
        self.metrics.insert(name.into(), f);
    }

    pub fn register_effect(&mut self, name: impl Into<String>, f: EffectFn) {
        self.effects.insert(name.into(), f);
    }

    pub fn characteristics(&self, name: &str) -> SimResult<CharacteristicsFn> {
        self.characteristics.get(name).cloned().ok_or_else(|| {
            SimulationError::UnknownFunction {
                kind: FunctionKind::Characteristics,
                name: name.to_string(),
            }
        })
    }

    pub fn metrics(&self, name: &str) -> SimResult<MetricsFn> {
        self.metrics
            .get(name)
            .cloned()
            .ok_or_else(|| SimulationError::UnknownFunction {
                kind: FunctionKind::Metrics,
                name: name.to_string(),
            })
    }

    pub fn effect(&self, name: &str) -> SimResult<EffectFn> {
        self.effects
            .get(name)
            .cloned()
            .ok_or_else(|| SimulationError::UnknownFunction {
                kind: FunctionKind::Enrichment,
                name: name.to_string(),
            })
    }

    /// Registered names for a kind, sorted. Introspection only.
    pub fn list(&self, kind: FunctionKind) -> Vec<String> {
        let mut names: Vec<String> = match kind {
            FunctionKind::Characteristics => self.characteristics.keys().cloned().collect(),
            FunctionKind::Metrics => self.metrics.keys().cloned().collect(),
            FunctionKind::Enrichment => self.effects.keys().cloned().collect(),
        };
        names.sort();
        names
    }

    /// Make a provider module addressable by name.
    pub fn install_module(&mut self, provider: Arc<dyn FunctionModule>) {
        self.providers.push(provider);
    }

    /// Register every function of `kind` exposed by the named provider.
    /// Returns how many functions were registered.
    ///
    /// Built-in providers are searched before installed ones, mirroring
    /// the original package-namespace-first module resolution.
    pub fn register_module(&mut self, kind: FunctionKind, module_name: &str) -> SimResult<usize> {
        let provider = self
            .find_module(module_name)
            .ok_or_else(|| SimulationError::ModuleNotFound(module_name.to_string()))?;

        let mut count = 0;
        match kind {
            FunctionKind::Characteristics => {
                for (name, f) in provider.characteristics() {
                    self.characteristics.insert(name, f);
                    count += 1;
                }
            }
            FunctionKind::Metrics => {
                for (name, f) in provider.metrics() {
                    self.metrics.insert(name, f);
                    count += 1;
                }
            }
            FunctionKind::Enrichment => {
                for (name, f) in provider.effects() {
                    self.effects.insert(name, f);
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    /// Resolve an effect function by `(module, function)` as written in an
    /// effect spec. The built-in module resolves through the registry map
    /// so that explicit overrides win; other modules resolve through their
    /// provider.
    pub fn resolve_effect(&self, module: &str, function: &str) -> SimResult<EffectFn> {
        if module == retailsim_enrich::BUILTIN_EFFECT_MODULE {
            return self.effect(function);
        }

        let provider = self
            .find_module(module)
            .ok_or_else(|| SimulationError::ModuleNotFound(module.to_string()))?;
        provider
            .effects()
            .into_iter()
            .find(|(name, _)| name == function)
            .map(|(_, f)| f)
            .ok_or_else(|| SimulationError::UnknownFunction {
                kind: FunctionKind::Enrichment,
                name: format!("{module}.{function}"),
            })
    }

    fn find_module(&self, name: &str) -> Option<Arc<dyn FunctionModule>> {
        self.providers
            .iter()
            .find(|provider| provider.name() == name)
            .cloned()
    }
}
