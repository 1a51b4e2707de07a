//! Backend dispatch between generation strategies.
//!
//! The resolved configuration already carries a tagged
//! [`BackendSpec`], so dispatch here is a straight enum construction:
//! the rule backend binds the configured registry functions, the
//! synthesizer backend wraps an externally supplied [`Synthesizer`].

use std::sync::Arc;

use rand::RngCore;

use retailsim_core::{BackendSpec, Product, RuleConfig, Sale, SynthesizerConfig};

use crate::errors::{SimResult, SimulationError};
use crate::registry::{
    CharacteristicsFn, CharacteristicsRequest, MetricsFn, MetricsRequest, Registry,
};

/// Contract an external statistical synthesizer must satisfy to serve as
/// a backend. The library ships no implementation; training and sampling
/// are an external collaborator's concern.
pub trait Synthesizer: Send + Sync {
    fn simulate_characteristics(&self, config: &SynthesizerConfig) -> SimResult<Vec<Product>>;

    fn simulate_metrics(
        &self,
        products: &[Product],
        config: &SynthesizerConfig,
    ) -> SimResult<Vec<Sale>>;
}

/// The capability set of generation strategies.
pub enum Backend {
    Rule(RuleBackend),
    Synthesizer(SynthesizerBackend),
}

/// Rule-based backend: configured function names resolved through the
/// registry at construction time, so an unknown name fails before any
/// generation starts.
pub struct RuleBackend {
    config: RuleConfig,
    characteristics_fn: CharacteristicsFn,
    metrics_fn: MetricsFn,
}

/// Synthesizer-backed strategy; generation is delegated wholesale.
pub struct SynthesizerBackend {
    config: SynthesizerConfig,
    synthesizer: Arc<dyn Synthesizer>,
}

impl Backend {
    /// Construct the backend selected by the config.
    pub fn from_spec(
        spec: &BackendSpec,
        registry: &Registry,
        synthesizer: Option<Arc<dyn Synthesizer>>,
    ) -> SimResult<Backend> {
        match spec {
            BackendSpec::Rule(config) => Ok(Backend::Rule(RuleBackend {
                characteristics_fn: registry.characteristics(&config.characteristics.function)?,
                metrics_fn: registry.metrics(&config.metrics.function)?,
                config: config.clone(),
            })),
            BackendSpec::Synthesizer(config) => {
                let synthesizer = synthesizer.ok_or(SimulationError::SynthesizerUnavailable)?;
                Ok(Backend::Synthesizer(SynthesizerBackend {
                    config: config.clone(),
                    synthesizer,
                }))
            }
        }
    }

    pub fn simulate_characteristics(&self, rng: &mut dyn RngCore) -> SimResult<Vec<Product>> {
        match self {
            Backend::Rule(backend) => {
                let request = CharacteristicsRequest {
                    num_products: backend.config.num_products,
                    params: backend.config.characteristics.params.clone(),
                };
                (backend.characteristics_fn)(&request, rng)
            }
            Backend::Synthesizer(backend) => backend
                .synthesizer
                .simulate_characteristics(&backend.config),
        }
    }

    pub fn simulate_metrics(
        &self,
        products: &[Product],
        rng: &mut dyn RngCore,
    ) -> SimResult<Vec<Sale>> {
        match self {
            Backend::Rule(backend) => {
                let params = backend.config.metrics_params;
                let request = MetricsRequest {
                    date_start: params.date_start,
                    date_end: params.date_end,
                    sale_probability: params.sale_probability,
                    params: backend.config.metrics.params.clone(),
                };
                (backend.metrics_fn)(products, &request, rng)
            }
            Backend::Synthesizer(backend) => backend
                .synthesizer
                .simulate_metrics(products, &backend.config),
        }
    }
}
