//! Simulation entry point tying the pipeline stages together.

use std::path::Path;
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::{Map, Value};
use tracing::info;

use retailsim_core::{EnrichedProduct, Product, ResolvedConfig, Sale};
use retailsim_enrich::{apply_enrichment_to_sales, assign_enrichment, parse_effect_spec};
use retailsim_jobs::{JobInfo, save_counterfactual_sales, save_enriched_products, save_job};

use crate::backend::{Backend, Synthesizer};
use crate::errors::SimResult;
use crate::registry::Registry;

/// In-memory result of one simulation run.
///
/// When enrichment is configured, `sales` holds the factual (treated)
/// stream and `counterfactual_sales` the untreated baseline; otherwise
/// `sales` is the baseline and the optional fields are absent.
#[derive(Debug, Clone)]
pub struct SimulationOutput {
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
    pub enriched_products: Option<Vec<EnrichedProduct>>,
    pub counterfactual_sales: Option<Vec<Sale>>,
}

/// A persisted simulation run: the output plus its job handle.
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub output: SimulationOutput,
    pub job: JobInfo,
}

/// The simulation engine. Owns the function registry and an optional
/// external synthesizer; single-threaded and synchronous throughout.
pub struct Simulator {
    registry: Registry,
    synthesizer: Option<Arc<dyn Synthesizer>>,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulator {
    /// Engine with the default registry (rule-based generators plus the
    /// built-in effect library).
    pub fn new() -> Self {
        Self::with_registry(Registry::with_defaults())
    }

    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry,
            synthesizer: None,
        }
    }

    /// Install an external synthesizer implementation for the
    /// `SYNTHESIZER` backend.
    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn Synthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable registry access for the register-before-use workflow.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Run generation (and enrichment, when configured) in memory.
    ///
    /// Characteristics and metrics draw sequentially from one rng seeded
    /// with `SEED`, so identical configs reproduce identical tables.
    pub fn generate(&self, config: &ResolvedConfig) -> SimResult<SimulationOutput> {
        let backend = Backend::from_spec(&config.backend, &self.registry, self.synthesizer.clone())?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        info!(
            seed = config.seed,
            mode = config.backend.mode(),
            enrichment = config.enrichment.is_some(),
            "simulation started"
        );

        let products = backend.simulate_characteristics(&mut rng)?;
        info!(num_products = products.len(), "characteristics generated");

        let sales = backend.simulate_metrics(&products, &mut rng)?;
        info!(num_sales = sales.len(), "metrics generated");

        let Some(enrichment) = &config.enrichment else {
            return Ok(SimulationOutput {
                products,
                sales,
                enriched_products: None,
                counterfactual_sales: None,
            });
        };

        // Assignment draws from its own rng seeded with the run seed, so
        // the treated set depends only on (seed, fraction, product count).
        let enriched = assign_enrichment(&products, enrichment.fraction, config.seed)?;
        let n_enriched = enriched.iter().filter(|product| product.enriched).count();

        let effect_spec = parse_effect_spec(&enrichment.effect)?;
        let effect_fn = self
            .registry
            .resolve_effect(&effect_spec.module, &effect_spec.function)?;

        // Config-level PARAMS override what the effect spec carried.
        let mut params: Map<String, Value> = effect_spec.params.clone();
        for (key, value) in &enrichment.params {
            params.insert(key.clone(), value.clone());
        }

        let factual = apply_enrichment_to_sales(
            &sales,
            &enriched,
            enrichment.start_date,
            &effect_fn,
            params,
        )?;

        let factual_revenue: f64 = factual.iter().map(|sale| sale.revenue).sum();
        let baseline_revenue: f64 = sales.iter().map(|sale| sale.revenue).sum();
        info!(
            start_date = %enrichment.start_date,
            fraction = enrichment.fraction,
            effect = %effect_spec.function,
            n_enriched,
            factual_revenue,
            baseline_revenue,
            "enrichment applied"
        );

        Ok(SimulationOutput {
            products,
            sales: factual,
            enriched_products: Some(enriched),
            counterfactual_sales: Some(sales),
        })
    }

    /// Run the full pipeline and persist the outputs under a fresh job.
    pub fn run(
        &self,
        config: &ResolvedConfig,
        config_path: Option<&Path>,
    ) -> SimResult<SimulationRun> {
        let output = self.generate(config)?;

        let job = save_job(&output.products, &output.sales, config, config_path, None)?;
        if let Some(enriched) = &output.enriched_products {
            save_enriched_products(&job, enriched)?;
        }
        if let Some(counterfactual) = &output.counterfactual_sales {
            save_counterfactual_sales(&job, counterfactual)?;
        }

        info!(job_id = %job.job_id, "simulation run persisted");

        Ok(SimulationRun { output, job })
    }
}
