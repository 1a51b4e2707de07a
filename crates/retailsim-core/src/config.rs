//! Configuration resolution: built-in defaults, deep merge, validation,
//! and early parsing of the backend selector into a tagged variant.
//!
//! User configs are plain JSON documents with uppercase keys. Resolution
//! merges them over [`default_config`], validates the result, and hands the
//! engine a typed [`ResolvedConfig`] so no deeper layer has to probe raw
//! keys again. The merged document is kept verbatim in
//! [`ResolvedConfig::raw`] for job metadata.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde_json::{Map, Value, json};

use crate::DATE_FORMAT;
use crate::error::{ConfigError, ConfigResult};

/// Recognized backend selector keys, in scan order.
pub const BACKEND_KEYS: [&str; 2] = ["RULE", "SYNTHESIZER"];

const DEFAULT_FUNCTION: &str = "default";
const DEFAULT_NUM_PRODUCTS: u64 = 100;
const DEFAULT_SALE_PROBABILITY: f64 = 0.7;
const DEFAULT_FRACTION: f64 = 0.5;
const DEFAULT_EFFECT: &str = "quantity_boost:0.5";

/// Built-in defaults that user configs are merged over. Stage-level
/// defaults (function names, storage path, sale probability, enrichment
/// fraction) are applied at parse time instead, so they never mask user
/// intent expressed through sibling keys.
pub fn default_config() -> Value {
    json!({
        "SEED": 42
    })
}

/// Deep merge `override_` over `base`. Objects merge recursively, any other
/// value in `override_` replaces the base value wholesale.
pub fn deep_merge(base: &Value, override_: &Value) -> Value {
    match (base, override_) {
        (Value::Object(base_map), Value::Object(override_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in override_map {
                let entry = match merged.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), entry);
            }
            Value::Object(merged)
        }
        (_, other) => other.clone(),
    }
}

/// Read a JSON config file, merge it over defaults, validate, and parse.
pub fn load_config(path: &Path) -> ConfigResult<ResolvedConfig> {
    let contents = std::fs::read_to_string(path)?;
    let user: Value = serde_json::from_str(&contents)?;
    resolve_config(user)
}

/// Merge a user config over defaults, validate, and parse.
pub fn resolve_config(user: Value) -> ConfigResult<ResolvedConfig> {
    let merged = deep_merge(&default_config(), &user);
    ResolvedConfig::from_value(merged)
}

/// Fully resolved configuration consumed by the engine.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub seed: u64,
    pub backend: BackendSpec,
    pub enrichment: Option<EnrichmentConfig>,
    pub storage_path: PathBuf,
    /// The merged config document, retained for metadata auditability.
    pub raw: Value,
}

/// Backend selection, tagged at resolution time so exactly-one-key checks
/// never leak into deeper layers.
#[derive(Debug, Clone)]
pub enum BackendSpec {
    Rule(RuleConfig),
    Synthesizer(SynthesizerConfig),
}

impl BackendSpec {
    /// Mode label recorded in job metadata.
    pub fn mode(&self) -> &'static str {
        match self {
            BackendSpec::Rule(_) => "RULE",
            BackendSpec::Synthesizer(_) => "SYNTHESIZER",
        }
    }
}

/// Configuration scoped under the `RULE` key.
#[derive(Debug, Clone)]
pub struct RuleConfig {
    pub characteristics: StageConfig,
    pub metrics: StageConfig,
    pub num_products: usize,
    pub metrics_params: MetricsParams,
}

/// Configuration scoped under the `SYNTHESIZER` key. The statistical
/// synthesizer is an external collaborator, so everything beyond the stage
/// function names is passed through opaquely.
#[derive(Debug, Clone)]
pub struct SynthesizerConfig {
    pub characteristics: StageConfig,
    pub metrics: StageConfig,
    pub raw: Value,
}

/// One generation stage: a registry function name plus its parameter map.
#[derive(Debug, Clone)]
pub struct StageConfig {
    pub function: String,
    pub params: Map<String, Value>,
}

/// Typed view of the metrics stage parameters for the rule backend.
#[derive(Debug, Clone, Copy)]
pub struct MetricsParams {
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub sale_probability: f64,
}

/// Optional enrichment treatment configuration.
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    pub start_date: NaiveDate,
    pub fraction: f64,
    /// Effect spec as written in the config; parsed by the enrichment
    /// engine (shorthand string or structured object).
    pub effect: Value,
    pub params: Map<String, Value>,
}

impl ResolvedConfig {
    /// Parse and validate a merged config document.
    pub fn from_value(merged: Value) -> ConfigResult<ResolvedConfig> {
        let seed = match merged.get("SEED") {
            None => {
                return Err(ConfigError::MissingField("SEED".to_string()));
            }
            Some(value) => value.as_u64().ok_or_else(|| ConfigError::InvalidValue {
                field: "SEED".to_string(),
                reason: "must be a non-negative integer".to_string(),
            })?,
        };

        let backend = parse_backend(&merged)?;
        let enrichment = parse_enrichment(&merged, &backend)?;
        let storage_path = parse_storage_path(&merged);

        Ok(ResolvedConfig {
            seed,
            backend,
            enrichment,
            storage_path,
            raw: merged,
        })
    }
}

fn parse_backend(merged: &Value) -> ConfigResult<BackendSpec> {
    let present: Vec<&'static str> = BACKEND_KEYS
        .iter()
        .copied()
        .filter(|key| merged.get(key).is_some())
        .collect();

    match present.as_slice() {
        [] => Err(ConfigError::NoBackendSpecified(BACKEND_KEYS.to_vec())),
        [single] => match *single {
            "RULE" => Ok(BackendSpec::Rule(parse_rule_config(&merged["RULE"])?)),
            _ => Ok(BackendSpec::Synthesizer(parse_synthesizer_config(
                &merged["SYNTHESIZER"],
            )?)),
        },
        _ => Err(ConfigError::AmbiguousBackend(present)),
    }
}

fn parse_rule_config(rule: &Value) -> ConfigResult<RuleConfig> {
    let characteristics = parse_stage(rule.get("CHARACTERISTICS"), "RULE.CHARACTERISTICS")?;
    let metrics = parse_stage(rule.get("METRICS"), "RULE.METRICS")?;

    let num_products = match characteristics.params.get("NUM_PRODUCTS") {
        None => DEFAULT_NUM_PRODUCTS,
        Some(value) => value.as_u64().ok_or_else(|| ConfigError::InvalidValue {
            field: "RULE.CHARACTERISTICS.PARAMS.NUM_PRODUCTS".to_string(),
            reason: "must be a non-negative integer".to_string(),
        })?,
    } as usize;

    let metrics_params = parse_metrics_params(&metrics)?;

    Ok(RuleConfig {
        characteristics,
        metrics,
        num_products,
        metrics_params,
    })
}

fn parse_synthesizer_config(synthesizer: &Value) -> ConfigResult<SynthesizerConfig> {
    Ok(SynthesizerConfig {
        characteristics: parse_stage(
            synthesizer.get("CHARACTERISTICS"),
            "SYNTHESIZER.CHARACTERISTICS",
        )?,
        metrics: parse_stage(synthesizer.get("METRICS"), "SYNTHESIZER.METRICS")?,
        raw: synthesizer.clone(),
    })
}

fn parse_stage(stage: Option<&Value>, path: &str) -> ConfigResult<StageConfig> {
    let function = match stage.and_then(|s| s.get("FUNCTION")) {
        None => DEFAULT_FUNCTION.to_string(),
        Some(value) => value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: format!("{path}.FUNCTION"),
                reason: "must be a string".to_string(),
            })?,
    };

    let params = match stage.and_then(|s| s.get("PARAMS")) {
        None => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => {
            return Err(ConfigError::InvalidValue {
                field: format!("{path}.PARAMS"),
                reason: "must be an object".to_string(),
            });
        }
    };

    Ok(StageConfig { function, params })
}

fn parse_metrics_params(metrics: &StageConfig) -> ConfigResult<MetricsParams> {
    let date_start = require_date(&metrics.params, "DATE_START", "RULE.METRICS.PARAMS")?;
    let date_end = require_date(&metrics.params, "DATE_END", "RULE.METRICS.PARAMS")?;

    if date_start > date_end {
        return Err(ConfigError::InvalidDateRange {
            start: date_start.format(DATE_FORMAT).to_string(),
            end: date_end.format(DATE_FORMAT).to_string(),
        });
    }

    let sale_probability = match metrics.params.get("SALE_PROBABILITY") {
        None => DEFAULT_SALE_PROBABILITY,
        Some(value) => value.as_f64().ok_or_else(|| ConfigError::InvalidValue {
            field: "RULE.METRICS.PARAMS.SALE_PROBABILITY".to_string(),
            reason: "must be a number".to_string(),
        })?,
    };
    if !(0.0..=1.0).contains(&sale_probability) {
        return Err(ConfigError::InvalidValue {
            field: "RULE.METRICS.PARAMS.SALE_PROBABILITY".to_string(),
            reason: format!("must be within [0, 1], got {sale_probability}"),
        });
    }

    Ok(MetricsParams {
        date_start,
        date_end,
        sale_probability,
    })
}

fn parse_enrichment(
    merged: &Value,
    backend: &BackendSpec,
) -> ConfigResult<Option<EnrichmentConfig>> {
    let Some(enrichment) = merged.get("ENRICHMENT") else {
        return Ok(None);
    };

    // Enrichment is only active when START_DATE is present and non-empty;
    // an ENRICHMENT block without it configures nothing.
    let start_date = match enrichment.get("START_DATE").and_then(Value::as_str) {
        None | Some("") => return Ok(None),
        Some(raw) => parse_date(raw, "ENRICHMENT.START_DATE")?,
    };

    if let BackendSpec::Rule(rule) = backend {
        let window = rule.metrics_params;
        if start_date < window.date_start || start_date > window.date_end {
            return Err(ConfigError::EnrichmentWindow {
                start_date: start_date.format(DATE_FORMAT).to_string(),
                date_start: window.date_start.format(DATE_FORMAT).to_string(),
                date_end: window.date_end.format(DATE_FORMAT).to_string(),
            });
        }
    }

    let fraction = match enrichment.get("FRACTION") {
        None => DEFAULT_FRACTION,
        Some(value) => value.as_f64().ok_or_else(|| ConfigError::InvalidValue {
            field: "ENRICHMENT.FRACTION".to_string(),
            reason: "must be a number".to_string(),
        })?,
    };

    let effect = enrichment
        .get("EFFECT")
        .cloned()
        .unwrap_or_else(|| Value::String(DEFAULT_EFFECT.to_string()));

    let params = match enrichment.get("PARAMS") {
        None => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => {
            return Err(ConfigError::InvalidValue {
                field: "ENRICHMENT.PARAMS".to_string(),
                reason: "must be an object".to_string(),
            });
        }
    };

    Ok(Some(EnrichmentConfig {
        start_date,
        fraction,
        effect,
        params,
    }))
}

fn parse_storage_path(merged: &Value) -> PathBuf {
    let storage = merged
        .get("STORAGE")
        .and_then(|storage| storage.get("PATH"))
        .and_then(Value::as_str);
    // OUTPUT_DIR is the legacy flat-config spelling.
    let legacy = merged.get("OUTPUT_DIR").and_then(Value::as_str);
    PathBuf::from(storage.or(legacy).unwrap_or("output"))
}

fn require_date(params: &Map<String, Value>, key: &str, prefix: &str) -> ConfigResult<NaiveDate> {
    match params.get(key).and_then(Value::as_str) {
        None | Some("") => Err(ConfigError::MissingField(format!("{prefix}.{key}"))),
        Some(raw) => parse_date(raw, &format!("{prefix}.{key}")),
    }
}

fn parse_date(raw: &str, field: &str) -> ConfigResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| ConfigError::InvalidDate {
        field: field.to_string(),
        value: raw.to_string(),
    })
}
