use serde_json::{Map, Value};

use crate::errors::{EnrichError, EnrichResult};

/// Module name the shorthand spec forms resolve against.
pub const BUILTIN_EFFECT_MODULE: &str = "effects";

/// Parsed effect specification: where the function lives, its name, and
/// the parameters to pass it.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectSpec {
    pub module: String,
    pub function: String,
    pub params: Map<String, Value>,
}

/// Parse an `EFFECT` config value.
///
/// Three forms are accepted:
/// - shorthand string `"quantity_boost:0.5"`, resolved against the
///   built-in effect module with `effect_size` as the sole parameter;
/// - a bare function name with no parameters;
/// - an object `{"module": …, "function": …, "params": {…}}` where only
///   `function` is required.
pub fn parse_effect_spec(effect: &Value) -> EnrichResult<EffectSpec> {
    match effect {
        Value::String(spec) => parse_shorthand(spec),
        Value::Object(map) => parse_structured(map),
        other => Err(EnrichError::InvalidEffectSpec(format!(
            "EFFECT must be a string or an object, got {other}"
        ))),
    }
}

fn parse_shorthand(spec: &str) -> EnrichResult<EffectSpec> {
    let Some((function, effect_size)) = spec.split_once(':') else {
        return Ok(EffectSpec {
            module: BUILTIN_EFFECT_MODULE.to_string(),
            function: spec.trim().to_string(),
            params: Map::new(),
        });
    };

    let effect_size: f64 = effect_size.trim().parse().map_err(|_| {
        EnrichError::InvalidEffectSpec(format!(
            "effect size in '{spec}' is not a number"
        ))
    })?;

    let mut params = Map::new();
    params.insert("effect_size".to_string(), effect_size.into());

    Ok(EffectSpec {
        module: BUILTIN_EFFECT_MODULE.to_string(),
        function: function.trim().to_string(),
        params,
    })
}

fn parse_structured(map: &Map<String, Value>) -> EnrichResult<EffectSpec> {
    let function = map
        .get("function")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            EnrichError::InvalidEffectSpec("EFFECT object must include 'function'".to_string())
        })?;

    let module = match map.get("module") {
        None => BUILTIN_EFFECT_MODULE.to_string(),
        Some(value) => value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                EnrichError::InvalidEffectSpec("EFFECT 'module' must be a string".to_string())
            })?,
    };

    let params = match map.get("params") {
        None => Map::new(),
        Some(Value::Object(params)) => params.clone(),
        Some(_) => {
            return Err(EnrichError::InvalidEffectSpec(
                "EFFECT 'params' must be an object".to_string(),
            ));
        }
    };

    Ok(EffectSpec {
        module,
        function: function.to_string(),
        params,
    })
}
