use serde_json::json;

use retailsim_enrich::{BUILTIN_EFFECT_MODULE, EnrichError, parse_effect_spec};

#[test]
fn shorthand_with_effect_size() {
    let spec = parse_effect_spec(&json!("quantity_boost:0.5")).expect("parse");
    assert_eq!(spec.module, BUILTIN_EFFECT_MODULE);
    assert_eq!(spec.function, "quantity_boost");
    assert_eq!(spec.params.get("effect_size"), Some(&json!(0.5)));
}

#[test]
fn shorthand_trims_whitespace() {
    let spec = parse_effect_spec(&json!("combined_boost : 0.25")).expect("parse");
    assert_eq!(spec.function, "combined_boost");
    assert_eq!(spec.params.get("effect_size"), Some(&json!(0.25)));
}

#[test]
fn bare_function_name_has_no_params() {
    let spec = parse_effect_spec(&json!("probability_boost")).expect("parse");
    assert_eq!(spec.module, BUILTIN_EFFECT_MODULE);
    assert_eq!(spec.function, "probability_boost");
    assert!(spec.params.is_empty());
}

#[test]
fn structured_form_with_module_and_params() {
    let spec = parse_effect_spec(&json!({
        "module": "my_effects",
        "function": "price_cut",
        "params": { "effect_size": 0.2, "floor_price": 5.0 }
    }))
    .expect("parse");

    assert_eq!(spec.module, "my_effects");
    assert_eq!(spec.function, "price_cut");
    assert_eq!(spec.params.get("floor_price"), Some(&json!(5.0)));
}

#[test]
fn structured_form_defaults_module() {
    let spec = parse_effect_spec(&json!({ "function": "quantity_boost" })).expect("parse");
    assert_eq!(spec.module, BUILTIN_EFFECT_MODULE);
    assert!(spec.params.is_empty());
}

#[test]
fn structured_form_without_function_is_rejected() {
    let err = parse_effect_spec(&json!({ "module": "my_effects" })).expect_err("should fail");
    assert!(matches!(err, EnrichError::InvalidEffectSpec(_)));
}

#[test]
fn non_numeric_effect_size_is_rejected() {
    let err = parse_effect_spec(&json!("quantity_boost:big")).expect_err("should fail");
    assert!(matches!(err, EnrichError::InvalidEffectSpec(_)));
}

#[test]
fn non_string_non_object_spec_is_rejected() {
    for value in [json!(42), json!(["quantity_boost"]), json!(null)] {
        let err = parse_effect_spec(&value).expect_err("should fail");
        assert!(matches!(err, EnrichError::InvalidEffectSpec(_)));
    }
}
