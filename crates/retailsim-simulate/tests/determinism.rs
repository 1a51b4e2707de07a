use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;

use retailsim_core::resolve_config;
use retailsim_simulate::{Simulator, generate_characteristics, generate_sales};

fn to_csv<T: Serialize>(rows: &[T]) -> String {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row).expect("serialize row");
    }
    String::from_utf8(writer.into_inner().expect("flush csv")).expect("utf8 csv")
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

#[test]
fn characteristics_are_deterministic_per_seed() {
    let a = generate_characteristics(50, 42);
    let b = generate_characteristics(50, 42);
    assert_eq!(a, b);

    let c = generate_characteristics(50, 43);
    assert_ne!(a, c, "different seeds should diverge");
}

#[test]
fn product_ids_are_sequential_regardless_of_draws() {
    let products = generate_characteristics(12, 7);
    for (i, product) in products.iter().enumerate() {
        assert_eq!(product.product_id, format!("PROD{:04}", i + 1));
    }
}

#[test]
fn sales_are_deterministic_per_seed() {
    let products = generate_characteristics(20, 42);
    let a = generate_sales(&products, date("2024-01-01"), date("2024-01-14"), 42, 0.7)
        .expect("generate sales");
    let b = generate_sales(&products, date("2024-01-01"), date("2024-01-14"), 42, 0.7)
        .expect("generate sales");

    assert_eq!(to_csv(&a), to_csv(&b), "sales tables should be byte-identical");
}

#[test]
fn transaction_ids_are_sequential() {
    let products = generate_characteristics(10, 1);
    let sales = generate_sales(&products, date("2024-01-01"), date("2024-01-05"), 1, 0.9)
        .expect("generate sales");

    for (i, sale) in sales.iter().enumerate() {
        assert_eq!(sale.transaction_id, format!("TXN{:06}", i + 1));
    }
}

#[test]
fn inverted_sales_range_is_rejected() {
    let products = generate_characteristics(3, 1);
    let err = generate_sales(&products, date("2024-02-01"), date("2024-01-01"), 1, 0.5)
        .expect_err("should fail");
    assert!(matches!(
        err,
        retailsim_simulate::SimulationError::InvalidDateRange { .. }
    ));
}

#[test]
fn full_pipeline_is_deterministic_including_enrichment() {
    let config = resolve_config(json!({
        "SEED": 42,
        "RULE": {
            "CHARACTERISTICS": { "PARAMS": { "NUM_PRODUCTS": 30 } },
            "METRICS": {
                "PARAMS": { "DATE_START": "2024-01-01", "DATE_END": "2024-01-10" }
            }
        },
        "ENRICHMENT": { "START_DATE": "2024-01-05", "FRACTION": 0.5 }
    }))
    .expect("resolve config");

    let simulator = Simulator::new();
    let a = simulator.generate(&config).expect("generate A");
    let b = simulator.generate(&config).expect("generate B");

    assert_eq!(to_csv(&a.products), to_csv(&b.products));
    assert_eq!(to_csv(&a.sales), to_csv(&b.sales));
    assert_eq!(
        a.enriched_products.expect("enriched A"),
        b.enriched_products.expect("enriched B")
    );
}

#[test]
fn zero_sale_probability_yields_no_sales() {
    let products = generate_characteristics(5, 2);
    let sales = generate_sales(&products, date("2024-01-01"), date("2024-01-07"), 2, 0.0)
        .expect("generate sales");
    assert!(sales.is_empty());
}

#[test]
fn unit_sale_probability_yields_a_row_per_product_day() {
    let products = generate_characteristics(5, 2);
    let sales = generate_sales(&products, date("2024-01-01"), date("2024-01-07"), 2, 1.0)
        .expect("generate sales");
    assert_eq!(sales.len(), 5 * 7);
}
