use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde_json::json;

use retailsim_core::{ResolvedConfig, resolve_config, round2};
use retailsim_jobs::{list_jobs, load_job, load_job_metadata};
use retailsim_simulate::Simulator;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_test_writer()
        .try_init()
        .ok();
}

fn temp_storage(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("retailsim_e2e_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp storage dir");
    dir
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

fn baseline_config(storage: &PathBuf) -> ResolvedConfig {
    resolve_config(json!({
        "SEED": 42,
        "STORAGE": { "PATH": storage.display().to_string() },
        "RULE": {
            "CHARACTERISTICS": { "PARAMS": { "NUM_PRODUCTS": 10 } },
            "METRICS": {
                "PARAMS": {
                    "DATE_START": "2024-01-01",
                    "DATE_END": "2024-01-07",
                    "SALE_PROBABILITY": 0.7
                }
            }
        }
    }))
    .expect("resolve config")
}

#[test]
fn baseline_scenario_produces_consistent_tables() {
    init_logging();
    let storage = temp_storage("baseline");
    let config = baseline_config(&storage);

    let output = Simulator::new().generate(&config).expect("generate");

    assert_eq!(output.products.len(), 10);
    assert!(output.enriched_products.is_none());
    assert!(output.counterfactual_sales.is_none());

    let product_ids: HashSet<&str> = output
        .products
        .iter()
        .map(|product| product.product_id.as_str())
        .collect();
    let window_start = date("2024-01-01");
    let window_end = date("2024-01-07");

    assert!(!output.sales.is_empty());
    for sale in &output.sales {
        assert!(sale.date >= window_start && sale.date <= window_end);
        assert!(product_ids.contains(sale.product_id.as_str()));
        assert!(sale.quantity >= 1 && sale.quantity <= 5);
        assert!(
            (sale.revenue - round2(f64::from(sale.quantity) * sale.unit_price)).abs() < 1e-6,
            "revenue invariant for {}",
            sale.transaction_id
        );
    }

    for product in &output.products {
        assert!(product.price > 0.0);
    }
}

#[test]
fn run_persists_a_loadable_job() {
    init_logging();
    let storage = temp_storage("persist");
    let config = baseline_config(&storage);

    let run = Simulator::new().run(&config, None).expect("run");
    assert!(run.job.job_id.starts_with("job-"));

    let (products, sales) = load_job(&run.job).expect("load job");
    assert_eq!(products, run.output.products);
    assert_eq!(sales, run.output.sales);

    let metadata = load_job_metadata(&run.job).expect("load metadata");
    assert_eq!(metadata.mode, "RULE");
    assert_eq!(metadata.seed, 42);
    assert_eq!(metadata.num_products, 10);
    assert_eq!(metadata.num_sales, sales.len());

    let jobs = list_jobs(&storage).expect("list jobs");
    assert_eq!(jobs, vec![run.job.job_id.clone()]);
}

#[test]
fn enrichment_applies_only_on_or_after_cutover() {
    init_logging();
    let storage = temp_storage("enrichment");
    let config = resolve_config(json!({
        "SEED": 42,
        "STORAGE": { "PATH": storage.display().to_string() },
        "RULE": {
            "CHARACTERISTICS": { "PARAMS": { "NUM_PRODUCTS": 20 } },
            "METRICS": {
                "PARAMS": {
                    "DATE_START": "2024-01-01",
                    "DATE_END": "2024-01-10",
                    "SALE_PROBABILITY": 0.8
                }
            }
        },
        "ENRICHMENT": {
            "START_DATE": "2024-01-04",
            "FRACTION": 0.5,
            "EFFECT": "quantity_boost:0.5"
        }
    }))
    .expect("resolve config");

    let output = Simulator::new().generate(&config).expect("generate");

    let enriched = output.enriched_products.expect("enriched products");
    let counterfactual = output.counterfactual_sales.expect("counterfactual sales");
    assert_eq!(enriched.iter().filter(|p| p.enriched).count(), 10);
    assert_eq!(output.sales.len(), counterfactual.len());

    let treated_ids: HashSet<&str> = enriched
        .iter()
        .filter(|product| product.enriched)
        .map(|product| product.product_id.as_str())
        .collect();
    let cutover = date("2024-01-04");

    for (factual, baseline) in output.sales.iter().zip(&counterfactual) {
        assert_eq!(factual.transaction_id, baseline.transaction_id);

        let treated = treated_ids.contains(baseline.product_id.as_str());
        if !treated || baseline.date < cutover {
            assert_eq!(factual, baseline);
        } else {
            let expected = (f64::from(baseline.quantity) * 1.5).floor() as u32;
            assert_eq!(factual.quantity, expected);
            assert!(
                (factual.revenue - round2(f64::from(expected) * factual.unit_price)).abs() < 1e-6
            );
        }
    }
}

#[test]
fn enrichment_run_saves_supplemental_tables() {
    init_logging();
    let storage = temp_storage("enrichment_tables");
    let config = resolve_config(json!({
        "SEED": 7,
        "STORAGE": { "PATH": storage.display().to_string() },
        "RULE": {
            "CHARACTERISTICS": { "PARAMS": { "NUM_PRODUCTS": 8 } },
            "METRICS": {
                "PARAMS": { "DATE_START": "2024-01-01", "DATE_END": "2024-01-05" }
            }
        },
        "ENRICHMENT": { "START_DATE": "2024-01-03" }
    }))
    .expect("resolve config");

    let run = Simulator::new().run(&config, None).expect("run");
    let job_dir = run.job.job_dir();

    assert!(job_dir.join("products.csv").exists());
    assert!(job_dir.join("sales.csv").exists());
    assert!(job_dir.join("metadata.json").exists());
    assert!(job_dir.join("products_enriched.csv").exists());
    assert!(job_dir.join("sales_counterfactual.csv").exists());
}
