//! Run a small rule-based simulation with enrichment and persist it as a
//! job.
//!
//! ```sh
//! cargo run -p retailsim-simulate --example simulate_catalog
//! ```

use serde_json::json;

use retailsim_core::resolve_config;
use retailsim_jobs::list_jobs;
use retailsim_simulate::Simulator;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let config = resolve_config(json!({
        "SEED": 42,
        "STORAGE": { "PATH": "output" },
        "RULE": {
            "CHARACTERISTICS": { "PARAMS": { "NUM_PRODUCTS": 25 } },
            "METRICS": {
                "PARAMS": {
                    "DATE_START": "2024-01-01",
                    "DATE_END": "2024-01-31",
                    "SALE_PROBABILITY": 0.7
                }
            }
        },
        "ENRICHMENT": {
            "START_DATE": "2024-01-15",
            "FRACTION": 0.5,
            "EFFECT": "combined_boost:0.5"
        }
    }))?;

    let run = Simulator::new().run(&config, None)?;

    println!("saved job {}", run.job.job_id);
    println!(
        "{} products, {} sales rows",
        run.output.products.len(),
        run.output.sales.len()
    );
    println!("jobs under output/: {:?}", list_jobs(&config.storage_path)?);

    Ok(())
}
