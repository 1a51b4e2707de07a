use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use retailsim_core::{EnrichedProduct, Product, ResolvedConfig, Sale};

use crate::errors::{JobError, JobResult};
use crate::model::{JobInfo, JobMetadata, generate_job_id, is_job_dir};

/// Save simulation outputs under a job directory and return the handle.
///
/// Creates `<storage_path>/<job_id>/` with `products.csv`, `sales.csv`,
/// `metadata.json`, and a verbatim copy of the input config as
/// `config.yaml` when a config path is given. Filesystem failures surface
/// as [`JobError::Io`] untouched; nothing is retried.
pub fn save_job(
    products: &[Product],
    sales: &[Sale],
    config: &ResolvedConfig,
    config_path: Option<&Path>,
    job_id: Option<String>,
) -> JobResult<JobInfo> {
    let job_id = job_id.unwrap_or_else(generate_job_id);
    let job_info = JobInfo::new(job_id, config.storage_path.clone());

    let job_dir = job_info.job_dir();
    std::fs::create_dir_all(&job_dir)?;

    write_table(&job_info, "products", products)?;
    write_table(&job_info, "sales", sales)?;

    if let Some(config_path) = config_path
        && config_path.exists()
    {
        std::fs::copy(config_path, job_dir.join("config.yaml"))?;
    }

    let metadata = JobMetadata {
        job_id: job_info.job_id.clone(),
        timestamp: Utc::now().to_rfc3339(),
        config_path: config_path.map(|path| path.display().to_string()),
        storage_path: config.storage_path.display().to_string(),
        seed: config.seed,
        mode: config.backend.mode().to_string(),
        num_products: products.len(),
        num_sales: sales.len(),
        config: config.raw.clone(),
    };
    std::fs::write(
        job_dir.join("metadata.json"),
        serde_json::to_vec_pretty(&metadata)?,
    )?;

    info!(
        job_id = %job_info.job_id,
        num_products = products.len(),
        num_sales = sales.len(),
        "job saved"
    );

    Ok(job_info)
}

/// Save the assignment-tagged product table as `products_enriched.csv`.
pub fn save_enriched_products(job_info: &JobInfo, rows: &[EnrichedProduct]) -> JobResult<()> {
    write_table(job_info, "products_enriched", rows)
}

/// Save the untreated baseline sales as `sales_counterfactual.csv`.
pub fn save_counterfactual_sales(job_info: &JobInfo, rows: &[Sale]) -> JobResult<()> {
    write_table(job_info, "sales_counterfactual", rows)
}

/// Load the products and sales tables for a job.
pub fn load_job(job_info: &JobInfo) -> JobResult<(Vec<Product>, Vec<Sale>)> {
    require_job_dir(job_info)?;
    let products = read_table(job_info, "products")?;
    let sales = read_table(job_info, "sales")?;
    Ok((products, sales))
}

/// Load the metadata record for a job.
pub fn load_job_metadata(job_info: &JobInfo) -> JobResult<JobMetadata> {
    require_job_dir(job_info)?;
    let path = job_info.job_dir().join("metadata.json");
    if !path.exists() {
        return Err(JobError::TableNotFound {
            job_id: job_info.job_id.clone(),
            table: "metadata".to_string(),
        });
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// List job ids under a storage path, newest first.
///
/// The ids are timestamp-prefixed, so descending string order is creation
/// order. A missing storage path yields an empty list.
pub fn list_jobs(storage_path: &Path) -> JobResult<Vec<String>> {
    if !storage_path.exists() {
        return Ok(Vec::new());
    }

    let mut jobs = Vec::new();
    for entry in std::fs::read_dir(storage_path)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_job_dir(&name, &entry.path()) {
            jobs.push(name);
        }
    }

    jobs.sort_by(|a, b| b.cmp(a));
    Ok(jobs)
}

/// Remove every job beyond the `keep_count` newest. Irreversible.
pub fn cleanup_old_jobs(storage_path: &Path, keep_count: usize) -> JobResult<Vec<String>> {
    let jobs = list_jobs(storage_path)?;
    if jobs.len() <= keep_count {
        return Ok(Vec::new());
    }

    let mut removed = Vec::new();
    for job_id in &jobs[keep_count..] {
        let job_dir = storage_path.join(job_id);
        if job_dir.exists() {
            std::fs::remove_dir_all(&job_dir)?;
            removed.push(job_id.clone());
        }
    }

    info!(
        kept = keep_count.min(jobs.len()),
        removed = removed.len(),
        "cleaned up old jobs"
    );

    Ok(removed)
}

fn write_table<T: Serialize>(job_info: &JobInfo, table: &str, rows: &[T]) -> JobResult<()> {
    let mut writer = csv::Writer::from_path(job_info.table_path(table))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn read_table<T: DeserializeOwned>(job_info: &JobInfo, table: &str) -> JobResult<Vec<T>> {
    let path = job_info.table_path(table);
    if !path.exists() {
        return Err(JobError::TableNotFound {
            job_id: job_info.job_id.clone(),
            table: table.to_string(),
        });
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

fn require_job_dir(job_info: &JobInfo) -> JobResult<()> {
    if job_info.job_dir().is_dir() {
        Ok(())
    } else {
        Err(JobError::JobNotFound(job_info.job_id.clone()))
    }
}
