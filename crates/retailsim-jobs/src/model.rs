use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Handle for a persisted simulation job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobInfo {
    pub job_id: String,
    pub storage_path: PathBuf,
}

impl JobInfo {
    pub fn new(job_id: impl Into<String>, storage_path: impl Into<PathBuf>) -> Self {
        Self {
            job_id: job_id.into(),
            storage_path: storage_path.into(),
        }
    }

    /// Directory owned by this job.
    pub fn job_dir(&self) -> PathBuf {
        self.storage_path.join(&self.job_id)
    }

    pub fn table_path(&self, table: &str) -> PathBuf {
        self.job_dir().join(format!("{table}.csv"))
    }
}

impl fmt::Display for JobInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.job_id)
    }
}

/// Audit record written next to the tables as `metadata.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMetadata {
    pub job_id: String,
    /// ISO-8601 creation time.
    pub timestamp: String,
    pub config_path: Option<String>,
    pub storage_path: String,
    pub seed: u64,
    pub mode: String,
    pub num_products: usize,
    pub num_sales: usize,
    /// Full resolved configuration, for auditability.
    pub config: Value,
}

/// Generate a job id of the form `job-<YYYYMMDD-HHMMSS>-<short id>`.
///
/// The timestamp prefix makes lexicographic order equal creation order at
/// second resolution; two jobs created within the same second are ordered
/// arbitrarily by the random suffix.
pub fn generate_job_id() -> String {
    let timestamp = Utc::now().format("%Y%m%d-%H%M%S");
    format!("job-{timestamp}-{}", short_id())
}

/// True when `name` looks like a directory created by [`generate_job_id`].
pub fn is_job_dir(name: &str, path: &Path) -> bool {
    name.starts_with("job-") && path.is_dir()
}

fn short_id() -> String {
    let id = uuid::Uuid::new_v4().to_string();
    match id.split('-').next() {
        Some(part) if !part.is_empty() => part.to_string(),
        _ => id,
    }
}
