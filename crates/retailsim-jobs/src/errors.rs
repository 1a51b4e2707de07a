use thiserror::Error;

/// Storage errors, distinguished by kind so callers can tell a bad handle
/// from an incomplete job from an environment problem.
#[derive(Debug, Error)]
pub enum JobError {
    /// The job directory does not exist: the handle is stale or wrong.
    #[error("job directory not found for '{0}'")]
    JobNotFound(String),
    /// The directory exists but an expected table file is missing: the job
    /// was only partially written.
    #[error("table '{table}' not found in job '{job_id}'")]
    TableNotFound { job_id: String, table: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for job storage results.
pub type JobResult<T> = std::result::Result<T, JobError>;
