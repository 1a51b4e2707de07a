//! Job-based persistence for simulation outputs.
//!
//! A job is a uniquely identified directory holding the generated tables
//! (`products.csv`, `sales.csv`, optional enrichment tables), a
//! `metadata.json` record, and a verbatim copy of the input config. The
//! [`JobInfo`] handle is the only way callers address a job; prior jobs
//! are never mutated, only removed by the retention cleanup.

pub mod errors;
pub mod model;
pub mod store;

pub use errors::{JobError, JobResult};
pub use model::{JobInfo, JobMetadata, generate_job_id};
pub use store::{
    cleanup_old_jobs, list_jobs, load_job, load_job_metadata, save_counterfactual_sales,
    save_enriched_products, save_job,
};
