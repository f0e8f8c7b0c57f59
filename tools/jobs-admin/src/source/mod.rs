//! Failed job sources: a JSON export from the job engine, or demo data.

mod demo;
mod loader;
mod types;

pub use demo::demo_jobs;
pub use loader::{load_jobs, load_report, parse_jobs, LoadReport, RejectedJob, SourceError};
pub use types::FailedJobRecord;
