//! Loads failed jobs from a JSON export.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use job_state_view::{FailedStatePanel, FailureRecord, InvalidRecordError};
use thiserror::Error;
use uuid::Uuid;

use super::demo::demo_jobs;
use super::types::FailedJobRecord;
use crate::config::Args;
use crate::domain::JobEntry;

/// Errors that make a whole export unusable.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse job export: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A job left out because its failure record is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedJob {
    pub id: Uuid,
    pub job_name: String,
    pub reason: InvalidRecordError,
}

/// Result of loading an export: usable jobs plus the ones skipped.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub jobs: Vec<JobEntry>,
    pub rejected: Vec<RejectedJob>,
}

impl LoadReport {
    /// One-line note for the header, if anything was skipped.
    pub fn summary(&self) -> Option<String> {
        match self.rejected.len() {
            0 => None,
            1 => Some("Skipped 1 invalid job record".to_string()),
            n => Some(format!("Skipped {} invalid job records", n)),
        }
    }
}

/// Parse a JSON array of failed jobs.
///
/// Malformed JSON fails the whole export. A record without a usable
/// message only drops that job.
pub fn parse_jobs(json: &str) -> Result<LoadReport, SourceError> {
    let records: Vec<FailedJobRecord> = serde_json::from_str(json)?;
    let mut report = LoadReport::default();

    for record in records {
        match FailureRecord::try_from(record.state) {
            Ok(failure) => report.jobs.push(JobEntry {
                id: record.id,
                job_name: record.job_name,
                panel: FailedStatePanel::bind(failure),
            }),
            Err(reason) => {
                tracing::warn!(job_id = %record.id, error = %reason, "Skipping invalid job record");
                report.rejected.push(RejectedJob {
                    id: record.id,
                    job_name: record.job_name,
                    reason,
                });
            }
        }
    }

    tracing::info!(
        loaded = report.jobs.len(),
        rejected = report.rejected.len(),
        "Failed jobs loaded"
    );

    Ok(report)
}

/// Read and parse a job export file.
pub fn load_jobs(path: &Path) -> Result<LoadReport, SourceError> {
    let json = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_jobs(&json)
}

/// Jobs for this run: the demo set, or the export named by `--file`.
pub fn load_report(args: &Args, now: DateTime<Utc>) -> anyhow::Result<LoadReport> {
    if args.demo {
        return Ok(LoadReport {
            jobs: demo_jobs(now),
            rejected: Vec::new(),
        });
    }

    let path = args
        .file
        .as_deref()
        .context("Either --file or --demo is required")?;
    load_jobs(path).with_context(|| format!("Failed to load jobs from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    const EXPORT: &str = r#"[
        {
            "id": "0f8fad5b-d9cb-469f-a165-70867728950e",
            "jobName": "MailService.send(String)",
            "state": {
                "message": "Connection refused",
                "createdAt": "2024-03-01T12:00:00.000Z",
                "exceptionType": "java.net.ConnectException",
                "stackTrace": "at Foo.bar()\n at Baz.qux()"
            }
        },
        {
            "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
            "jobName": "ReportJob.run()",
            "state": { "createdAt": "2024-03-01T12:00:00Z" }
        },
        {
            "id": "16fd2706-8baf-433b-82eb-8c7fada847da",
            "jobName": "Cleanup.run()",
            "state": { "message": "Disk full", "createdAt": "yesterday" }
        }
    ]"#;

    #[test]
    fn test_parse_skips_invalid_records() {
        let report = parse_jobs(EXPORT).unwrap();

        assert_eq!(report.jobs.len(), 2);
        assert_eq!(report.jobs[0].job_name, "MailService.send(String)");
        assert_eq!(report.jobs[1].panel.record().message(), "Disk full");

        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].reason, InvalidRecordError::MissingMessage);
        assert_eq!(
            report.summary().as_deref(),
            Some("Skipped 1 invalid job record")
        );
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(parse_jobs("{ not json"), Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EXPORT.as_bytes()).unwrap();

        let report = load_jobs(file.path()).unwrap();
        assert_eq!(report.jobs.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_jobs(Path::new("/nonexistent/jobs.json")).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/jobs.json"));
    }

    #[test]
    fn test_load_report_names_the_export_on_failure() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        let path = file.path().display().to_string();
        let args = Args::try_parse_from(["jobs-admin", "--file", path.as_str()]).unwrap();

        let err = load_report(&args, Utc::now()).unwrap_err();
        assert_eq!(err.to_string(), format!("Failed to load jobs from {}", path));
        assert!(format!("{:#}", err).contains("Failed to parse job export"));
    }

    #[test]
    fn test_load_report_demo() {
        let args = Args::try_parse_from(["jobs-admin", "--demo"]).unwrap();
        let report = load_report(&args, Utc::now()).unwrap();
        assert_eq!(report.jobs.len(), 4);
        assert!(report.rejected.is_empty());
    }
}
