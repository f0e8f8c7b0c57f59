//! Built-in sample jobs for `--demo`.

use chrono::{DateTime, Duration, Utc};
use job_state_view::{FailedStatePanel, FailureRecord, RecordedAt};
use uuid::Uuid;

use crate::domain::JobEntry;

/// Sample failed jobs, aged relative to `now`.
pub fn demo_jobs(now: DateTime<Utc>) -> Vec<JobEntry> {
    let samples: [(&str, &str, RecordedAt, &str, &str); 4] = [
        (
            "MailService.sendWelcome(java.util.UUID)",
            "Connection refused",
            (now - Duration::seconds(20)).into(),
            "java.net.ConnectException",
            "java.net.ConnectException: Connection refused\n\
             \tat java.base/sun.nio.ch.Net.connect0(Native Method)\n\
             \tat java.base/sun.nio.ch.Net.connect(Net.java:579)\n\
             \tat org.example.mail.SmtpClient.open(SmtpClient.java:88)\n\
             \tat org.example.mail.MailService.sendWelcome(MailService.java:42)",
        ),
        (
            "ReportGenerator.monthly(int, int)",
            "Report template 'monthly-v2' not found",
            (now - Duration::minutes(47)).into(),
            "java.io.FileNotFoundException",
            "java.io.FileNotFoundException: monthly-v2.ftl\n\
             \tat org.example.reports.Templates.load(Templates.java:31)\n\
             \tat org.example.reports.ReportGenerator.monthly(ReportGenerator.java:17)",
        ),
        (
            "ImageResizer.resize(java.lang.String)",
            "Unsupported image format",
            (now - Duration::days(3)).into(),
            "",
            "",
        ),
        (
            "LegacyImport.run()",
            "Import aborted",
            RecordedAt::parse("31/02/2021 25:61"),
            "java.lang.IllegalStateException",
            "java.lang.IllegalStateException: Import aborted\n\
             \tat org.example.legacy.LegacyImport.run(LegacyImport.java:120)",
        ),
    ];

    samples
        .into_iter()
        .filter_map(|(job_name, message, created_at, exception_type, stack_trace)| {
            let record = FailureRecord::new(message, created_at, exception_type, stack_trace).ok()?;
            Some(JobEntry {
                id: Uuid::new_v4(),
                job_name: job_name.to_string(),
                panel: FailedStatePanel::bind(record),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_jobs_are_valid() {
        let jobs = demo_jobs(Utc::now());
        assert_eq!(jobs.len(), 4);
        assert!(jobs.iter().all(|j| !j.panel.state().is_expanded()));
        assert!(jobs[3].panel.record().created_at().instant().is_none());
    }
}
