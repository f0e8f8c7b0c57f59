//! Loading an export and driving the dashboard with keys.

use jobs_admin::source::parse_jobs;
use jobs_admin::{App, AppKey};
use tokio::sync::mpsc;

const EXPORT: &str = include_str!("../../../demos/failed-jobs.json");

#[tokio::test]
async fn export_loads_and_panels_toggle_independently() {
    let report = parse_jobs(EXPORT).unwrap();
    assert!(report.rejected.is_empty());
    assert_eq!(report.jobs.len(), 2);

    let (tx, _rx) = mpsc::channel(8);
    let mut app = App::new(report.jobs, tx, None);

    app.handle_key(AppKey::Enter);
    app.handle_key(AppKey::Down);
    app.handle_key(AppKey::Enter);
    app.handle_key(AppKey::Enter);

    assert!(app.jobs[0].panel.state().is_expanded());
    assert!(!app.jobs[1].panel.state().is_expanded());

    let tree = app.jobs[0].panel.tree(chrono::Utc::now());
    let detail = tree.detail.unwrap();
    assert_eq!(detail.exception_type, "java.net.ConnectException");
    assert!(detail.stack_trace.contains("\n\tat org.example.mail.SmtpClient.open"));
}

#[tokio::test]
async fn selected_panel_holds_the_only_subscription() {
    let report = parse_jobs(EXPORT).unwrap();
    let (tx, _rx) = mpsc::channel(8);
    let mut app = App::new(report.jobs, tx, None);

    for _ in 0..3 {
        let mounted: Vec<bool> = app.jobs.iter().map(|j| j.panel.is_mounted()).collect();
        assert_eq!(mounted.iter().filter(|m| **m).count(), 1);
        assert!(mounted[app.selected]);
        app.handle_key(AppKey::Down);
    }
}
