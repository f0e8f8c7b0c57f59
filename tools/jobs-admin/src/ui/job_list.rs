//! Left panel: failed job list.
//!
//! ```text
//! ┌ FAILED JOBS (4) ─────────────┐
//! │ ✖ MailService.sendWelcome(…) │
//! │   20 seconds ago             │
//! │ ✖ ReportGenerator.monthly(…) │
//! │   47 minutes ago             │
//! └──────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use job_state_view::{humanize_relative_time, UNKNOWN_TIME};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::domain::{App, JobEntry};

/// Render the job list.
pub fn render(frame: &mut Frame, area: Rect, app: &App, now: DateTime<Utc>) {
    let items: Vec<ListItem> = if app.jobs.is_empty() {
        vec![ListItem::new(Line::styled(
            "(No failed jobs)",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        app.jobs
            .iter()
            .enumerate()
            .map(|(idx, job)| job_item(job, idx == app.selected, now))
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .title(format!(" FAILED JOBS ({}) ", app.jobs.len()))
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    frame.render_widget(list, area);
}

/// Two-line entry: job name, then how long ago it failed.
fn job_item(job: &JobEntry, is_selected: bool, now: DateTime<Utc>) -> ListItem<'_> {
    let age = job
        .panel
        .record()
        .created_at()
        .instant()
        .map(|at| humanize_relative_time(at, now))
        .unwrap_or_else(|| UNKNOWN_TIME.to_string());

    let name = if job.job_name.is_empty() {
        job.id.to_string()
    } else {
        job.job_name.clone()
    };

    // Highlight selected
    let line_style = if is_selected {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    ListItem::new(vec![
        Line::from(vec![
            Span::styled("✖ ", Style::default().fg(Color::Red)),
            Span::raw(name),
        ]),
        Line::styled(format!("  {}", age), Style::default().fg(Color::DarkGray)),
    ])
    .style(line_style)
}
