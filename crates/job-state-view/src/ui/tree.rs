//! Visual tree of the failed state.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ ▸ ✖ Job processing failed - Connection refused  3 minutes ago│  <- SummaryRow
//! │ java.net.ConnectException                                    │  <- DetailPanel
//! │                                                              │     (expanded only)
//! │ at Foo.bar()                                                 │
//! │  at Baz.qux()                                                │
//! └──────────────────────────────────── 2020-10-16 07:30:00 UTC ┘
//! ```
//!
//! [`render_tree`] is a pure function of the record, the display state and
//! the current instant. Drawing into a terminal happens separately in
//! [`super::failed`].

use chrono::{DateTime, Utc};
use ratatui::style::{Color, Modifier, Style};

use crate::domain::{DisplayState, FailureRecord, RecordedAt};
use crate::time::{format_absolute, Humanizer, UNKNOWN_TIME};

/// Prefix of every failed-state heading.
pub const FAILED_HEADING: &str = "Job processing failed";

/// Severity treatment of a job state. Fixed per state, never per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Failed,
}

impl Severity {
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Failed => "✖",
        }
    }

    /// Foreground color for text on the summary row.
    pub fn foreground(&self) -> Color {
        match self {
            Severity::Failed => Color::Rgb(97, 26, 21),
        }
    }

    /// Background fill of the summary row.
    pub fn background(&self) -> Color {
        match self {
            Severity::Failed => Color::Rgb(253, 236, 234),
        }
    }

    pub fn style(&self) -> Style {
        Style::default().fg(self.foreground()).bg(self.background())
    }

    pub fn heading_style(&self) -> Style {
        self.style().add_modifier(Modifier::BOLD)
    }
}

/// Always-visible condensed failure display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub severity: Severity,
    /// Expand/collapse indicator for the toggle control.
    pub state: DisplayState,
    /// `"Job processing failed - {message}"`.
    pub heading: String,
    /// The failure message alone, for rows too narrow for the full heading.
    pub message: String,
    /// Relative time, or [`UNKNOWN_TIME`] for a malformed timestamp.
    pub relative_time: String,
    /// Precise timestamp; `None` when the timestamp is malformed.
    pub absolute_time: Option<String>,
}

/// On-demand failure details, borrowed from the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailPanel<'a> {
    pub exception_type: &'a str,
    pub stack_trace: &'a str,
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualTree<'a> {
    pub summary: SummaryRow,
    /// Present exactly when the state is expanded.
    pub detail: Option<DetailPanel<'a>>,
}

impl VisualTree<'_> {
    /// Plain-text dump of everything the tree would show.
    pub fn to_text(&self) -> String {
        let mut out = format!(
            "{} {} {}  {}",
            self.summary.state.indicator(),
            self.summary.severity.icon(),
            self.summary.heading,
            self.summary.relative_time
        );
        if let Some(absolute) = &self.summary.absolute_time {
            out.push_str(&format!(" ({})", absolute));
        }
        if let Some(detail) = &self.detail {
            out.push('\n');
            out.push_str(detail.exception_type);
            out.push('\n');
            out.push_str(detail.stack_trace);
        }
        out
    }
}

/// Build the visual tree for a failed job.
pub fn render_tree<'a>(
    record: &'a FailureRecord,
    state: DisplayState,
    now: DateTime<Utc>,
    humanize: Humanizer,
) -> VisualTree<'a> {
    let (relative_time, absolute_time) = match record.created_at() {
        RecordedAt::At(at) => (humanize(*at, now), Some(format_absolute(*at))),
        RecordedAt::Malformed(_) => (UNKNOWN_TIME.to_string(), None),
    };

    let summary = SummaryRow {
        severity: Severity::Failed,
        state,
        heading: format!("{} - {}", FAILED_HEADING, record.message()),
        message: record.message().to_string(),
        relative_time,
        absolute_time,
    };

    let detail = state.is_expanded().then(|| DetailPanel {
        exception_type: record.exception_type(),
        stack_trace: record.stack_trace(),
    });

    VisualTree { summary, detail }
}
