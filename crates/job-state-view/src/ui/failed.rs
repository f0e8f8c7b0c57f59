//! Failed-state panel renderer.
//!
//! One [`FailedStatePanel`] is bound per failed job. It owns the record, the
//! collapsed/expanded flag and, while mounted, the tick subscription that
//! keeps the relative time fresh.

use std::cell::Cell;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tokio::sync::mpsc;

use super::tree::{render_tree, DetailPanel, SummaryRow, VisualTree};
use crate::domain::{DisplayState, FailureRecord};
use crate::errors::TickError;
use crate::ticker::{self, TickSubscription};
use crate::time::{humanize_relative_time, refresh_period, Humanizer};

const TAB_WIDTH: usize = 4;

/// Starts a tick task at the given period.
type Subscriber = Box<dyn Fn(Duration) -> Result<TickSubscription, TickError> + Send>;

/// How often a mounted panel asks for a redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cadence {
    /// Follows the bound record's age.
    Adaptive,
    Fixed(Duration),
}

/// Live-update registration, held from mount until unmount.
struct Mount {
    cadence: Cadence,
    subscriber: Subscriber,
    /// `None` while the bound record has no usable timestamp.
    subscription: Option<TickSubscription>,
}

impl Mount {
    fn new<T>(cadence: Cadence, sender: mpsc::Sender<T>, message: T) -> Self
    where
        T: Clone + Send + 'static,
    {
        Self {
            cadence,
            subscriber: Box::new(move |period| {
                ticker::subscribe(period, sender.clone(), message.clone())
            }),
            subscription: None,
        }
    }

    /// (Re)start ticking for `record`. Any previous task is stopped first.
    fn start(&mut self, record: &FailureRecord, now: DateTime<Utc>) -> Result<(), TickError> {
        self.subscription = None;

        let period = match self.cadence {
            Cadence::Fixed(period) => period,
            Cadence::Adaptive => match record.created_at().instant() {
                Some(at) => refresh_period(at, now),
                None => {
                    tracing::debug!("Timestamp unknown, skipping tick subscription");
                    return Ok(());
                }
            },
        };

        self.subscription = Some((self.subscriber)(period)?);
        Ok(())
    }
}

impl fmt::Debug for Mount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mount")
            .field("cadence", &self.cadence)
            .field("subscription", &self.subscription)
            .finish_non_exhaustive()
    }
}

/// Renderer for a job in its terminal failed state.
#[derive(Debug)]
pub struct FailedStatePanel {
    record: FailureRecord,
    state: DisplayState,
    /// First stack-trace row shown when expanded.
    scroll: u16,
    /// Stack-trace area of the last draw.
    trace_viewport: Cell<Option<Rect>>,
    humanize: Humanizer,
    mount: Option<Mount>,
}

impl FailedStatePanel {
    /// Bind a record. The panel starts collapsed and unmounted.
    pub fn bind(record: FailureRecord) -> Self {
        tracing::debug!(failure = %record.message(), "Failed-state panel bound");
        Self {
            record,
            state: DisplayState::Collapsed,
            scroll: 0,
            trace_viewport: Cell::new(None),
            humanize: humanize_relative_time,
            mount: None,
        }
    }

    /// Replace the relative-time formatter.
    pub fn with_humanizer(mut self, humanize: Humanizer) -> Self {
        self.humanize = humanize;
        self
    }

    /// Bind a different record to this instance, starting collapsed again.
    ///
    /// A mounted panel keeps ticking for the new record, at the cadence the
    /// new record needs.
    pub fn rebind(&mut self, record: FailureRecord) -> Result<(), TickError> {
        tracing::debug!(failure = %record.message(), "Failed-state panel rebound");
        self.record = record;
        self.state = DisplayState::Collapsed;
        self.scroll = 0;

        match self.mount.as_mut() {
            Some(mount) => mount.start(&self.record, Utc::now()),
            None => Ok(()),
        }
    }

    pub fn record(&self) -> &FailureRecord {
        &self.record
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    /// Flip between collapsed and expanded.
    pub fn toggle(&mut self) -> DisplayState {
        self.state = self.state.toggled();
        if !self.state.is_expanded() {
            self.scroll = 0;
        }
        tracing::debug!(state = ?self.state, "Failed-state panel toggled");
        self.state
    }

    /// Scroll the stack trace by `delta` rows. Ignored while collapsed.
    pub fn scroll_detail(&mut self, delta: i32) {
        if !self.state.is_expanded() {
            return;
        }
        let max = self.max_scroll();
        let current = self.scroll.min(max);
        self.scroll = (current as i64 + delta as i64).clamp(0, max as i64) as u16;
    }

    /// First stack-trace row shown when expanded.
    pub fn scroll(&self) -> u16 {
        self.scroll.min(self.max_scroll())
    }

    /// Highest offset that still fills the stack-trace area.
    fn max_scroll(&self) -> u16 {
        let rows = match self.trace_viewport.get() {
            Some(viewport) => self
                .trace_rows(viewport.width)
                .saturating_sub(viewport.height as usize),
            // Not drawn yet: bound by the narrowest possible wrap
            None => self.trace_rows(1).saturating_sub(1),
        };
        rows.min(u16::MAX as usize) as u16
    }

    /// Terminal rows the stack trace takes once wrapped at `columns`.
    fn trace_rows(&self, columns: u16) -> usize {
        trace_paragraph(self.record.stack_trace()).line_count(columns.max(1))
    }

    /// Start live time updates, at the cadence the record's age needs.
    ///
    /// A record with a malformed timestamp shows a fixed placeholder, so the
    /// panel is mounted without a tick task until it is rebound.
    pub fn mount<T>(
        &mut self,
        sender: mpsc::Sender<T>,
        message: T,
        now: DateTime<Utc>,
    ) -> Result<(), TickError>
    where
        T: Clone + Send + 'static,
    {
        self.start_mount(Mount::new(Cadence::Adaptive, sender, message), now)
    }

    /// Start live time updates at a fixed cadence.
    pub fn mount_with_period<T>(
        &mut self,
        sender: mpsc::Sender<T>,
        message: T,
        period: Duration,
    ) -> Result<(), TickError>
    where
        T: Clone + Send + 'static,
    {
        self.start_mount(Mount::new(Cadence::Fixed(period), sender, message), Utc::now())
    }

    fn start_mount(&mut self, mut mount: Mount, now: DateTime<Utc>) -> Result<(), TickError> {
        // Replacing an existing mount drops (and stops) its task
        self.mount = None;
        mount.start(&self.record, now)?;
        tracing::debug!(cadence = ?mount.cadence, "Failed-state panel mounted");
        self.mount = Some(mount);
        Ok(())
    }

    /// Stop live time updates.
    pub fn unmount(&mut self) {
        if let Some(mount) = self.mount.take() {
            if let Some(subscription) = mount.subscription {
                subscription.cancel();
            }
            tracing::debug!("Failed-state panel unmounted");
        }
    }

    /// Mounted and not yet unmounted.
    pub fn is_mounted(&self) -> bool {
        self.mount.is_some()
    }

    /// A tick task is currently running for this panel.
    pub fn is_ticking(&self) -> bool {
        self.mount
            .as_ref()
            .is_some_and(|mount| mount.subscription.is_some())
    }

    /// Visual tree at `now`.
    pub fn tree(&self, now: DateTime<Utc>) -> VisualTree<'_> {
        render_tree(&self.record, self.state, now, self.humanize)
    }

    /// Rows needed to show the panel without clipping at `width` columns.
    pub fn required_height(&self, width: u16) -> u16 {
        // Borders plus summary row
        let mut height: usize = 3;

        if self.state.is_expanded() {
            // Separator, exception type, blank line
            height += 3;
            height += self.trace_rows(width.saturating_sub(2));
        }

        height.min(u16::MAX as usize) as u16
    }

    /// Draw the panel into `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect, now: DateTime<Utc>) {
        let tree = self.tree(now);
        let summary = &tree.summary;
        let fit = SummaryFit::choose(summary, area.width.saturating_sub(2));

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));
        if fit == SummaryFit::TimeInBorder {
            block = block.title_top(
                Line::styled(relative_label(summary), summary.severity.style()).right_aligned(),
            );
        }
        if let Some(absolute) = &summary.absolute_time {
            block = block.title_bottom(
                Line::styled(format!(" {} ", absolute), Style::default().fg(Color::DarkGray))
                    .right_aligned(),
            );
        }

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Summary row
                Constraint::Min(0),    // Detail panel
            ])
            .split(inner);

        render_summary(frame, chunks[0], summary, fit);

        if let Some(detail) = &tree.detail {
            self.render_detail(frame, chunks[1], detail);
        }
    }

    /// Render the exception type and stack trace.
    fn render_detail(&self, frame: &mut Frame, area: Rect, detail: &DetailPanel<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Separator + exception type + blank
                Constraint::Min(0),    // Stack trace
            ])
            .split(area);

        let header = Paragraph::new(vec![
            Line::styled(
                detail.exception_type,
                Style::default()
                    .fg(Color::LightRed)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::raw(""),
        ])
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(header, chunks[0]);

        self.trace_viewport.set(Some(chunks[1]));
        let trace = trace_paragraph(detail.stack_trace).scroll((self.scroll(), 0));
        frame.render_widget(trace, chunks[1]);
    }
}

/// How the summary row uses its width. The message is the last thing given up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SummaryFit {
    /// Full heading, relative time at the right of the row.
    Full,
    /// Message without the heading prefix, relative time on the row.
    Compact,
    /// Message alone on the row, relative time in the top border.
    TimeInBorder,
}

impl SummaryFit {
    fn choose(summary: &SummaryRow, columns: u16) -> Self {
        let taken = Span::raw(lead(summary)).width() + Span::raw(relative_label(summary)).width();
        let fits = |heading: &str| taken + Span::raw(heading).width() <= columns as usize;

        if fits(&summary.heading) {
            SummaryFit::Full
        } else if fits(&summary.message) {
            SummaryFit::Compact
        } else {
            SummaryFit::TimeInBorder
        }
    }
}

/// Indicator and severity icon ahead of the heading.
fn lead(summary: &SummaryRow) -> String {
    format!(" {} {} ", summary.state.indicator(), summary.severity.icon())
}

fn relative_label(summary: &SummaryRow) -> String {
    format!(" {} ", summary.relative_time)
}

/// Render the always-visible summary row.
fn render_summary(frame: &mut Frame, area: Rect, summary: &SummaryRow, fit: SummaryFit) {
    let severity = summary.severity;
    let heading = match fit {
        SummaryFit::Full => summary.heading.as_str(),
        SummaryFit::Compact | SummaryFit::TimeInBorder => summary.message.as_str(),
    };
    let relative = match fit {
        SummaryFit::TimeInBorder => String::new(),
        SummaryFit::Full | SummaryFit::Compact => relative_label(summary),
    };
    let relative_width = Span::raw(relative.as_str()).width() as u16;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),                 // Heading
            Constraint::Length(relative_width), // Relative time
        ])
        .split(area);

    let line = Line::from(vec![
        Span::raw(lead(summary)),
        Span::styled(heading, severity.heading_style()),
    ]);
    frame.render_widget(Paragraph::new(line).style(severity.style()), chunks[0]);

    let time = Paragraph::new(Line::raw(relative).right_aligned()).style(severity.style());
    frame.render_widget(time, chunks[1]);
}

/// Wrapped stack trace, as drawn and as measured.
fn trace_paragraph(stack_trace: &str) -> Paragraph<'static> {
    Paragraph::new(stack_trace_text(stack_trace)).wrap(Wrap { trim: false })
}

/// One terminal line per stack-trace line, leading whitespace kept.
fn stack_trace_text(stack_trace: &str) -> Text<'static> {
    stack_trace
        .split('\n')
        .map(|line| Line::raw(expand_tabs(line.strip_suffix('\r').unwrap_or(line))))
        .collect::<Vec<_>>()
        .into()
}

/// Terminals render a literal tab inconsistently.
fn expand_tabs(line: &str) -> String {
    line.replace('\t', &" ".repeat(TAB_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::domain::RecordedAt;

    fn record() -> FailureRecord {
        FailureRecord::new(
            "Connection refused",
            Utc.with_ymd_and_hms(2020, 10, 16, 7, 30, 0).unwrap(),
            "java.net.ConnectException",
            "at Foo.bar()\n\tat Baz.qux()",
        )
        .unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 10, 16, 7, 30, 30).unwrap()
    }

    fn draw(panel: &FailedStatePanel, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| panel.render(frame, frame.area(), now()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect()
    }

    #[test]
    fn test_starts_collapsed() {
        let panel = FailedStatePanel::bind(record());
        assert_eq!(panel.state(), DisplayState::Collapsed);
        assert!(!panel.is_mounted());
        assert!(panel.tree(now()).detail.is_none());
    }

    #[test]
    fn test_rebind_resets_state() {
        let mut panel = FailedStatePanel::bind(record());
        panel.toggle();
        panel
            .rebind(FailureRecord::new("other", RecordedAt::parse("x"), "", "").unwrap())
            .unwrap();
        assert_eq!(panel.state(), DisplayState::Collapsed);
        assert_eq!(panel.record().message(), "other");
        assert!(!panel.is_mounted());
    }

    #[test]
    fn test_required_height() {
        let mut panel = FailedStatePanel::bind(record());
        assert_eq!(panel.required_height(80), 3);

        panel.toggle();
        // 3 + separator/exception/blank + two trace lines
        assert_eq!(panel.required_height(80), 8);
        // Both trace lines wrap once at 10 inner columns
        assert_eq!(panel.required_height(12), 10);
    }

    #[test]
    fn test_scroll_clamped_and_reset() {
        let mut panel = FailedStatePanel::bind(record());
        panel.scroll_detail(5);
        assert_eq!(panel.scroll(), 0);

        panel.toggle();
        // One visible trace row for two trace lines
        draw(&panel, 80, 7);
        panel.scroll_detail(5);
        assert_eq!(panel.scroll(), 1);
        panel.scroll_detail(-3);
        assert_eq!(panel.scroll(), 0);

        panel.scroll_detail(1);
        panel.toggle();
        assert_eq!(panel.scroll(), 0);
    }

    #[test]
    fn test_draw_collapsed() {
        let panel = FailedStatePanel::bind(record());
        let rows = draw(&panel, 80, 3);
        let screen = rows.join("\n");

        assert!(rows[1].contains("Job processing failed - Connection refused"));
        assert!(rows[1].contains("30 seconds ago"));
        assert!(rows[2].contains("2020-10-16 07:30:00 UTC"));
        assert!(!screen.contains("java.net.ConnectException"));
    }

    #[test]
    fn test_draw_expanded_keeps_indentation() {
        let mut panel = FailedStatePanel::bind(record());
        panel.toggle();
        let rows = draw(&panel, 80, 12);

        assert!(rows[3].contains("java.net.ConnectException"));
        assert!(rows[5].contains("at Foo.bar()"));
        assert!(rows[6].contains("│    at Baz.qux()"));
    }

    #[test]
    fn test_scroll_reaches_end_of_wrapped_trace() {
        let long = "x".repeat(60);
        let trace = format!("{long}\n{long}\n{}END", "x".repeat(57));
        let record = FailureRecord::new("boom", RecordedAt::parse("x"), "E", trace).unwrap();
        let mut panel = FailedStatePanel::bind(record);
        panel.toggle();

        // 20 columns wrap each line into 3 rows; 3 rows are visible
        draw(&panel, 22, 9);
        for _ in 0..100 {
            panel.scroll_detail(1);
        }
        assert_eq!(panel.scroll(), 6);
        let rows = draw(&panel, 22, 9);
        assert!(rows[7].contains("xxxxxxxxxxxxxxxxxEND"));

        panel.scroll_detail(-1);
        assert_eq!(panel.scroll(), 5);
    }

    #[test]
    fn test_scroll_before_first_draw_is_clamped_when_drawn() {
        let long = "x".repeat(60);
        let trace = format!("{long}\n{long}\n{}END", "x".repeat(57));
        let record = FailureRecord::new("boom", RecordedAt::parse("x"), "E", trace).unwrap();
        let mut panel = FailedStatePanel::bind(record);
        panel.toggle();

        for _ in 0..100 {
            panel.scroll_detail(1);
        }
        let rows = draw(&panel, 22, 9);
        assert!(rows.join("\n").contains("END"));
        assert_eq!(panel.scroll(), 6);
    }

    #[test]
    fn test_message_kept_at_dashboard_panel_width() {
        // Panel width inside jobs-admin on an 80-column terminal
        let panel = FailedStatePanel::bind(record());
        let rows = draw(&panel, 44, 3);

        assert!(rows[1].contains("Connection refused"));
        assert!(rows[1].contains("30 seconds ago"));
        assert!(!rows[1].contains("Job processing failed"));
    }

    #[test]
    fn test_narrow_row_moves_time_to_border() {
        let panel = FailedStatePanel::bind(record());
        let rows = draw(&panel, 28, 3);

        assert!(rows[0].contains("30 seconds ago"));
        assert!(rows[1].contains("Connection refused"));
        assert!(!rows[1].contains("seconds ago"));
    }

    #[test]
    fn test_draw_malformed_time() {
        let record = FailureRecord::new("boom", RecordedAt::parse("not-a-date"), "", "").unwrap();
        let panel = FailedStatePanel::bind(record);
        let rows = draw(&panel, 60, 5);

        assert!(rows[1].contains("Job processing failed - boom"));
        assert!(rows[1].contains("unknown time"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_and_unmount() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut panel = FailedStatePanel::bind(record());

        panel.mount(tx, "tick", now()).unwrap();
        assert!(panel.is_mounted());
        assert!(panel.is_ticking());
        assert_eq!(rx.recv().await, Some("tick"));

        panel.unmount();
        assert!(!panel.is_mounted());
        assert!(!panel.is_ticking());
        while rx.recv().await.is_some() {}
    }

    fn unknown_time() -> FailureRecord {
        FailureRecord::new("boom", RecordedAt::parse("nope"), "", "").unwrap()
    }

    #[tokio::test]
    async fn test_unknown_time_mounts_without_ticking() {
        let (tx, _rx) = mpsc::channel(4);
        let mut panel = FailedStatePanel::bind(unknown_time());

        panel.mount(tx, (), now()).unwrap();
        assert!(panel.is_mounted());
        assert!(!panel.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rebind_starts_ticking_for_known_time() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut panel = FailedStatePanel::bind(unknown_time());
        panel.mount(tx, "tick", now()).unwrap();

        panel.rebind(record()).unwrap();
        assert!(panel.is_ticking());
        assert_eq!(rx.recv().await, Some("tick"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rebind_to_unknown_time_stops_ticking() {
        let (tx, _rx) = mpsc::channel(4);
        let mut panel = FailedStatePanel::bind(record());
        panel.mount(tx, (), now()).unwrap();
        assert!(panel.is_ticking());

        panel.rebind(unknown_time()).unwrap();
        assert!(panel.is_mounted());
        assert!(!panel.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_cadence_survives_rebind() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut panel = FailedStatePanel::bind(record());
        panel
            .mount_with_period(tx, "tick", Duration::from_millis(250))
            .unwrap();

        panel.rebind(unknown_time()).unwrap();
        assert!(panel.is_ticking());
        assert_eq!(rx.recv().await, Some("tick"));
    }
}
