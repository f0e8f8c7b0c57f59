//! Right panel: selected job and its failed-state panel.

use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::App;

/// Render the detail panel for the selected job.
pub fn render(frame: &mut Frame, area: Rect, app: &App, now: DateTime<Utc>) {
    let block = Block::default()
        .title(" JOB DETAIL ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let Some(job) = app.selected_job() else {
        let placeholder = Paragraph::new(Line::styled(
            "Nothing to show",
            Style::default().fg(Color::DarkGray),
        ))
        .centered();
        frame.render_widget(placeholder, inner_area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Job identity
            Constraint::Min(3),    // Failed-state panel
        ])
        .split(inner_area);

    let identity = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(" Job   ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                job.job_name.as_str(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled(" Id    ", Style::default().fg(Color::DarkGray)),
            Span::raw(job.id.to_string()),
        ]),
        Line::raw(""),
    ]);
    frame.render_widget(identity, chunks[0]);

    // Panel takes what it needs, the rest stays empty
    let panel_area = chunks[1];
    let height = job
        .panel
        .required_height(panel_area.width)
        .min(panel_area.height);
    let panel_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(height), Constraint::Min(0)])
        .split(panel_area);

    job.panel.render(frame, panel_chunks[0], now);
}
