//! Jobs-Admin: failed job inspector.
//!
//! ## Usage
//!
//! ```bash
//! # Inspect a JSON export of failed jobs
//! jobs-admin --file failed-jobs.json
//!
//! # Try it out with sample data
//! jobs-admin --demo
//! ```

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;

use jobs_admin::config::{self, Args, LogConfig};
use jobs_admin::source;
use jobs_admin::{ui, App, AppEvent, AppKey};

/// Pending ticks the main loop may lag behind by.
const EVENT_CHANNEL_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    config::init_logging(&LogConfig::from_args(&args))?;

    // Load jobs before touching the terminal so errors print normally
    let report = source::load_report(&args, chrono::Utc::now())?;
    tracing::info!(jobs = report.jobs.len(), demo = args.demo, "Starting jobs-admin");

    // Setup terminal with panic hook for cleanup
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let summary = report.summary();
    let mut app = App::new(report.jobs, events_tx, args.tick_override());
    if app.error_message.is_none() {
        app.error_message = summary;
    }

    let result = run_app(&mut terminal, &mut app, events_rx);

    // Stop tick tasks before the runtime shuts down
    drop(app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "jobs-admin exited with error");
    }
    result
}

/// Main application loop.
///
/// Ticks and key presses are both handled here, one at a time, so a tick
/// never observes a half-applied toggle.
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut events_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    let poll_timeout = Duration::from_millis(100);

    loop {
        if app.needs_redraw {
            let now = chrono::Utc::now();
            terminal.draw(|frame| ui::render(frame, app, now))?;
            app.needs_redraw = false;
        }

        // Drain ticks (non-blocking)
        while let Ok(event) = events_rx.try_recv() {
            app.handle_event(event);
        }

        if event::poll(poll_timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(key) = map_key(key.code) {
                        app.handle_key(key);
                    }
                }
                Event::Resize(_, _) => app.needs_redraw = true,
                _ => {}
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}

/// Translate a terminal key into a dashboard key.
fn map_key(code: KeyCode) -> Option<AppKey> {
    match code {
        KeyCode::Char(c) => Some(AppKey::Char(c)),
        KeyCode::Up => Some(AppKey::Up),
        KeyCode::Down => Some(AppKey::Down),
        KeyCode::PageUp => Some(AppKey::PageUp),
        KeyCode::PageDown => Some(AppKey::PageDown),
        KeyCode::Enter => Some(AppKey::Enter),
        KeyCode::Esc => Some(AppKey::Esc),
        _ => None,
    }
}
