//! Application state management.

use std::time::Duration;

use chrono::{DateTime, Utc};
use job_state_view::FailedStatePanel;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Application state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// Main dashboard view.
    #[default]
    Dashboard,
    /// Help overlay.
    Help,
    /// Quitting.
    Quit,
}

/// Messages delivered to the main loop from background tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Relative time of the given job's panel may have changed.
    Tick(Uuid),
}

/// Keys the dashboard reacts to, decoupled from the terminal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppKey {
    Char(char),
    Up,
    Down,
    PageUp,
    PageDown,
    Enter,
    Esc,
}

/// A failed job shown in the list.
#[derive(Debug)]
pub struct JobEntry {
    pub id: Uuid,
    pub job_name: String,
    pub panel: FailedStatePanel,
}

/// Rows scrolled per PageUp/PageDown.
const PAGE_ROWS: i32 = 10;

/// Main application model.
pub struct App {
    /// Current application state/view.
    pub state: AppState,
    /// Failed jobs, in display order.
    pub jobs: Vec<JobEntry>,
    /// Index of the selected job.
    pub selected: usize,
    /// Error message to display (if any).
    pub error_message: Option<String>,
    /// Whether the screen must be drawn again.
    pub needs_redraw: bool,
    /// Channel the mounted panel ticks on.
    events: mpsc::Sender<AppEvent>,
    /// Fixed tick cadence, overriding the per-record one.
    tick_override: Option<Duration>,
}

impl App {
    /// Create a new application instance and mount the first job's panel.
    pub fn new(
        jobs: Vec<JobEntry>,
        events: mpsc::Sender<AppEvent>,
        tick_override: Option<Duration>,
    ) -> Self {
        let mut app = Self {
            state: AppState::Dashboard,
            jobs,
            selected: 0,
            error_message: None,
            needs_redraw: true,
            events,
            tick_override,
        };
        app.mount_selected(Utc::now());
        app
    }

    /// Handle keyboard input.
    pub fn handle_key(&mut self, key: AppKey) {
        self.needs_redraw = true;
        match self.state {
            AppState::Dashboard => self.handle_dashboard_key(key),
            AppState::Help => {
                // Any key closes help
                self.state = AppState::Dashboard;
            }
            AppState::Quit => {}
        }
    }

    fn handle_dashboard_key(&mut self, key: AppKey) {
        match key {
            AppKey::Char('q') | AppKey::Char('Q') | AppKey::Esc => self.state = AppState::Quit,
            AppKey::Char('?') => self.state = AppState::Help,
            AppKey::Up | AppKey::Char('k') => self.select_prev(),
            AppKey::Down | AppKey::Char('j') => self.select_next(),
            AppKey::Enter | AppKey::Char(' ') => self.toggle_selected(),
            AppKey::PageUp => self.scroll_selected(-PAGE_ROWS),
            AppKey::PageDown => self.scroll_selected(PAGE_ROWS),
            _ => {}
        }
    }

    /// Handle a background event.
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick(id) => {
                // Ticks from a panel that was unmounted in the meantime are stale
                if self.selected_job().map(|job| job.id) == Some(id) {
                    self.needs_redraw = true;
                }
            }
        }
    }

    /// Move selection up.
    pub fn select_prev(&mut self) {
        if self.jobs.is_empty() {
            return;
        }
        let new_idx = if self.selected == 0 {
            self.jobs.len() - 1
        } else {
            self.selected - 1
        };
        self.select(new_idx);
    }

    /// Move selection down.
    pub fn select_next(&mut self) {
        if self.jobs.is_empty() {
            return;
        }
        let new_idx = (self.selected + 1) % self.jobs.len();
        self.select(new_idx);
    }

    fn select(&mut self, index: usize) {
        if index == self.selected {
            return;
        }
        if let Some(job) = self.jobs.get_mut(self.selected) {
            job.panel.unmount();
        }
        self.selected = index;
        self.mount_selected(Utc::now());
    }

    /// Subscribe the selected panel to live time updates.
    fn mount_selected(&mut self, now: DateTime<Utc>) {
        let events = self.events.clone();
        let tick_override = self.tick_override;
        let Some(job) = self.jobs.get_mut(self.selected) else {
            return;
        };

        let message = AppEvent::Tick(job.id);
        let result = match tick_override {
            Some(period) => job.panel.mount_with_period(events, message, period),
            None => job.panel.mount(events, message, now),
        };

        if let Err(e) = result {
            tracing::warn!(job_id = %job.id, error = %e, "Live time updates unavailable");
            self.error_message = Some(format!("Live time: {}", e));
        }
    }

    /// Expand or collapse the selected job's details.
    pub fn toggle_selected(&mut self) {
        if let Some(job) = self.jobs.get_mut(self.selected) {
            job.panel.toggle();
        }
    }

    fn scroll_selected(&mut self, delta: i32) {
        if let Some(job) = self.jobs.get_mut(self.selected) {
            job.panel.scroll_detail(delta);
        }
    }

    /// Get the currently selected job.
    pub fn selected_job(&self) -> Option<&JobEntry> {
        self.jobs.get(self.selected)
    }

    /// Check if the app should quit.
    pub fn should_quit(&self) -> bool {
        self.state == AppState::Quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use job_state_view::FailureRecord;

    fn job(name: &str) -> JobEntry {
        let record = FailureRecord::new(
            format!("{} failed", name),
            Utc::now() - chrono::Duration::minutes(2),
            "java.lang.RuntimeException",
            "at Job.run()",
        )
        .unwrap();
        JobEntry {
            id: Uuid::new_v4(),
            job_name: name.to_string(),
            panel: FailedStatePanel::bind(record),
        }
    }

    fn app(names: &[&str]) -> (App, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel(16);
        let jobs = names.iter().map(|n| job(n)).collect();
        (App::new(jobs, tx, None), rx)
    }

    #[tokio::test]
    async fn test_only_selected_panel_is_mounted() {
        let (mut app, _rx) = app(&["a", "b", "c"]);
        assert!(app.jobs[0].panel.is_mounted());
        assert!(!app.jobs[1].panel.is_mounted());

        app.handle_key(AppKey::Down);
        assert_eq!(app.selected, 1);
        assert!(!app.jobs[0].panel.is_mounted());
        assert!(app.jobs[1].panel.is_mounted());
    }

    #[tokio::test]
    async fn test_selection_wraps() {
        let (mut app, _rx) = app(&["a", "b"]);
        app.handle_key(AppKey::Up);
        assert_eq!(app.selected, 1);
        app.handle_key(AppKey::Down);
        assert_eq!(app.selected, 0);
    }

    #[tokio::test]
    async fn test_toggle_is_per_job() {
        let (mut app, _rx) = app(&["a", "b"]);
        app.handle_key(AppKey::Enter);
        assert!(app.jobs[0].panel.state().is_expanded());

        app.handle_key(AppKey::Down);
        assert!(!app.jobs[1].panel.state().is_expanded());
        assert!(app.jobs[0].panel.state().is_expanded());

        app.handle_key(AppKey::Char(' '));
        assert!(app.jobs[1].panel.state().is_expanded());
    }

    #[tokio::test]
    async fn test_stale_tick_ignored() {
        let (mut app, _rx) = app(&["a", "b"]);
        let first = app.jobs[0].id;
        app.handle_key(AppKey::Down);
        app.needs_redraw = false;

        app.handle_event(AppEvent::Tick(first));
        assert!(!app.needs_redraw);

        app.handle_event(AppEvent::Tick(app.jobs[1].id));
        assert!(app.needs_redraw);
    }

    #[tokio::test]
    async fn test_help_and_quit() {
        let (mut app, _rx) = app(&["a"]);
        app.handle_key(AppKey::Char('?'));
        assert_eq!(app.state, AppState::Help);
        app.handle_key(AppKey::Char('x'));
        assert_eq!(app.state, AppState::Dashboard);
        app.handle_key(AppKey::Esc);
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_empty_job_list() {
        let (mut app, _rx) = app(&[]);
        app.handle_key(AppKey::Down);
        app.handle_key(AppKey::Enter);
        assert!(app.selected_job().is_none());
        assert!(app.error_message.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_override_cadence() {
        let (tx, mut rx) = mpsc::channel(16);
        let jobs = vec![job("a")];
        let id = jobs[0].id;
        let _app = App::new(jobs, tx, Some(Duration::from_millis(250)));

        assert_eq!(rx.recv().await, Some(AppEvent::Tick(id)));
    }
}
