//! Domain models for the admin panel.

mod app;

pub use app::{App, AppEvent, AppKey, AppState, JobEntry};
