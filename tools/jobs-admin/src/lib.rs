//! Jobs-Admin: failed job inspector.
//!
//! A TUI panel for looking into jobs that ended in the failed state. Each
//! listed job is backed by its own `FailedStatePanel` from `job-state-view`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  JOBS-ADMIN                                                     │
//! ├────────────────────────┬────────────────────────────────────────┤
//! │  FAILED JOBS           │  JOB DETAIL                            │
//! │  ✖ MailService.send    │  ▸ ✖ Job processing failed - ...       │
//! │    20 seconds ago      │                                        │
//! │  ...                   │                                        │
//! └────────────────────────┴────────────────────────────────────────┘
//! ```

pub mod config;
pub mod domain;
pub mod source;
pub mod ui;

pub use domain::{App, AppEvent, AppKey, AppState, JobEntry};
