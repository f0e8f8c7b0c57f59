//! Job State View: renderers for job lifecycle states.
//!
//! Each finished job in the dashboard is shown through a renderer bound to
//! that job's state record. The failed state renders as:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │ ▸ ✖ Job processing failed - {message}             {relative time}│  always
//! ├─────────────────────────────────────────────────────────────────┤
//! │ {exception type}                                                │  expanded
//! │ {stack trace, whitespace preserved}                             │  only
//! └──────────────────────────────────────────────── {absolute time} ┘
//! ```
//!
//! ## Modules
//!
//! - `domain`: Failure record boundary and display state
//! - `time`: Relative/absolute time formatting
//! - `ticker`: Scoped tick subscriptions for live time text
//! - `ui`: Visual tree and ratatui drawing

pub mod domain;
pub mod errors;
pub mod ticker;
pub mod time;
pub mod ui;

pub use domain::{DisplayState, FailureRecord, RawFailureRecord, RecordedAt};
pub use errors::{InvalidRecordError, TickError};
pub use ticker::TickSubscription;
pub use time::{humanize_relative_time, UNKNOWN_TIME};
pub use ui::{FailedStatePanel, VisualTree};
