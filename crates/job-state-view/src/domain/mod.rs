//! Domain models for job state rendering.

mod record;
mod state;

pub use record::{FailureRecord, RawFailureRecord, RecordedAt};
pub use state::DisplayState;
