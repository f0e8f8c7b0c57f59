//! # Error Types
//!
//! Errors surfaced by the job state renderers. Only structural problems with
//! a record escalate to the caller; malformed timestamps and empty detail
//! fields are displayable states, not errors.

use thiserror::Error;

/// A failure record that cannot be rendered at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRecordError {
    /// The producer did not supply the `message` field.
    #[error("Invalid failure record: required field `message` is missing")]
    MissingMessage,

    /// The `message` field is present but has no visible content.
    #[error("Invalid failure record: `message` is empty")]
    EmptyMessage,
}

/// Errors raised while subscribing to a tick source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TickError {
    /// A tick period of zero would spin the interval task.
    #[error("Tick period must be greater than zero")]
    ZeroPeriod,

    /// Subscriptions spawn onto the current tokio runtime.
    #[error("No tokio runtime available for tick subscription")]
    NoRuntime,
}
