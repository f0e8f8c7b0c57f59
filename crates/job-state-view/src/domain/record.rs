//! Failure record: the immutable input of the failed-state renderer.
//!
//! Records arrive from the job engine as loosely typed JSON
//! ([`RawFailureRecord`]) and are checked once, at bind time, by
//! [`FailureRecord::try_from`]. After that point the record is read-only.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::InvalidRecordError;

/// Failure state as serialized by the job engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFailureRecord {
    #[serde(default)]
    pub message: Option<String>,
    /// ISO-8601 string or epoch milliseconds; anything else is kept as-is.
    #[serde(default)]
    pub created_at: Option<serde_json::Value>,
    #[serde(default)]
    pub exception_type: Option<String>,
    #[serde(default)]
    pub stack_trace: Option<String>,
}

/// Instant a failure was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedAt {
    /// A valid point in time.
    At(DateTime<Utc>),
    /// Unparsable input, kept verbatim for diagnostics.
    Malformed(String),
}

impl RecordedAt {
    /// Parse an absolute timestamp.
    ///
    /// Accepts RFC 3339 with an offset, a naive `YYYY-MM-DDTHH:MM:SS[.f]`
    /// (read as UTC), or a decimal string of epoch milliseconds.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        if let Ok(at) = DateTime::parse_from_rfc3339(trimmed) {
            return RecordedAt::At(at.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
            return RecordedAt::At(Utc.from_utc_datetime(&naive));
        }
        if let Ok(millis) = trimmed.parse::<i64>() {
            return Self::from_epoch_millis(millis)
                .unwrap_or_else(|| RecordedAt::Malformed(raw.to_string()));
        }

        RecordedAt::Malformed(raw.to_string())
    }

    fn from_epoch_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(RecordedAt::At)
    }

    fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Self::parse(s),
            serde_json::Value::Number(n) => n
                .as_i64()
                .and_then(Self::from_epoch_millis)
                .unwrap_or_else(|| RecordedAt::Malformed(n.to_string())),
            other => RecordedAt::Malformed(other.to_string()),
        }
    }

    /// The parsed instant, if the input was valid.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            RecordedAt::At(at) => Some(*at),
            RecordedAt::Malformed(_) => None,
        }
    }
}

impl From<DateTime<Utc>> for RecordedAt {
    fn from(at: DateTime<Utc>) -> Self {
        RecordedAt::At(at)
    }
}

/// A job's terminal failure, validated at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    message: String,
    created_at: RecordedAt,
    exception_type: String,
    stack_trace: String,
}

impl FailureRecord {
    /// Build a record, rejecting a blank message.
    pub fn new(
        message: impl Into<String>,
        created_at: impl Into<RecordedAt>,
        exception_type: impl Into<String>,
        stack_trace: impl Into<String>,
    ) -> Result<Self, InvalidRecordError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(InvalidRecordError::EmptyMessage);
        }

        let created_at = created_at.into();
        if let RecordedAt::Malformed(raw) = &created_at {
            tracing::warn!(created_at = %raw, "Failure record has an unparsable timestamp");
        }

        Ok(Self {
            message,
            created_at,
            exception_type: exception_type.into(),
            stack_trace: stack_trace.into(),
        })
    }

    /// Human-readable failure summary. Never blank.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn created_at(&self) -> &RecordedAt {
        &self.created_at
    }

    /// Exception classification; empty when the producer did not know it.
    pub fn exception_type(&self) -> &str {
        &self.exception_type
    }

    /// Preformatted stack trace, whitespace preserved.
    pub fn stack_trace(&self) -> &str {
        &self.stack_trace
    }
}

impl TryFrom<RawFailureRecord> for FailureRecord {
    type Error = InvalidRecordError;

    fn try_from(raw: RawFailureRecord) -> Result<Self, Self::Error> {
        let message = raw.message.ok_or(InvalidRecordError::MissingMessage)?;
        let created_at = match &raw.created_at {
            Some(value) => RecordedAt::from_json(value),
            None => RecordedAt::Malformed(String::new()),
        };

        Self::new(
            message,
            created_at,
            raw.exception_type.unwrap_or_default(),
            raw.stack_trace.unwrap_or_default(),
        )
    }
}
