//! Job export types matching the job engine's JSON.

use job_state_view::RawFailureRecord;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One failed job as exported by the job engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedJobRecord {
    pub id: Uuid,
    /// Human-readable job signature, e.g. `EmailService.send(String)`
    #[serde(default)]
    pub job_name: String,
    /// The job's failed state
    pub state: RawFailureRecord,
}
