//! Job domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical job record
///
/// The single normalized representation of a backend job, regardless of
/// which endpoint produced it or which naming convention that endpoint
/// used. `id` and `status` are always present; every other field
/// degrades independently to `None` when the raw record is missing or
/// malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    pub status: JobStatus,
    pub job_type: Option<String>,
    pub progress_percent: Option<f64>,
    pub current_step: Option<String>,
    pub total_items: Option<i64>,
    pub completed_items: Option<i64>,
    pub failed_items: Option<i64>,
    pub created_at: DateTime<Utc>,
    /// Falls back to `created_at` when the backend omits it.
    pub updated_at: DateTime<Utc>,
    pub finalized_at: Option<DateTime<Utc>>,
    pub lesson_id: Option<i64>,
    pub transcript: Option<String>,
    /// Storage locator reduced to its base object name.
    pub audio_object: Option<String>,
    pub error_message: Option<String>,
}

/// Job lifecycle status
///
/// Closed vocabulary. Raw statuses outside this set classify as
/// `Processing`, so an unknown status can never be mistaken for a
/// terminal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    WaitingForInput,
    ReadyToProcess,
    Processing,
    Reviewing,
    Reprocessing,
    Partial,
    Completed,
    Failed,
    Finalized,
}

impl JobStatus {
    /// Classify a raw backend status string.
    ///
    /// Total: never fails. An absent or unrecognized status maps to
    /// `Processing`; `RUNNING` is the one aliased spelling. Matching is
    /// case-insensitive.
    pub fn classify(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return JobStatus::Processing;
        };
        match raw.trim().to_ascii_uppercase().as_str() {
            "PENDING" => JobStatus::Pending,
            "WAITING_FOR_INPUT" => JobStatus::WaitingForInput,
            "READY_TO_PROCESS" => JobStatus::ReadyToProcess,
            "PROCESSING" | "RUNNING" => JobStatus::Processing,
            "REVIEWING" => JobStatus::Reviewing,
            "REPROCESSING" => JobStatus::Reprocessing,
            "PARTIAL" => JobStatus::Partial,
            "COMPLETED" => JobStatus::Completed,
            "FAILED" => JobStatus::Failed,
            "FINALIZED" => JobStatus::Finalized,
            _ => JobStatus::Processing,
        }
    }

    /// Canonical wire spelling of this status
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::WaitingForInput => "WAITING_FOR_INPUT",
            JobStatus::ReadyToProcess => "READY_TO_PROCESS",
            JobStatus::Processing => "PROCESSING",
            JobStatus::Reviewing => "REVIEWING",
            JobStatus::Reprocessing => "REPROCESSING",
            JobStatus::Partial => "PARTIAL",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
            JobStatus::Finalized => "FINALIZED",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The statuses after which a given job kind stops changing.
///
/// Different job kinds finish in different states: bulk vocabulary jobs
/// can end `Partial`, audio alignment jobs pass through review and end
/// `Finalized`. The set is supplied by the caller per job kind rather
/// than hard-coded in the poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalSet(Vec<JobStatus>);

impl TerminalSet {
    pub fn new(statuses: impl IntoIterator<Item = JobStatus>) -> Self {
        Self(statuses.into_iter().collect())
    }

    /// Terminal set for bulk vocabulary creation jobs
    pub fn bulk_vocabulary() -> Self {
        Self::new([JobStatus::Completed, JobStatus::Failed, JobStatus::Partial])
    }

    /// Terminal set for audio alignment jobs
    pub fn audio_alignment() -> Self {
        Self::new([JobStatus::Completed, JobStatus::Failed, JobStatus::Finalized])
    }

    pub fn contains(&self, status: JobStatus) -> bool {
        self.0.contains(&status)
    }
}
