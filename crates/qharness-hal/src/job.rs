//! Job bookkeeping.
//!
//! Local backends evaluate a program inside `submit()`, so a job is either
//! still `Queued` (never finished) or in one of three terminal states.
//! A finished job never changes state again.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque job identifier handed out by `Backend::submit`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a job is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum JobStatus {
    /// Accepted but not yet evaluated.
    Queued,
    /// Evaluated; a result is available.
    Completed,
    /// Evaluation raised an error.
    Failed(String),
    /// Withdrawn before it finished.
    Cancelled,
}

impl JobStatus {
    /// True once the job can no longer change state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Queued)
    }

    /// True if a result is available.
    pub fn is_success(&self) -> bool {
        matches!(self, JobStatus::Completed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Queued => f.write_str("queued"),
            JobStatus::Completed => f.write_str("completed"),
            JobStatus::Failed(reason) => write!(f, "failed ({reason})"),
            JobStatus::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// A submitted run and the budget it was submitted with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub backend: String,
    pub status: JobStatus,
    pub shots: u32,
    pub max_credits: u32,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    /// A queued job on `backend`.
    pub fn queued(id: JobId, backend: impl Into<String>, shots: u32, max_credits: u32) -> Self {
        Self {
            id,
            backend: backend.into(),
            status: JobStatus::Queued,
            shots,
            max_credits,
            submitted_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Move a queued job to `status`.
    ///
    /// Returns false, leaving the job untouched, if it had already finished.
    pub fn finish(&mut self, status: JobStatus) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        if status.is_terminal() {
            self.finished_at = Some(Utc::now());
        }
        self.status = status;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_queued_is_open() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed("no shots".into()).is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_only_completed_is_success() {
        assert!(JobStatus::Completed.is_success());
        assert!(!JobStatus::Queued.is_success());
        assert!(!JobStatus::Failed("no shots".into()).is_success());
        assert!(!JobStatus::Cancelled.is_success());
    }

    #[test]
    fn test_queued_job() {
        let job = Job::queued(JobId::new("a1"), "qasm_simulator", 1000, 10);
        assert_eq!(job.id.as_str(), "a1");
        assert_eq!(job.backend, "qasm_simulator");
        assert_eq!(job.status, JobStatus::Queued);
        assert!(job.finished_at.is_none());
    }

    #[test]
    fn test_finished_job_is_frozen() {
        let mut job = Job::queued(JobId::new("a2"), "statevector_simulator", 1, 10);
        assert!(job.finish(JobStatus::Completed));
        assert!(job.finished_at.is_some());
        assert!(!job.finish(JobStatus::Cancelled));
        assert_eq!(job.status, JobStatus::Completed);
    }

    #[test]
    fn test_status_serializes_reason() {
        let json = serde_json::to_string(&JobStatus::Failed("bad width".into())).unwrap();
        assert_eq!(json, r#"{"state":"failed","reason":"bad width"}"#);
    }
}
