//! Backend-layer errors.

use thiserror::Error;

/// Everything a backend, its job table or the registry can reject.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    #[error("unknown backend: {0}")]
    UnknownBackend(String),

    #[error("invalid backend configuration: {0}")]
    Configuration(String),

    #[error("invalid program: {0}")]
    InvalidProgram(String),

    /// The program is wider than the backend or the encoding allows.
    #[error("program too large: {0}")]
    ProgramTooLarge(String),

    #[error("invalid shot count: {0}")]
    InvalidShots(String),

    #[error("invalid credit ceiling: {0}")]
    InvalidCredits(String),

    #[error("no such job: {0}")]
    JobNotFound(String),

    #[error("job failed: {0}")]
    JobFailed(String),

    #[error("job was cancelled")]
    JobCancelled,

    #[error("{0}")]
    Backend(String),
}

pub type HalResult<T> = Result<T, HalError>;
