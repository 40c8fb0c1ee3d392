//! Backend trait and configuration.
//!
//! The [`Backend`] trait defines the lifecycle for running a program:
//!
//! ```text
//!   capabilities() ──→ validate() ──→ submit() ──→ status() ──→ result()
//! ```
//!
//! All calls are synchronous. A run is a blocking call that returns a
//! complete result; [`Backend::execute`] strings the lifecycle together.
//!
//! | Method | Required | Returns |
//! |--------|----------|---------|
//! | `name()` | yes | `&str` |
//! | `capabilities()` | yes | `&Capabilities` |
//! | `validate()` | provided | `ValidationResult` |
//! | `submit()` | yes | `HalResult<JobId>` |
//! | `status()` | yes | `HalResult<JobStatus>` |
//! | `result()` | yes | `HalResult<ExecutionResult>` |
//! | `cancel()` | yes | `HalResult<()>` |
//! | `execute()` | provided | `HalResult<ExecutionResult>` |

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::job::{JobId, JobStatus};
use crate::program::StatePreparation;
use crate::result::ExecutionResult;

/// Execution parameters for one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of shots.
    pub shots: u32,
    /// Credit ceiling for the job.
    pub max_credits: u32,
    /// Keep the outcome of every individual shot.
    pub memory: bool,
    /// Sampling seed; backends fall back to their own seed when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            shots: 1024,
            max_credits: 10,
            memory: false,
            seed: None,
        }
    }
}

impl RunConfig {
    /// Create a run configuration with the given shot count.
    pub fn new(shots: u32) -> Self {
        Self {
            shots,
            ..Self::default()
        }
    }

    /// Set the credit ceiling.
    #[must_use]
    pub fn with_max_credits(mut self, max_credits: u32) -> Self {
        self.max_credits = max_credits;
        self
    }

    /// Enable or disable per-shot memory.
    #[must_use]
    pub fn with_memory(mut self, memory: bool) -> Self {
        self.memory = memory;
        self
    }

    /// Set the sampling seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the configuration against backend limits.
    pub fn check(&self, capabilities: &Capabilities) -> HalResult<()> {
        if self.shots == 0 {
            return Err(HalError::InvalidShots("shots must be at least 1".into()));
        }
        if capabilities.is_stochastic() && self.shots > capabilities.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{} shots exceed the maximum of {} on {}",
                self.shots, capabilities.max_shots, capabilities.name
            )));
        }
        if self.max_credits == 0 {
            return Err(HalError::InvalidCredits(
                "max_credits must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration for creating a backend instance by name.
#[derive(Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name of the backend.
    pub name: String,
    /// Additional configuration.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    /// Create a new backend configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Add extra configuration.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Read an unsigned integer from the extra configuration.
    pub fn extra_u64(&self, key: &str) -> Option<u64> {
        self.extra.get(key).and_then(serde_json::Value::as_u64)
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("name", &self.name)
            .field("extra", &self.extra)
            .finish()
    }
}

/// Result of checking a program against backend constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// The program can be submitted as-is.
    Valid,
    /// The program cannot run on this backend.
    Invalid {
        /// Reasons the program is invalid.
        reasons: Vec<String>,
    },
}

impl ValidationResult {
    /// Check if the program is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Trait for simulation backends.
///
/// # Contract
///
/// - `capabilities()` is infallible and cached at construction time.
/// - `submit()` returns a `JobId`; local backends may finish the job
///   before returning.
/// - `result()` is only valid once `status()` reports `Completed`.
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Validate a program and run configuration against backend limits.
    fn validate(&self, program: &StatePreparation, config: &RunConfig) -> ValidationResult {
        let caps = self.capabilities();
        let reasons: Vec<String> = [check_width(program, caps), config.check(caps)]
            .into_iter()
            .filter_map(Result::err)
            .map(|e| e.to_string())
            .collect();

        if reasons.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid { reasons }
        }
    }

    /// Submit a program for execution.
    fn submit(&self, program: &StatePreparation, config: &RunConfig) -> HalResult<JobId>;

    /// Get the status of a job.
    fn status(&self, job_id: &JobId) -> HalResult<JobStatus>;

    /// Get the result of a completed job.
    fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult>;

    /// Cancel a job.
    fn cancel(&self, job_id: &JobId) -> HalResult<()>;

    /// Validate, submit and collect the result of a program.
    fn execute(
        &self,
        program: &StatePreparation,
        config: &RunConfig,
    ) -> HalResult<ExecutionResult> {
        let caps = self.capabilities();
        check_width(program, caps)?;
        config.check(caps)?;

        let job_id = self.submit(program, config)?;
        debug!(backend = self.name(), job = %job_id, "job submitted");

        match self.status(&job_id)? {
            JobStatus::Completed => self.result(&job_id),
            JobStatus::Failed(msg) => Err(HalError::JobFailed(msg)),
            JobStatus::Cancelled => Err(HalError::JobCancelled),
            JobStatus::Queued => Err(HalError::Backend(format!(
                "job {job_id} did not complete on a synchronous backend"
            ))),
        }
    }
}

/// Reject programs wider than the backend.
fn check_width(program: &StatePreparation, caps: &Capabilities) -> HalResult<()> {
    let width = program.resources().num_qubits;
    if width > caps.num_qubits {
        return Err(HalError::ProgramTooLarge(format!(
            "program '{}' needs {} qubits but {} supports {}",
            program.name(),
            width,
            caps.name,
            caps.num_qubits
        )));
    }
    Ok(())
}

/// Trait for creating backends from configuration.
pub trait BackendFactory: Backend + Sized {
    /// Create a backend from configuration.
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}
