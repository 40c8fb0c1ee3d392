//! Deterministic state-vector backend.

use std::time::Instant;

use tracing::{debug, instrument};

use qharness_hal::{
    Backend, BackendConfig, BackendFactory, Capabilities, Counts, ExecutionResult, HalResult,
    JobId, JobStatus, RunConfig, StatePreparation,
};

use crate::DEFAULT_MAX_QUBITS;
use crate::jobs::JobTable;

/// Backend that returns the exact final state of the measured registers.
///
/// No sampling takes place: counts stay empty and `shots` is only
/// recorded. Acceptance checks on this backend use exact tolerances.
pub struct StatevectorBackend {
    config: BackendConfig,
    capabilities: Capabilities,
    jobs: JobTable,
}

impl StatevectorBackend {
    /// Create a state-vector backend with default settings.
    pub fn new() -> Self {
        Self::with_max_qubits(DEFAULT_MAX_QUBITS)
    }

    /// Create a state-vector backend accepting programs up to `max_qubits`.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self {
            config: BackendConfig::new("statevector_simulator"),
            capabilities: Capabilities::statevector_simulator(max_qubits),
            jobs: JobTable::default(),
        }
    }

    #[instrument(skip(self, program), fields(program = program.name()))]
    fn run(&self, program: &StatePreparation, config: &RunConfig) -> ExecutionResult {
        let start = Instant::now();
        let num_qubits = program.num_measured_qubits();

        let result = ExecutionResult::new(Counts::new(), config.shots, num_qubits)
            .with_statevector(program.amplitudes().to_vec())
            .with_backend(self.name());

        let elapsed = start.elapsed();
        debug!("State-vector run completed in {:?}", elapsed);
        result.with_execution_time(elapsed.as_millis() as u64)
    }
}

impl Default for StatevectorBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for StatevectorBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    #[instrument(skip(self, program), fields(program = program.name()))]
    fn submit(&self, program: &StatePreparation, config: &RunConfig) -> HalResult<JobId> {
        let job_id = self.jobs.create(self.name(), config.shots, config.max_credits);
        debug!("Submitted job: {}", job_id);

        let result = self.run(program, config);
        self.jobs.finish(&job_id, Ok(result));
        Ok(job_id)
    }

    fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        self.jobs.status(job_id)
    }

    fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        self.jobs.result(job_id)
    }

    fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        self.jobs.cancel(job_id)
    }
}

impl BackendFactory for StatevectorBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let max_qubits = config
            .extra_u64("max_qubits")
            .map_or(DEFAULT_MAX_QUBITS, |v| v as u32);

        Ok(Self {
            capabilities: Capabilities::statevector_simulator(max_qubits),
            config,
            jobs: JobTable::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;
    use qharness_hal::{CircuitResources, HalError, Register};

    fn plus_state() -> StatePreparation {
        StatePreparation::new(
            "plus",
            vec![Register::new("q", 1)],
            vec![Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_statevector_capabilities() {
        let backend = StatevectorBackend::new();
        let caps = backend.capabilities();
        assert!(caps.statevector);
        assert_eq!(caps.num_qubits, DEFAULT_MAX_QUBITS);
    }

    #[test]
    fn test_returns_exact_state() {
        let backend = StatevectorBackend::new();
        let result = backend.execute(&plus_state(), &RunConfig::new(1000)).unwrap();

        let sv = result.statevector.as_ref().unwrap();
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert!((sv[0].re - h).abs() < 1e-12);
        assert!((sv[1].re - h).abs() < 1e-12);
        assert!(result.counts.is_empty());
        assert_eq!(result.backend.as_deref(), Some("statevector_simulator"));
    }

    #[test]
    fn test_job_completes_on_submit() {
        let backend = StatevectorBackend::new();
        let id = backend.submit(&plus_state(), &RunConfig::new(1)).unwrap();
        assert!(backend.status(&id).unwrap().is_success());
        assert!(backend.result(&id).is_ok());
    }

    #[test]
    fn test_too_many_qubits() {
        let backend = StatevectorBackend::with_max_qubits(3);
        let prep = plus_state().with_resources(CircuitResources::new(10, 9));
        let result = backend.execute(&prep, &RunConfig::new(1));
        assert!(matches!(result, Err(HalError::ProgramTooLarge(_))));
    }

    #[test]
    fn test_from_config() {
        let config =
            BackendConfig::new("statevector_simulator").with_extra("max_qubits", 5.into());
        let backend = StatevectorBackend::from_config(config).unwrap();
        assert_eq!(backend.capabilities().num_qubits, 5);
    }
}
