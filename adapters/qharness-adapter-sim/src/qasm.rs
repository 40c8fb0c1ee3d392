//! Shot-sampling backend.

use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, instrument};

use qharness_hal::{
    Backend, BackendConfig, BackendFactory, Capabilities, Counts, ExecutionResult, HalResult,
    JobId, JobStatus, RunConfig, StatePreparation,
};

use crate::jobs::JobTable;
use crate::sampler::Sampler;
use crate::{DEFAULT_MAX_QUBITS, DEFAULT_SEED};

/// Backend that samples measurement outcomes from the prepared state.
///
/// Sampling uses a `StdRng` seeded from [`RunConfig::seed`] when set, else
/// from the backend's own seed, so runs are reproducible.
pub struct QasmBackend {
    config: BackendConfig,
    capabilities: Capabilities,
    seed: u64,
    jobs: JobTable,
}

impl QasmBackend {
    /// Create a sampling backend with default settings.
    pub fn new() -> Self {
        Self::with_max_qubits(DEFAULT_MAX_QUBITS)
    }

    /// Create a sampling backend accepting programs up to `max_qubits`.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self {
            config: BackendConfig::new("qasm_simulator"),
            capabilities: Capabilities::qasm_simulator(max_qubits),
            seed: DEFAULT_SEED,
            jobs: JobTable::default(),
        }
    }

    /// Set the fallback sampling seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[instrument(skip(self, program), fields(program = program.name()))]
    fn run(&self, program: &StatePreparation, config: &RunConfig) -> ExecutionResult {
        let start = Instant::now();
        let shots = config.shots;
        let seed = config.seed.unwrap_or(self.seed);
        debug!(
            "Sampling {} shots over {} qubits (seed {})",
            shots,
            program.num_measured_qubits(),
            seed
        );

        let sampler = Sampler::new(&program.probabilities());
        let mut rng = StdRng::seed_from_u64(seed);

        let mut counts = Counts::new();
        let mut memory = config.memory.then(|| Vec::with_capacity(shots as usize));
        for _ in 0..shots {
            let bitstring = program.bitstring(sampler.sample(&mut rng));
            if let Some(memory) = memory.as_mut() {
                memory.push(bitstring.clone());
            }
            counts.insert(bitstring, 1);
        }

        let mut result = ExecutionResult::new(counts, shots, program.num_measured_qubits())
            .with_backend(self.name());
        if let Some(memory) = memory {
            result = result.with_memory(memory);
        }

        let elapsed = start.elapsed();
        debug!("Sampling completed in {:?}", elapsed);
        result.with_execution_time(elapsed.as_millis() as u64)
    }
}

impl Default for QasmBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for QasmBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    #[instrument(skip(self, program), fields(program = program.name()))]
    fn submit(&self, program: &StatePreparation, config: &RunConfig) -> HalResult<JobId> {
        config.check(&self.capabilities)?;

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

impl BackendFactory for QasmBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let max_qubits = config
            .extra_u64("max_qubits")
            .map_or(DEFAULT_MAX_QUBITS, |v| v as u32);
        let seed = config.extra_u64("seed").unwrap_or(DEFAULT_SEED);

        Ok(Self {
            capabilities: Capabilities::qasm_simulator(max_qubits),
            config,
            seed,
            jobs: JobTable::default(),
        })
    }
}
