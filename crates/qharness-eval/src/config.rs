//! Immutable per-family algorithm configuration.
//!
//! Each configuration is assembled once through builder methods and then
//! passed by value. [`HhlConfig`] checks the consistency of its two stages
//! when it is built, including when it is deserialized.

use serde::{Deserialize, Serialize};

use qharness_algo::grover::DEFAULT_SEED;
use qharness_algo::{EigsOptions, Iterations, MctMode, OracleOptimization, ReciprocalOptions};
use qharness_hal::RunConfig;

use crate::error::ConfigError;

/// Shots used for every SAT run.
pub const SAT_SHOTS: u32 = 1000;

/// Credit budget used for every run.
pub const MAX_CREDITS: u32 = 10;

/// Shots used for HHL runs on the sampling backend.
pub const HHL_SAMPLING_SHOTS: u32 = 600;

/// Grover search configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Fixed round count or incremental schedule.
    pub iterations: Iterations,
    /// MCT decomposition mode.
    #[serde(default)]
    pub mct_mode: MctMode,
    /// Logic optimization of the oracle expression.
    #[serde(default)]
    pub optimization: OracleOptimization,
    /// Seed of the incremental schedule.
    #[serde(default = "default_search_seed")]
    pub seed: u64,
}

fn default_search_seed() -> u64 {
    DEFAULT_SEED
}

impl SearchConfig {
    /// Configuration with the given schedule and default knobs.
    pub fn new(iterations: Iterations) -> Self {
        Self {
            iterations,
            mct_mode: MctMode::default(),
            optimization: OracleOptimization::default(),
            seed: DEFAULT_SEED,
        }
    }

    /// Set the MCT mode.
    #[must_use]
    pub fn with_mct_mode(mut self, mode: MctMode) -> Self {
        self.mct_mode = mode;
        self
    }

    /// Set the oracle optimization.
    #[must_use]
    pub fn with_optimization(mut self, optimization: OracleOptimization) -> Self {
        self.optimization = optimization;
        self
    }

    /// Set the incremental-schedule seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// HHL configuration: eigenvalue estimation plus reciprocal.
///
/// Both stages must agree on negative-eigenvalue mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HhlConfigBuilder", into = "HhlConfigBuilder")]
pub struct HhlConfig {
    eigs: EigsOptions,
    reciprocal: ReciprocalOptions,
}

impl HhlConfig {
    /// Start a builder from the defaults.
    pub fn builder() -> HhlConfigBuilder {
        HhlConfigBuilder::default()
    }

    /// Eigenvalue-estimation options.
    pub fn eigs(&self) -> EigsOptions {
        self.eigs
    }

    /// Reciprocal options.
    pub fn reciprocal(&self) -> ReciprocalOptions {
        self.reciprocal
    }

    /// True if negative eigenvalues are handled.
    pub fn negative_evals(&self) -> bool {
        self.eigs.negative_evals
    }
}

/// Builder for [`HhlConfig`]; also its serialized form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HhlConfigBuilder {
    /// Eigenvalue-estimation options.
    #[serde(default)]
    pub eigs: EigsOptions,
    /// Reciprocal options.
    #[serde(default)]
    pub reciprocal: ReciprocalOptions,
}

impl HhlConfigBuilder {
    /// Replace the eigenvalue-estimation options.
    #[must_use]
    pub fn eigs(mut self, eigs: EigsOptions) -> Self {
        self.eigs = eigs;
        self
    }

    /// Replace the reciprocal options.
    #[must_use]
    pub fn reciprocal(mut self, reciprocal: ReciprocalOptions) -> Self {
        self.reciprocal = reciprocal;
        self
    }

    /// Set negative-eigenvalue mode on both stages.
    #[must_use]
    pub fn negative_evals(mut self, negative: bool) -> Self {
        self.eigs.negative_evals = negative;
        self.reciprocal.negative_evals = negative;
        self
    }

    /// Validate and freeze.
    pub fn build(self) -> Result<HhlConfig, ConfigError> {
        if self.eigs.negative_evals != self.reciprocal.negative_evals {
            return Err(ConfigError::InconsistentNegativeEigenvalues {
                eigs: self.eigs.negative_evals,
                reciprocal: self.reciprocal.negative_evals,
            });
        }
        self.eigs
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.reciprocal
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(HhlConfig {
            eigs: self.eigs,
            reciprocal: self.reciprocal,
        })
    }
}

impl TryFrom<HhlConfigBuilder> for HhlConfig {
    type Error = ConfigError;

    fn try_from(builder: HhlConfigBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl From<HhlConfig> for HhlConfigBuilder {
    fn from(config: HhlConfig) -> Self {
        Self {
            eigs: config.eigs,
            reciprocal: config.reciprocal,
        }
    }
}

/// Which registered backend to run on, and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendSelection {
    /// Registered backend name.
    pub name: String,
    /// Run parameters.
    #[serde(default = "default_run_config")]
    pub run: RunConfig,
}

fn default_run_config() -> RunConfig {
    RunConfig::new(SAT_SHOTS)
        .with_max_credits(MAX_CREDITS)
        .with_memory(false)
}

impl BackendSelection {
    /// Select a backend with the default run parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            run: default_run_config(),
        }
    }

    /// The deterministic statevector backend.
    pub fn statevector() -> Self {
        Self::new("statevector_simulator")
    }

    /// The sampling backend.
    pub fn qasm() -> Self {
        Self::new("qasm_simulator")
    }

    /// Set the shot count.
    #[must_use]
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.run.shots = shots;
        self
    }

    /// Set the sampling seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.run = self.run.with_seed(seed);
        self
    }

    /// Search runs use exactly [`SAT_SHOTS`] shots, [`MAX_CREDITS`] credits
    /// and no per-shot memory; only the seed may vary.
    pub fn check_search_budget(&self) -> Result<(), ConfigError> {
        let run = &self.run;
        if run.shots != SAT_SHOTS || run.max_credits != MAX_CREDITS || run.memory {
            return Err(ConfigError::Invalid(format!(
                "search runs use {SAT_SHOTS} shots, {MAX_CREDITS} credits and no memory; \
                 got {} shots, {} credits, memory {}",
                run.shots, run.max_credits, run.memory
            )));
        }
        Ok(())
    }
}

impl Default for BackendSelection {
    fn default() -> Self {
        Self::statevector()
    }
}
