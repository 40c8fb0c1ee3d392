//! The scenario matrix.
//!
//! A scenario is one named, skippable case: a problem, an algorithm
//! configuration and a backend. Scenario files are YAML lists of records
//! with the sections `problem`, `algorithm`, `eigs`, `reciprocal` and
//! `backend`:
//!
//! ```yaml
//! - name: sat/tiny
//!   problem:
//!     sat:
//!       builtin: test_grover_tiny
//!   algorithm:
//!     iterations:
//!       fixed: 1
//!     mct_mode: advanced
//!   backend:
//!     name: qasm_simulator
//! - name: hhl/identity
//!   problem:
//!     linear:
//!       matrix: [[1.0, 0.0], [0.0, 1.0]]
//!       vector: [1.0, 10.0]
//!   reciprocal:
//!     mode: long_division
//!     scale: 1.0
//! ```
//!
//! A search problem takes the `algorithm` section; a linear problem takes
//! `eigs` and `reciprocal`. Mixing them is a configuration error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use qharness_algo::{
    EigsOptions, Iterations, MctMode, OracleOptimization, ReciprocalMode, ReciprocalOptions,
    SpectrumSpec,
};

use crate::config::{BackendSelection, HHL_SAMPLING_SHOTS, HhlConfig, SearchConfig};
use crate::error::{ConfigError, HarnessError, HarnessResult};
use crate::problem::{LinearInstance, ProblemInstance, RandomMatrixKind, SatInstance};

/// Sampling seed of the default linear cases on the sampling backend.
pub const HHL_SAMPLING_SEED: u64 = 1234;

/// Where a SAT instance comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimacsSource {
    /// A shipped instance by name.
    Builtin(String),
    /// A file on disk.
    File(PathBuf),
    /// Inline instance text.
    Text(String),
}

/// The problem section of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemSpec {
    /// Boolean satisfiability.
    Sat(DimacsSource),
    /// Explicit real linear system.
    Linear {
        /// Matrix rows.
        matrix: Vec<Vec<f64>>,
        /// Right-hand side.
        vector: Vec<f64>,
    },
    /// Seeded random linear system.
    RandomLinear {
        /// Spectrum family.
        kind: RandomMatrixKind,
        /// Matrix dimension.
        size: usize,
        /// Eigenvalue range and condition bound.
        spectrum: SpectrumSpec,
        /// Generator seed.
        seed: u64,
        /// Right-hand side; drawn from the seed when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        vector: Option<Vec<f64>>,
    },
}

impl ProblemSpec {
    /// Materialize the problem instance.
    pub fn load(&self, name: &str) -> HarnessResult<ProblemInstance> {
        let instance = match self {
            ProblemSpec::Sat(DimacsSource::Builtin(id)) => {
                ProblemInstance::Sat(SatInstance::builtin(id)?)
            }
            ProblemSpec::Sat(DimacsSource::File(path)) => {
                ProblemInstance::Sat(SatInstance::from_file(path)?)
            }
            ProblemSpec::Sat(DimacsSource::Text(text)) => {
                ProblemInstance::Sat(SatInstance::from_dimacs(name, text.clone())?)
            }
            ProblemSpec::Linear { matrix, vector } => {
                ProblemInstance::Linear(LinearInstance::from_real(name, matrix, vector)?)
            }
            ProblemSpec::RandomLinear {
                kind,
                size,
                spectrum,
                seed,
                vector,
            } => ProblemInstance::Linear(LinearInstance::random(
                name,
                *kind,
                *size,
                *spectrum,
                *seed,
                vector.as_deref(),
            )?),
        };
        Ok(instance)
    }

    /// True for SAT problems.
    pub fn is_sat(&self) -> bool {
        matches!(self, ProblemSpec::Sat(_))
    }

    fn resolve_paths(&mut self, base: &Path) {
        if let ProblemSpec::Sat(DimacsSource::File(path)) = self {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// Algorithm configuration of a scenario.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlgorithmConfig {
    /// Grover search.
    Search(SearchConfig),
    /// HHL solve.
    Hhl(HhlConfig),
}

/// One named case of the matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScenarioRecord", into = "ScenarioRecord")]
pub struct Scenario {
    /// Unique name.
    pub name: String,
    /// The problem.
    pub problem: ProblemSpec,
    /// The algorithm configuration.
    pub algorithm: AlgorithmConfig,
    /// The backend.
    pub backend: BackendSelection,
    /// Reason to skip the case, if any.
    pub skip: Option<String>,
}

impl Scenario {
    /// A search case.
    pub fn sat(
        name: impl Into<String>,
        source: DimacsSource,
        config: SearchConfig,
        backend: BackendSelection,
    ) -> Self {
        Self {
            name: name.into(),
            problem: ProblemSpec::Sat(source),
            algorithm: AlgorithmConfig::Search(config),
            backend,
            skip: None,
        }
    }

    /// A linear-system case.
    pub fn linear(
        name: impl Into<String>,
        problem: ProblemSpec,
        config: HhlConfig,
        backend: BackendSelection,
    ) -> Self {
        Self {
            name: name.into(),
            problem,
            algorithm: AlgorithmConfig::Hhl(config),
            backend,
            skip: None,
        }
    }

    /// Mark the case as skipped.
    #[must_use]
    pub fn with_skip(mut self, reason: impl Into<String>) -> Self {
        self.skip = Some(reason.into());
        self
    }
}

/// Serialized form of a [`Scenario`].
///
/// Enum-valued sections are written as single-key maps (`sat: {builtin: x}`,
/// `iterations: {fixed: 3}`) rather than YAML tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioRecord {
    name: String,
    #[serde(with = "serde_yaml_ng::with::singleton_map_recursive")]
    problem: ProblemSpec,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_yaml_ng::with::singleton_map_recursive"
    )]
    algorithm: Option<SearchConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eigs: Option<EigsOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reciprocal: Option<ReciprocalOptions>,
    #[serde(default)]
    backend: BackendSelection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    skip: Option<String>,
}

impl TryFrom<ScenarioRecord> for Scenario {
    type Error = ConfigError;

    fn try_from(record: ScenarioRecord) -> Result<Self, Self::Error> {
        let algorithm = if record.problem.is_sat() {
            if record.eigs.is_some() || record.reciprocal.is_some() {
                return Err(ConfigError::Invalid(format!(
                    "scenario '{}': SAT problems take no eigs or reciprocal section",
                    record.name
                )));
            }
            let search = record.algorithm.ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "scenario '{}': SAT problems need an algorithm section",
                    record.name
                ))
            })?;
            record.backend.check_search_budget().map_err(|e| {
                ConfigError::Invalid(format!("scenario '{}': {e}", record.name))
            })?;
            AlgorithmConfig::Search(search)
        } else {
            if record.algorithm.is_some() {
                return Err(ConfigError::Invalid(format!(
                    "scenario '{}': linear problems take eigs and reciprocal sections, not algorithm",
                    record.name
                )));
            }
            let config = HhlConfig::builder()
                .eigs(record.eigs.unwrap_or_default())
                .reciprocal(record.reciprocal.unwrap_or_default())
                .build()?;
            AlgorithmConfig::Hhl(config)
        };
        Ok(Scenario {
            name: record.name,
            problem: record.problem,
            algorithm,
            backend: record.backend,
            skip: record.skip,
        })
    }
}

impl From<Scenario> for ScenarioRecord {
    fn from(scenario: Scenario) -> Self {
        let (algorithm, eigs, reciprocal) = match scenario.algorithm {
            AlgorithmConfig::Search(search) => (Some(search), None, None),
            AlgorithmConfig::Hhl(hhl) => (None, Some(hhl.eigs()), Some(hhl.reciprocal())),
        };
        Self {
            name: scenario.name,
            problem: scenario.problem,
            algorithm,
            eigs,
            reciprocal,
            backend: scenario.backend,
            skip: scenario.skip,
        }
    }
}

/// Parse a YAML scenario list.
pub fn load_scenarios(yaml: &str) -> HarnessResult<Vec<Scenario>> {
    let scenarios: Vec<Scenario> =
        serde_yaml_ng::from_str(yaml).map_err(|e| HarnessError::Config(ConfigError::Yaml(e)))?;
    check_unique_names(&scenarios)?;
    debug!(count = scenarios.len(), "loaded scenarios");
    Ok(scenarios)
}

/// Load a YAML scenario file. Relative instance paths resolve against the
/// file's directory.
pub fn load_scenarios_file(path: &Path) -> HarnessResult<Vec<Scenario>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| HarnessError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    let mut scenarios = load_scenarios(&text)?;
    if let Some(base) = path.parent() {
        for scenario in &mut scenarios {
            scenario.problem.resolve_paths(base);
        }
    }
    Ok(scenarios)
}

fn check_unique_names(scenarios: &[Scenario]) -> Result<(), ConfigError> {
    let mut seen = std::collections::HashSet::new();
    for s in scenarios {
        if !seen.insert(s.name.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "duplicate scenario name '{}'",
                s.name
            )));
        }
    }
    Ok(())
}

/// SAT instances of the default matrix and their schedules.
const SAT_CASES: [(&str, Iterations); 3] = [
    ("test_grover", Iterations::Fixed(3)),
    ("test_grover_tiny", Iterations::Fixed(1)),
    ("test_grover_no_solution", Iterations::Incremental),
];

/// Right-hand sides of the identity cases.
const IDENTITY_VECTORS: [[f64; 2]; 4] = [[0.0, 1.0], [1.0, 0.0], [1.0, 1.0], [1.0, 10.0]];

/// Right-hand sides of the negative-mode identity cases.
const NEGATIVE_VECTORS: [[f64; 2]; 3] = [[-1.0, 0.0], [0.0, -1.0], [-1.0, -1.0]];

fn identity_problem(b: [f64; 2]) -> ProblemSpec {
    ProblemSpec::Linear {
        matrix: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        vector: b.to_vec(),
    }
}

fn vector_label(b: [f64; 2]) -> String {
    format!("[{},{}]", b[0], b[1])
}

/// The built-in scenario matrix.
pub fn default_scenarios() -> HarnessResult<Vec<Scenario>> {
    let mut scenarios = Vec::new();

    for (instance, iterations) in SAT_CASES {
        for mode in MctMode::ALL {
            for optimization in OracleOptimization::ALL {
                for backend in [BackendSelection::statevector(), BackendSelection::qasm()] {
                    let config = SearchConfig::new(iterations)
                        .with_mct_mode(mode)
                        .with_optimization(optimization);
                    scenarios.push(Scenario::sat(
                        format!("sat/{instance}/{mode}/{optimization}/{}", backend.name),
                        DimacsSource::Builtin(instance.into()),
                        config,
                        backend,
                    ));
                }
            }
        }
    }

    let lookup = HhlConfig::default();
    let long_division = HhlConfig::builder()
        .reciprocal(
            ReciprocalOptions::default()
                .with_mode(ReciprocalMode::LongDivision)
                .with_scale(1.0),
        )
        .build()?;
    let negative = HhlConfig::builder()
        .eigs(EigsOptions::default().with_num_ancillae(4))
        .negative_evals(true)
        .build()?;
    let sampling = BackendSelection::qasm()
        .with_shots(HHL_SAMPLING_SHOTS)
        .with_seed(HHL_SAMPLING_SEED);

    for b in IDENTITY_VECTORS {
        let label = vector_label(b);
        scenarios.push(Scenario::linear(
            format!("hhl/identity/lookup/{label}"),
            identity_problem(b),
            lookup,
            BackendSelection::statevector(),
        ));
        scenarios.push(Scenario::linear(
            format!("hhl/identity/long_division/{label}"),
            identity_problem(b),
            long_division,
            BackendSelection::statevector(),
        ));
        scenarios.push(Scenario::linear(
            format!("hhl/identity/sampling/{label}"),
            identity_problem(b),
            lookup,
            sampling.clone(),
        ));
    }
    for b in NEGATIVE_VECTORS {
        scenarios.push(Scenario::linear(
            format!("hhl/identity/negative/{}", vector_label(b)),
            identity_problem(b),
            negative,
            BackendSelection::statevector(),
        ));
    }

    let six_clock = HhlConfig::builder()
        .eigs(EigsOptions::default().with_num_ancillae(6))
        .build()?;
    let six_clock_negative = HhlConfig::builder()
        .eigs(EigsOptions::default().with_num_ancillae(6))
        .negative_evals(true)
        .build()?;
    scenarios.push(Scenario::linear(
        "hhl/random_hermitian",
        ProblemSpec::RandomLinear {
            kind: RandomMatrixKind::Hermitian,
            size: 2,
            spectrum: SpectrumSpec::new(0.0, 1.0).with_max_condition(10.0),
            seed: 7,
            vector: None,
        },
        six_clock,
        BackendSelection::statevector(),
    ));
    scenarios.push(Scenario::linear(
        "hhl/random_diagonal_negative",
        ProblemSpec::RandomLinear {
            kind: RandomMatrixKind::Diagonal,
            size: 2,
            spectrum: SpectrumSpec::new(-1.0, 1.0).with_max_condition(10.0),
            seed: 11,
            vector: None,
        },
        six_clock_negative,
        BackendSelection::statevector(),
    ));
    scenarios.push(Scenario::linear(
        "hhl/non_hermitian",
        ProblemSpec::Linear {
            matrix: vec![vec![0.0, 1.0], vec![-1.0, 0.0]],
            vector: vec![1.0, 2.0],
        },
        negative,
        BackendSelection::statevector(),
    ));

    Ok(scenarios)
}
