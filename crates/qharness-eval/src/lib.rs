//! qharness acceptance harness
//!
//! This crate checks quantum algorithms against ground truth. A case pairs
//! a problem instance with an algorithm configuration and a backend; the
//! runner executes it and judges the result.
//!
//! # Overview
//!
//! - **Ground truth**: satisfying assignments read from a SAT instance
//!   header, or the classical solution of a linear system
//! - **Configuration**: immutable per-family configs built once and passed
//!   by value
//! - **Scenarios**: the default matrix of cases, or YAML scenario files
//! - **Verdicts**: exact tolerance on deterministic backends, statistical
//!   tolerance on sampling ones
//! - **Reports**: per-case verdicts and a JSON suite report
//!
//! # Architecture
//!
//! ```text
//! [Scenario] -> ProblemSpec::load -> ProblemInstance + GroundTruth
//!                                          |
//!                                          v
//!                     AcceptanceRunner (Grover / HHL on a Backend)
//!                                          |
//!                                          v
//!                                  Verdict + RunResult
//!                                          |
//!                                          v
//!                              SuiteReport -> JSON Output
//! ```
//!
//! # Example
//!
//! ```ignore
//! use qharness_eval::{AcceptanceRunner, default_scenarios};
//!
//! let runner = AcceptanceRunner::new();
//! let report = runner.run_suite(&default_scenarios()?, |_| {});
//! assert!(report.is_success());
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod fidelity;
pub mod groundtruth;
pub mod problem;
pub mod report;
pub mod reproducibility;
pub mod runner;
pub mod scenario;

pub use config::{BackendSelection, HhlConfig, HhlConfigBuilder, SearchConfig};
pub use error::{ConfigError, GroundTruthError, HarnessError, HarnessResult};
pub use fidelity::{Tolerance, fidelity};
pub use groundtruth::{GroundTruth, parse_ground_truth};
pub use problem::{LinearInstance, ProblemInstance, RandomMatrixKind, SatInstance};
pub use report::{CaseReport, RunResult, SuiteReport, SuiteSummary, Verdict};
pub use runner::{AcceptanceRunner, Evaluation};
pub use scenario::{
    AlgorithmConfig, DimacsSource, ProblemSpec, Scenario, default_scenarios, load_scenarios,
    load_scenarios_file,
};
