//! The acceptance runner.
//!
//! For every case the runner loads the problem and its ground truth, builds
//! the algorithm from the case's configuration, runs it on the selected
//! backend, and compares the result against the ground truth with a
//! tolerance that depends on whether the backend samples.

use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use qharness_adapter_sim::default_registry;
use qharness_algo::{Grover, Hhl, LogicExpressionOracle};
use qharness_hal::{Backend, BackendConfig, BackendRegistry};

use crate::config::{BackendSelection, HhlConfig, SearchConfig};
use crate::error::{ConfigError, HarnessResult};
use crate::fidelity::{Tolerance, fidelity};
use crate::problem::{LinearInstance, ProblemInstance, SatInstance};
use crate::report::{CaseReport, RunResult, SuiteReport, Verdict};
use crate::reproducibility::ReproducibilityInfo;
use crate::scenario::{AlgorithmConfig, Scenario};

/// A finished run and its verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// What the run produced.
    pub result: RunResult,
    /// How it compares to the ground truth.
    pub verdict: Verdict,
}

/// Runs cases against registered backends and judges the results.
pub struct AcceptanceRunner {
    registry: BackendRegistry,
    cli_args: Vec<String>,
}

impl Default for AcceptanceRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl AcceptanceRunner {
    /// Runner over the local simulators.
    pub fn new() -> Self {
        Self::with_registry(default_registry())
    }

    /// Runner over a custom registry.
    pub fn with_registry(registry: BackendRegistry) -> Self {
        Self {
            registry,
            cli_args: Vec::new(),
        }
    }

    /// Record the command line in suite reports.
    #[must_use]
    pub fn with_cli_args(mut self, args: Vec<String>) -> Self {
        self.cli_args = args;
        self
    }

    /// Names of the backends the runner can create.
    pub fn available_backends(&self) -> Vec<String> {
        self.registry.available_backends()
    }

    fn backend(&self, selection: &BackendSelection) -> HarnessResult<Box<dyn Backend>> {
        let backend = self
            .registry
            .create(&selection.name, BackendConfig::new(&selection.name))?;
        Ok(backend)
    }

    /// Run a search and check it against the instance's ground truth.
    ///
    /// A satisfying top measurement must be listed in the ground truth; a
    /// non-satisfying one is only accepted for unsatisfiable instances.
    /// The selection must carry the fixed search budget.
    #[instrument(skip_all, fields(instance = %instance.name(), backend = %selection.name))]
    pub fn run_sat(
        &self,
        instance: &SatInstance,
        config: SearchConfig,
        selection: &BackendSelection,
    ) -> HarnessResult<Evaluation> {
        selection.check_search_budget()?;
        let backend = self.backend(selection)?;
        let oracle = LogicExpressionOracle::from_dimacs(instance.dimacs(), config.optimization)?;
        let grover = Grover::new(oracle, config.iterations)
            .with_mct_mode(config.mct_mode)
            .with_seed(config.seed);
        let outcome = grover.run(backend.as_ref(), &selection.run)?;

        let truth = instance.ground_truth();
        let top = &outcome.top_measurement;
        let verdict = match (outcome.oracle_evaluation, truth.is_unsatisfiable()) {
            (true, _) if truth.contains(top) => Verdict::Pass,
            (true, _) => Verdict::Fail {
                reason: format!("'{top}' satisfies the oracle but ground truth is {truth}"),
            },
            (false, true) => Verdict::Pass,
            (false, false) => Verdict::Fail {
                reason: format!("no satisfying assignment found; ground truth is {truth}"),
            },
        };
        debug!(top = %top, oracle_evaluation = outcome.oracle_evaluation, rounds = ?outcome.rounds, "search finished");

        Ok(Evaluation {
            result: RunResult {
                top_measurement: Some(outcome.top_measurement),
                solution: None,
                oracle_evaluation: Some(outcome.oracle_evaluation),
                probability: outcome.top_probability,
                resources: outcome.resources,
                rounds: outcome.rounds,
                fidelity: None,
                tolerance: None,
            },
            verdict,
        })
    }

    /// Solve a linear system and compare with the classical solution.
    #[instrument(skip_all, fields(instance = %instance.name(), backend = %selection.name))]
    pub fn run_linear(
        &self,
        instance: &LinearInstance,
        config: HhlConfig,
        selection: &BackendSelection,
    ) -> HarnessResult<Evaluation> {
        let backend = self.backend(selection)?;
        let expected = instance.classical_solution()?;
        let hhl = Hhl::new(
            instance.matrix(),
            instance.vector(),
            config.eigs(),
            config.reciprocal(),
        )?;
        let outcome = hhl.run(backend.as_ref(), &selection.run)?;

        let relaxed = instance.is_generated() || instance.has_negative_eigenvalues()?;
        let tolerance = Tolerance::select(backend.capabilities().is_stochastic(), relaxed);
        let fid = fidelity(&expected.to_vec(), &outcome.solution);
        let verdict = if tolerance.accepts(fid) {
            Verdict::Pass
        } else {
            Verdict::Fail {
                reason: format!("fidelity {fid:.6} is not {tolerance}"),
            }
        };
        debug!(fidelity = fid, %tolerance, probability = outcome.probability_result, "solve finished");

        Ok(Evaluation {
            result: RunResult {
                top_measurement: None,
                solution: Some(outcome.solution),
                oracle_evaluation: None,
                probability: outcome.probability_result,
                resources: outcome.resources,
                rounds: Vec::new(),
                fidelity: Some(fid),
                tolerance: Some(tolerance),
            },
            verdict,
        })
    }

    /// Run one scenario. Errors become [`Verdict::Error`].
    pub fn run(&self, scenario: &Scenario) -> CaseReport {
        if let Some(reason) = &scenario.skip {
            info!(scenario = %scenario.name, %reason, "skipping");
            return CaseReport::skipped(&scenario.name, reason);
        }

        let start = Instant::now();
        let evaluation = self.evaluate(scenario);
        let duration_ms = start.elapsed().as_millis() as u64;

        let (verdict, result) = match evaluation {
            Ok(Evaluation { result, verdict }) => (verdict, Some(result)),
            Err(e) => (
                Verdict::Error {
                    message: e.to_string(),
                },
                None,
            ),
        };
        match &verdict {
            Verdict::Pass => info!(scenario = %scenario.name, duration_ms, "pass"),
            other => warn!(scenario = %scenario.name, duration_ms, "{other}"),
        }

        CaseReport {
            name: scenario.name.clone(),
            verdict,
            result,
            duration_ms,
        }
    }

    fn evaluate(&self, scenario: &Scenario) -> HarnessResult<Evaluation> {
        let instance = scenario.problem.load(&scenario.name)?;
        match (&instance, scenario.algorithm) {
            (ProblemInstance::Sat(sat), AlgorithmConfig::Search(config)) => {
                self.run_sat(sat, config, &scenario.backend)
            }
            (ProblemInstance::Linear(linear), AlgorithmConfig::Hhl(config)) => {
                self.run_linear(linear, config, &scenario.backend)
            }
            _ => Err(ConfigError::Invalid(format!(
                "scenario '{}' pairs a problem with the wrong algorithm family",
                scenario.name
            ))
            .into()),
        }
    }

    /// Run scenarios in order, calling `on_case` after each.
    pub fn run_suite<F>(&self, scenarios: &[Scenario], mut on_case: F) -> SuiteReport
    where
        F: FnMut(&CaseReport),
    {
        info!(cases = scenarios.len(), "starting suite");
        let cases = scenarios
            .iter()
            .map(|scenario| {
                let report = self.run(scenario);
                on_case(&report);
                report
            })
            .collect();
        let report = SuiteReport::new(
            cases,
            ReproducibilityInfo::capture(&self.cli_args, self.available_backends()),
        );
        info!(
            passed = report.summary.passed,
            failed = report.summary.failed,
            errors = report.summary.errors,
            skipped = report.summary.skipped,
            "suite finished"
        );
        report
    }
}
