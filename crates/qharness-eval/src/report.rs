//! Run results, verdicts and the suite report.

use std::fmt;

use chrono::{DateTime, Utc};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use qharness_hal::CircuitResources;

use crate::fidelity::Tolerance;
use crate::reproducibility::{ReproducibilityInfo, SCHEMA_VERSION};

/// What one algorithm run produced. Created per run, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Most likely bitstring (search runs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_measurement: Option<String>,
    /// Solution vector (linear-system runs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<Vec<Complex64>>,
    /// Whether the top measurement satisfies the oracle (search runs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oracle_evaluation: Option<bool>,
    /// Probability of the returned answer: top-outcome probability for a
    /// search, post-selection probability for a linear solve.
    pub probability: f64,
    /// Qubit account of the circuit.
    pub resources: CircuitResources,
    /// Round counts tried by the search.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rounds: Vec<u32>,
    /// Fidelity against the classical solution (linear-system runs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fidelity: Option<f64>,
    /// Threshold the fidelity was held to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<Tolerance>,
}

/// Outcome of one case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    /// The result agrees with the ground truth.
    Pass,
    /// The result contradicts the ground truth.
    Fail {
        /// Why the result was rejected.
        reason: String,
    },
    /// The case could not be run to completion.
    Error {
        /// Error message.
        message: String,
    },
    /// The case was not run.
    Skip {
        /// Why the case was skipped.
        reason: String,
    },
}

impl Verdict {
    /// True for [`Verdict::Pass`].
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    /// Short label.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Fail { .. } => "FAIL",
            Verdict::Error { .. } => "ERROR",
            Verdict::Skip { .. } => "SKIP",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("PASS"),
            Verdict::Fail { reason } => write!(f, "FAIL: {reason}"),
            Verdict::Error { message } => write!(f, "ERROR: {message}"),
            Verdict::Skip { reason } => write!(f, "SKIP: {reason}"),
        }
    }
}

/// Report of one case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseReport {
    /// Scenario name.
    pub name: String,
    /// Outcome.
    pub verdict: Verdict,
    /// Run result, when the run completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<RunResult>,
    /// Wall-clock time of the case.
    pub duration_ms: u64,
}

impl CaseReport {
    /// Report of a case that was not run.
    pub fn skipped(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            verdict: Verdict::Skip {
                reason: reason.into(),
            },
            result: None,
            duration_ms: 0,
        }
    }
}

/// Verdict counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteSummary {
    /// Number of cases.
    pub total: usize,
    /// Passed cases.
    pub passed: usize,
    /// Failed cases.
    pub failed: usize,
    /// Cases that errored.
    pub errors: usize,
    /// Skipped cases.
    pub skipped: usize,
}

impl SuiteSummary {
    /// Count verdicts.
    pub fn from_cases(cases: &[CaseReport]) -> Self {
        let mut summary = Self {
            total: cases.len(),
            ..Self::default()
        };
        for case in cases {
            match case.verdict {
                Verdict::Pass => summary.passed += 1,
                Verdict::Fail { .. } => summary.failed += 1,
                Verdict::Error { .. } => summary.errors += 1,
                Verdict::Skip { .. } => summary.skipped += 1,
            }
        }
        summary
    }
}

/// Complete suite report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Schema version for forward compatibility.
    pub schema_version: String,
    /// Timestamp of the run.
    pub timestamp: DateTime<Utc>,
    /// Per-case reports, in run order.
    pub cases: Vec<CaseReport>,
    /// Verdict counts.
    pub summary: SuiteSummary,
    /// Reproducibility information.
    pub reproducibility: ReproducibilityInfo,
}

impl SuiteReport {
    /// Assemble a report from finished cases.
    pub fn new(cases: Vec<CaseReport>, reproducibility: ReproducibilityInfo) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.into(),
            timestamp: Utc::now(),
            summary: SuiteSummary::from_cases(&cases),
            cases,
            reproducibility,
        }
    }

    /// True if no case failed or errored.
    pub fn is_success(&self) -> bool {
        self.summary.failed == 0 && self.summary.errors == 0
    }

    /// Cases that failed or errored.
    pub fn problems(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases
            .iter()
            .filter(|c| matches!(c.verdict, Verdict::Fail { .. } | Verdict::Error { .. }))
    }
}
