//! Harness error types.

use qharness_algo::AlgoError;
use qharness_hal::HalError;
use thiserror::Error;

/// Result type for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Malformed ground-truth header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GroundTruthError {
    /// The header names no solutions.
    #[error("header has no 'solution:' or 'solutions:' marker")]
    MissingGroundTruth,

    /// A token is not an integer.
    #[error("invalid literal '{token}'")]
    InvalidLiteral {
        /// Offending token.
        token: String,
    },

    /// Literals do not cover variables `1..=k` exactly once.
    #[error("assignment '{assignment}' does not cover variables 1..=k exactly once")]
    NonContiguousAssignment {
        /// The assignment as written.
        assignment: String,
    },

    /// An empty entry appears next to non-empty ones.
    #[error("empty assignment mixed with non-empty assignments")]
    EmptyAssignment,
}

/// Invalid harness configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Eigenvalue estimation and reciprocal disagree on negative eigenvalues.
    #[error(
        "negative_evals must match: eigs has {eigs}, reciprocal has {reciprocal}"
    )]
    InconsistentNegativeEigenvalues {
        /// Flag on the eigenvalue-estimation options.
        eigs: bool,
        /// Flag on the reciprocal options.
        reciprocal: bool,
    },

    /// A field is missing or out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Scenario file could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Errors that can occur while running the harness.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HarnessError {
    /// Ground truth could not be extracted.
    #[error("Ground truth error: {0}")]
    GroundTruth(#[from] GroundTruthError),

    /// Configuration rejected.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reference engine failed.
    #[error("Algorithm error: {0}")]
    Algo(#[from] AlgoError),

    /// Backend failed.
    #[error("Backend error: {0}")]
    Hal(#[from] HalError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// Export failed.
    #[error("Export error: {0}")]
    Export(#[from] serde_json::Error),
}
