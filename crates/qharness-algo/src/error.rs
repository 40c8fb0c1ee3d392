//! Error types for the algo crate.

use qharness_hal::HalError;
use thiserror::Error;

/// Errors produced by the reference engines.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AlgoError {
    /// Malformed DIMACS input.
    #[error("DIMACS error on line {line}: {message}")]
    Dimacs {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// Matrix or vector shapes do not line up.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Matrix is singular to working precision.
    #[error("Matrix is singular")]
    Singular,

    /// Operation needs a Hermitian matrix.
    #[error("Matrix is not Hermitian")]
    NotHermitian,

    /// Non-Hermitian input needs negative-eigenvalue mode for the embedding.
    #[error("Non-Hermitian matrix requires negative-eigenvalue mode")]
    NegativeModeRequired,

    /// Eigenvalue estimation and reciprocal disagree on negative eigenvalues.
    #[error(
        "negative_evals mismatch: eigenvalue estimation has {eigs}, reciprocal has {reciprocal}"
    )]
    InconsistentNegativeEigenvalues {
        /// Flag on the eigenvalue estimation stage.
        eigs: bool,
        /// Flag on the reciprocal stage.
        reciprocal: bool,
    },

    /// A numeric parameter is out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The instance is too large for dense simulation.
    #[error("Problem too large: {0}")]
    TooLarge(String),

    /// No sample landed in the post-selected subspace.
    #[error("Post-selection failed: {0}")]
    PostSelection(String),

    /// Random generator could not meet its constraints.
    #[error("Random generation failed after {attempts} attempts: {reason}")]
    GenerationFailed {
        /// Attempts made.
        attempts: usize,
        /// Constraint that was not met.
        reason: String,
    },

    /// Backend error.
    #[error("Backend error: {0}")]
    Hal(#[from] HalError),
}

/// Result type for engine operations.
pub type AlgoResult<T> = Result<T, AlgoError>;
