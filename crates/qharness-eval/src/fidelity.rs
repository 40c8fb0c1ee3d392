//! State fidelity and acceptance thresholds.

use std::fmt;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Minimum fidelity on a deterministic backend.
pub const EXACT_FIDELITY: f64 = 1.0 - 1e-5;

/// Fidelity must exceed this on a sampling backend.
pub const STATISTICAL_FIDELITY: f64 = 0.8;

/// Minimum fidelity for random instances or negative spectra.
pub const RELAXED_FIDELITY: f64 = 1.0 - 1e-2;

/// Squared overlap `|⟨a, conj b⟩|²` of two vectors after normalizing both.
///
/// Returns 0 if either vector is zero or the lengths differ.
pub fn fidelity(a: &[Complex64], b: &[Complex64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    let na = a.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt();
    let nb = b.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    let overlap: Complex64 = a.iter().zip(b).map(|(x, y)| x * y.conj()).sum();
    (overlap.norm() / (na * nb)).powi(2)
}

/// Acceptance threshold for a linear-system run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tolerance {
    /// Deterministic backend, well-conditioned fixed instance.
    Exact,
    /// Deterministic backend, random instance or negative spectrum.
    Relaxed,
    /// Sampling backend.
    Statistical,
}

impl Tolerance {
    /// Pick the threshold from backend determinism and instance kind.
    pub fn select(stochastic: bool, relaxed: bool) -> Self {
        match (stochastic, relaxed) {
            (true, _) => Tolerance::Statistical,
            (false, true) => Tolerance::Relaxed,
            (false, false) => Tolerance::Exact,
        }
    }

    /// Threshold value.
    pub fn threshold(self) -> f64 {
        match self {
            Tolerance::Exact => EXACT_FIDELITY,
            Tolerance::Relaxed => RELAXED_FIDELITY,
            Tolerance::Statistical => STATISTICAL_FIDELITY,
        }
    }

    /// True if `fidelity` meets the threshold.
    ///
    /// The statistical bound is strict.
    pub fn accepts(self, fidelity: f64) -> bool {
        match self {
            Tolerance::Statistical => fidelity > self.threshold(),
            _ => fidelity >= self.threshold(),
        }
    }
}

impl fmt::Display for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tolerance::Statistical => write!(f, "> {}", self.threshold()),
            _ => write!(f, ">= {}", self.threshold()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_fidelity_ignores_scale_and_phase() {
        let a = [c(1.0, 0.0), c(1.0, 0.0)];
        let b = [c(0.0, 3.0), c(0.0, 3.0)];
        assert!((fidelity(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fidelity_orthogonal() {
        assert_eq!(fidelity(&[c(1.0, 0.0), c(0.0, 0.0)], &[c(0.0, 0.0), c(1.0, 0.0)]), 0.0);
    }

    #[test]
    fn test_fidelity_degenerate_inputs() {
        assert_eq!(fidelity(&[c(0.0, 0.0)], &[c(1.0, 0.0)]), 0.0);
        assert_eq!(fidelity(&[c(1.0, 0.0)], &[c(1.0, 0.0), c(0.0, 0.0)]), 0.0);
    }

    #[test]
    fn test_fidelity_partial_overlap() {
        let a = [c(1.0, 0.0), c(0.0, 0.0)];
        let b = [c(1.0, 0.0), c(1.0, 0.0)];
        assert!((fidelity(&a, &b) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_tolerance_selection() {
        assert_eq!(Tolerance::select(true, true), Tolerance::Statistical);
        assert_eq!(Tolerance::select(false, true), Tolerance::Relaxed);
        assert_eq!(Tolerance::select(false, false), Tolerance::Exact);
    }

    #[test]
    fn test_statistical_bound_is_strict() {
        assert!(!Tolerance::Statistical.accepts(0.8));
        assert!(Tolerance::Statistical.accepts(0.81));
        assert!(Tolerance::Exact.accepts(EXACT_FIDELITY));
        assert!(!Tolerance::Exact.accepts(0.999));
        assert!(Tolerance::Relaxed.accepts(0.995));
    }
}
