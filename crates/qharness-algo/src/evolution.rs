//! Product-formula time evolution.
//!
//! Approximates `exp(i H t)` by splitting the evolution into
//! `num_time_slices` slices, each evolved exactly under each term in
//! sequence. A single term evolves as
//!
//!   exp(i θ P) = cos θ · I + i sin θ · P
//!
//! # Trotter (first order)
//!
//!   exp(i H t) ≈ [∏_k exp(i c_k P_k t/n)]^n
//!
//! # Suzuki (order k)
//!
//! Order 1 is the symmetric second-order formula: a forward half-step over
//! the terms followed by a reversed half-step. Higher orders recurse with
//! `p_k = 1 / (4 - 4^{1/(2k-1)})`:
//!
//!   S_k(τ) = S_{k-1}(p_k τ)² · S_{k-1}((1 - 4 p_k) τ) · S_{k-1}(p_k τ)²

use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AlgoError, AlgoResult};
use crate::hamiltonian::Hamiltonian;
use crate::linalg::{Matrix, Vector, identity};

/// Highest Suzuki order accepted.
pub const MAX_SUZUKI_ORDER: u32 = 4;

/// Product-formula family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpansionMode {
    /// First-order Lie-Trotter; the order setting is ignored.
    Trotter,
    /// Recursive Suzuki formula of the configured order.
    #[default]
    Suzuki,
}

impl fmt::Display for ExpansionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpansionMode::Trotter => f.write_str("trotter"),
            ExpansionMode::Suzuki => f.write_str("suzuki"),
        }
    }
}

impl FromStr for ExpansionMode {
    type Err = AlgoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trotter" => Ok(ExpansionMode::Trotter),
            "suzuki" => Ok(ExpansionMode::Suzuki),
            other => Err(AlgoError::InvalidParameter(format!(
                "unknown expansion mode '{other}'"
            ))),
        }
    }
}

/// Dense product-formula evolution of a Hamiltonian.
pub struct ProductFormula<'a> {
    hamiltonian: &'a Hamiltonian,
    /// Total evolution time t.
    time: f64,
    num_time_slices: u32,
    mode: ExpansionMode,
    order: u32,
}

impl<'a> ProductFormula<'a> {
    /// Evolution of `hamiltonian` for time `time`.
    pub fn new(
        hamiltonian: &'a Hamiltonian,
        time: f64,
        num_time_slices: u32,
        mode: ExpansionMode,
        order: u32,
    ) -> Self {
        Self {
            hamiltonian,
            time,
            num_time_slices,
            mode,
            order,
        }
    }

    fn validate(&self) -> AlgoResult<()> {
        if self.hamiltonian.n_terms() == 0 {
            return Err(AlgoError::InvalidParameter("Hamiltonian has no terms".into()));
        }
        if self.num_time_slices == 0 {
            return Err(AlgoError::InvalidParameter(
                "num_time_slices must be at least 1".into(),
            ));
        }
        if self.mode == ExpansionMode::Suzuki && !(1..=MAX_SUZUKI_ORDER).contains(&self.order) {
            return Err(AlgoError::InvalidParameter(format!(
                "Suzuki order must be in 1..={MAX_SUZUKI_ORDER}, got {}",
                self.order
            )));
        }
        if !self.time.is_finite() {
            return Err(AlgoError::InvalidParameter("evolution time is not finite".into()));
        }
        Ok(())
    }

    /// One slice as (term index, time weight) pairs in application order.
    ///
    /// Weights sum to one per term, so each term sees the slice once.
    pub fn slice_sequence(&self) -> Vec<(usize, f64)> {
        let base: Vec<(usize, f64)> = (0..self.hamiltonian.n_terms()).map(|k| (k, 1.0)).collect();
        match self.mode {
            ExpansionMode::Trotter => base,
            ExpansionMode::Suzuki => suzuki(&base, self.order),
        }
    }

    /// The evolution unitary on `n_qubits` qubits.
    pub fn unitary(&self, n_qubits: u32) -> AlgoResult<Matrix> {
        self.validate()?;
        let dim = 1usize << n_qubits;
        let dt = self.time / f64::from(self.num_time_slices);
        let sequence = self.slice_sequence();
        debug!(
            n_terms = self.hamiltonian.n_terms(),
            slices = self.num_time_slices,
            mode = %self.mode,
            order = self.order,
            steps_per_slice = sequence.len(),
            "building product-formula unitary"
        );

        let mut slice: Matrix = Array2::zeros((dim, dim));
        for col in 0..dim {
            let mut v = Vector::zeros(dim);
            v[col] = Complex64::new(1.0, 0.0);
            for &(k, w) in &sequence {
                let term = &self.hamiltonian.terms()[k];
                let theta = term.coeff * w * dt;
                let pv = term.pauli.apply(&v);
                let (s, c) = theta.sin_cos();
                v = v.mapv(|z| z * c) + pv.mapv(|z| z * Complex64::new(0.0, s));
            }
            slice.column_mut(col).assign(&v);
        }

        let mut u = identity(dim);
        for _ in 0..self.num_time_slices {
            u = slice.dot(&u);
        }
        Ok(u)
    }
}

fn suzuki(terms: &[(usize, f64)], order: u32) -> Vec<(usize, f64)> {
    if order <= 1 {
        let half: Vec<(usize, f64)> = terms.iter().map(|&(k, w)| (k, w / 2.0)).collect();
        return half.iter().copied().chain(half.iter().rev().copied()).collect();
    }
    let p = 1.0 / (4.0 - 4f64.powf(1.0 / (2.0 * f64::from(order) - 1.0)));
    let scaled = |f: f64| -> Vec<(usize, f64)> { terms.iter().map(|&(k, w)| (k, w * f)).collect() };
    let side = suzuki(&scaled(p), order - 1);
    let middle = suzuki(&scaled(1.0 - 4.0 * p), order - 1);

    let mut out = Vec::with_capacity(5 * side.len());
    out.extend_from_slice(&side);
    out.extend_from_slice(&side);
    out.extend_from_slice(&middle);
    out.extend_from_slice(&side);
    out.extend_from_slice(&side);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hamiltonian::HamiltonianTerm;
    use crate::linalg::adjoint;

    fn max_diff(a: &Matrix, b: &Matrix) -> f64 {
        a.iter().zip(b.iter()).map(|(x, y)| (x - y).norm()).fold(0.0, f64::max)
    }

    #[test]
    fn test_commuting_terms_are_exact() {
        // Z and I commute, so even one Trotter slice is exact.
        let h = Hamiltonian::from_terms(vec![HamiltonianTerm::z(0, 0.7), HamiltonianTerm::identity(0.3)]);
        let u = ProductFormula::new(&h, 1.3, 1, ExpansionMode::Trotter, 1)
            .unitary(1)
            .unwrap();
        let e0 = Complex64::from_polar(1.0, 1.3);
        let e1 = Complex64::from_polar(1.0, -0.4 * 1.3);
        assert!((u[[0, 0]] - e0).norm() < 1e-12);
        assert!((u[[1, 1]] - e1).norm() < 1e-12);
    }

    #[test]
    fn test_unitarity() {
        let h = Hamiltonian::from_terms(vec![HamiltonianTerm::z(0, 0.4), HamiltonianTerm::x(0, 0.9)]);
        let u = ProductFormula::new(&h, 2.0, 5, ExpansionMode::Suzuki, 2)
            .unitary(1)
            .unwrap();
        assert!(max_diff(&adjoint(&u).dot(&u), &identity(2)) < 1e-12);
    }

    #[test]
    fn test_suzuki_beats_trotter() {
        // H = 0.4 Z + 0.9 X; exact exp(iHt) = cos(|h|t) I + i sin(|h|t) H/|h|
        let h = Hamiltonian::from_terms(vec![HamiltonianTerm::z(0, 0.4), HamiltonianTerm::x(0, 0.9)]);
        let t = 2.0;
        let norm = (0.4f64 * 0.4 + 0.9 * 0.9).sqrt();
        let hm = h.to_matrix(1);
        let exact = identity(2).mapv(|z| z * (norm * t).cos())
            + hm.mapv(|z| z * Complex64::new(0.0, (norm * t).sin() / norm));

        let trotter = ProductFormula::new(&h, t, 10, ExpansionMode::Trotter, 1)
            .unitary(1)
            .unwrap();
        let suzuki = ProductFormula::new(&h, t, 10, ExpansionMode::Suzuki, 2)
            .unitary(1)
            .unwrap();

        let e_trotter = max_diff(&trotter, &exact);
        let e_suzuki = max_diff(&suzuki, &exact);
        assert!(e_suzuki < e_trotter);
        assert!(e_suzuki < 1e-4);
    }

    #[test]
    fn test_sequence_weights_sum_to_one() {
        let h = Hamiltonian::from_terms(vec![HamiltonianTerm::z(0, 1.0), HamiltonianTerm::x(0, 1.0)]);
        for order in 1..=3 {
            let seq = ProductFormula::new(&h, 1.0, 1, ExpansionMode::Suzuki, order).slice_sequence();
            for k in 0..2 {
                let total: f64 = seq.iter().filter(|(i, _)| *i == k).map(|(_, w)| w).sum();
                assert!((total - 1.0).abs() < 1e-12, "order {order}: {total}");
            }
        }
    }

    #[test]
    fn test_invalid_parameters() {
        let h = Hamiltonian::from_terms(vec![HamiltonianTerm::z(0, 1.0)]);
        assert!(ProductFormula::new(&h, 1.0, 0, ExpansionMode::Trotter, 1).unitary(1).is_err());
        assert!(ProductFormula::new(&h, 1.0, 1, ExpansionMode::Suzuki, 0).unitary(1).is_err());
        let empty = Hamiltonian::from_terms(vec![]);
        assert!(ProductFormula::new(&empty, 1.0, 1, ExpansionMode::Trotter, 1).unitary(1).is_err());
    }
}
