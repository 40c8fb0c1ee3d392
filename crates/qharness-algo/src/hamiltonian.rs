//! Hamiltonians as sums of Pauli strings.
//!
//! A Hermitian matrix on `q` qubits decomposes uniquely as
//!
//!   H = Σ_P  c_P · P,   c_P = Tr(P H) / 2^q
//!
//! where `P` ranges over the `4^q` tensor products of I, X, Y, Z and every
//! `c_P` is real. Qubit `j` acts on bit `j` of the basis-state index.
//!
//! # Example
//!
//! ```rust
//! use qharness_algo::hamiltonian::Hamiltonian;
//! use qharness_algo::linalg::real_matrix;
//!
//! // [[2, 1], [1, 0]] = 1·I + 1·Z + 1·X
//! let a = real_matrix(&[vec![2.0, 1.0], vec![1.0, 0.0]]).unwrap();
//! let h = Hamiltonian::from_matrix(&a).unwrap();
//! assert_eq!(h.n_terms(), 3);
//! assert!((h.lambda() - 3.0).abs() < 1e-12);
//! ```

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{AlgoError, AlgoResult};
use crate::linalg::{Matrix, TOLERANCE, Vector, is_hermitian};

/// Coefficients below this magnitude are dropped from a decomposition.
const COEFF_CUTOFF: f64 = 1e-12;

/// Largest register decomposed term by term.
pub const MAX_DECOMPOSITION_QUBITS: u32 = 6;

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauliOp {
    /// Identity.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl PauliOp {
    /// The four operators, indexed 0..4.
    pub const ALL: [PauliOp; 4] = [PauliOp::I, PauliOp::X, PauliOp::Y, PauliOp::Z];

    /// Image of basis bit `bit` under this operator: `(new_bit, phase)`.
    fn act(self, bit: bool) -> (bool, Complex64) {
        match (self, bit) {
            (PauliOp::I, b) => (b, Complex64::new(1.0, 0.0)),
            (PauliOp::X, b) => (!b, Complex64::new(1.0, 0.0)),
            // Y|0⟩ = i|1⟩, Y|1⟩ = -i|0⟩
            (PauliOp::Y, false) => (true, Complex64::new(0.0, 1.0)),
            (PauliOp::Y, true) => (false, Complex64::new(0.0, -1.0)),
            (PauliOp::Z, b) => (b, Complex64::new(if b { -1.0 } else { 1.0 }, 0.0)),
        }
    }

    /// Single-character label.
    pub fn label(self) -> char {
        match self {
            PauliOp::I => 'I',
            PauliOp::X => 'X',
            PauliOp::Y => 'Y',
            PauliOp::Z => 'Z',
        }
    }
}

/// A tensor product of Pauli operators on indexed qubits.
///
/// Stored as a sorted `Vec<(qubit_index, PauliOp)>` with identities
/// omitted. Qubits not listed are implicitly I.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PauliString {
    ops: Vec<(u32, PauliOp)>,
}

impl PauliString {
    /// Identities are dropped; the rest is ordered by qubit.
    pub fn from_ops(ops: impl IntoIterator<Item = (u32, PauliOp)>) -> Self {
        let mut ops: Vec<_> = ops.into_iter().filter(|&(_, op)| op != PauliOp::I).collect();
        ops.sort_unstable_by_key(|&(q, _)| q);
        Self { ops }
    }

    /// The `index`-th string of the `4^n` strings on `n` qubits.
    ///
    /// Base-4 digit `j` of `index` selects the operator on qubit `j`.
    pub fn from_index(index: usize, n_qubits: u32) -> Self {
        Self::from_ops((0..n_qubits).map(|q| (q, PauliOp::ALL[(index >> (2 * q)) & 3])))
    }

    /// True if there are no non-identity operators.
    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// Operator on qubit `q`.
    pub fn op_on(&self, q: u32) -> PauliOp {
        self.ops
            .iter()
            .find(|(qq, _)| *qq == q)
            .map_or(PauliOp::I, |(_, op)| *op)
    }

    /// Image of basis state `index`: `P|index⟩ = phase · |image⟩`.
    pub fn act(&self, index: usize) -> (usize, Complex64) {
        let mut image = index;
        let mut phase = Complex64::new(1.0, 0.0);
        for &(q, op) in &self.ops {
            let bit = (index >> q) & 1 == 1;
            let (new_bit, p) = op.act(bit);
            if new_bit != bit {
                image ^= 1 << q;
            }
            phase *= p;
        }
        (image, phase)
    }

    /// Apply to a state vector.
    pub fn apply(&self, v: &Vector) -> Vector {
        let mut out = Vector::zeros(v.len());
        for (c, amp) in v.iter().enumerate() {
            let (r, phase) = self.act(c);
            out[r] += phase * amp;
        }
        out
    }

    /// Label such as `"XIZ"`, highest qubit first.
    pub fn label(&self, n_qubits: u32) -> String {
        (0..n_qubits).rev().map(|q| self.op_on(q).label()).collect()
    }
}

/// `coeff · pauli`; the coefficient of a Hermitian matrix is always real.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HamiltonianTerm {
    pub coeff: f64,
    pub pauli: PauliString,
}

impl HamiltonianTerm {
    pub fn new(coeff: f64, pauli: PauliString) -> Self {
        Self { coeff, pauli }
    }

    pub fn z(qubit: u32, coeff: f64) -> Self {
        Self::new(coeff, PauliString::from_ops([(qubit, PauliOp::Z)]))
    }

    pub fn x(qubit: u32, coeff: f64) -> Self {
        Self::new(coeff, PauliString::from_ops([(qubit, PauliOp::X)]))
    }

    /// Global-phase term.
    pub fn identity(coeff: f64) -> Self {
        Self::new(coeff, PauliString::from_ops(std::iter::empty()))
    }
}

/// Weighted sum of Pauli strings, in decomposition order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hamiltonian {
    terms: Vec<HamiltonianTerm>,
}

impl Hamiltonian {
    pub fn from_terms(terms: Vec<HamiltonianTerm>) -> Self {
        Self { terms }
    }

    /// Decompose a Hermitian `2^q × 2^q` matrix into Pauli terms.
    ///
    /// The identity term is kept: it shifts every eigenvalue and so
    /// matters for phase estimation.
    pub fn from_matrix(matrix: &Matrix) -> AlgoResult<Self> {
        let (n, m) = matrix.dim();
        if n != m || n < 2 || !n.is_power_of_two() {
            return Err(AlgoError::DimensionMismatch(format!(
                "expected a square power-of-two matrix, got {n}x{m}"
            )));
        }
        if !is_hermitian(matrix, TOLERANCE) {
            return Err(AlgoError::NotHermitian);
        }
        let n_qubits = n.trailing_zeros();
        if n_qubits > MAX_DECOMPOSITION_QUBITS {
            return Err(AlgoError::TooLarge(format!(
                "{n_qubits}-qubit matrix exceeds the decomposition limit of {MAX_DECOMPOSITION_QUBITS}"
            )));
        }

        let mut terms = Vec::new();
        for idx in 0..(1usize << (2 * n_qubits)) {
            let pauli = PauliString::from_index(idx, n_qubits);
            // Tr(H P) = Σ_c phase_c · H[c, image_c]
            let trace: Complex64 = (0..n)
                .map(|c| {
                    let (r, phase) = pauli.act(c);
                    phase * matrix[[c, r]]
                })
                .sum();
            let coeff = trace.re / n as f64;
            if coeff.abs() > COEFF_CUTOFF {
                terms.push(HamiltonianTerm::new(coeff, pauli));
            }
        }
        Ok(Self { terms })
    }

    pub fn terms(&self) -> &[HamiltonianTerm] {
        &self.terms
    }

    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// Spectral norm upper bound: Σ |c_k|.
    pub fn lambda(&self) -> f64 {
        self.terms.iter().map(|t| t.coeff.abs()).sum()
    }

    /// Dense matrix on `n_qubits` qubits.
    pub fn to_matrix(&self, n_qubits: u32) -> Matrix {
        let dim = 1usize << n_qubits;
        let mut m = Array2::zeros((dim, dim));
        for term in &self.terms {
            for c in 0..dim {
                let (r, phase) = term.pauli.act(c);
                m[[r, c]] += phase * term.coeff;
            }
        }
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::{identity, real_matrix};

    #[test]
    fn test_pauli_action() {
        let y = PauliString::from_ops([(0, PauliOp::Y)]);
        assert_eq!(y.act(0), (1, Complex64::new(0.0, 1.0)));
        assert_eq!(y.act(1), (0, Complex64::new(0.0, -1.0)));

        let zx = PauliString::from_ops([(0, PauliOp::X), (1, PauliOp::Z)]);
        assert_eq!(zx.act(0b10), (0b11, Complex64::new(-1.0, 0.0)));
    }

    #[test]
    fn test_from_index_and_label() {
        // digit 0 = 3 (Z on q0), digit 1 = 1 (X on q1)
        let p = PauliString::from_index(0b01_11, 2);
        assert_eq!(p.label(2), "XZ");
        assert_eq!(PauliString::from_index(0, 3).label(3), "III");
    }

    #[test]
    fn test_identity_decomposition() {
        let h = Hamiltonian::from_matrix(&identity(2)).unwrap();
        assert_eq!(h.n_terms(), 1);
        assert!(h.terms()[0].pauli.is_identity());
        assert!((h.terms()[0].coeff - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_decomposition_round_trip() {
        let mut m = real_matrix(&[
            vec![1.0, 0.5, 0.0, 0.2],
            vec![0.5, -0.3, 0.1, 0.0],
            vec![0.0, 0.1, 0.7, 0.0],
            vec![0.2, 0.0, 0.0, 0.4],
        ])
        .unwrap();
        m[[0, 2]] = Complex64::new(0.0, 0.25);
        m[[2, 0]] = Complex64::new(0.0, -0.25);

        let h = Hamiltonian::from_matrix(&m).unwrap();
        let back = h.to_matrix(2);
        for (a, b) in back.iter().zip(m.iter()) {
            assert!((a - b).norm() < 1e-12);
        }
    }

    #[test]
    fn test_rejects_non_hermitian() {
        let m = real_matrix(&[vec![1.0, 2.0], vec![0.0, 1.0]]).unwrap();
        assert!(matches!(Hamiltonian::from_matrix(&m), Err(AlgoError::NotHermitian)));
    }

    #[test]
    fn test_rejects_odd_dimension() {
        let m = identity(3);
        assert!(matches!(
            Hamiltonian::from_matrix(&m),
            Err(AlgoError::DimensionMismatch(_))
        ));
    }
}
