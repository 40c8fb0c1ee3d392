//! Eigenvalue estimation by quantum phase estimation (QPE).
//!
//! A clock register of `n` qubits (`N = 2^n` values) controls powers of
//! `U = exp(i A t)`. For an eigenvector with eigenvalue `λ` the clock ends
//! up peaked at `k ≈ λ t N / 2π`, so clock value `k` decodes to
//!
//!   λ̃ = k · 2π / (N t)
//!
//! In negative-eigenvalue mode the clock is read as two's complement.
//!
//! The register is simulated densely: the joint state is kept as one
//! system vector per clock value.

use std::f64::consts::PI;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use qharness_hal::CircuitResources;

use crate::error::{AlgoError, AlgoResult};
use crate::evolution::{ExpansionMode, ProductFormula};
use crate::hamiltonian::Hamiltonian;
use crate::linalg::{Matrix, Vector, adjoint, identity};

/// Largest clock register simulated.
pub const MAX_CLOCK_QUBITS: u32 = 12;

/// Fraction of the representable phase range the spectral bound maps to.
///
/// Keeping the bound below the full range leaves room for the QPE
/// side lobes of the largest eigenvalue, which would otherwise wrap around
/// to the smallest clock values where the reciprocal is largest.
pub const PHASE_HEADROOM: f64 = 0.75;

/// Options for eigenvalue estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EigsOptions {
    /// Product-formula family for `exp(i A t)`.
    pub expansion_mode: ExpansionMode,
    /// Suzuki order (ignored for Trotter).
    pub expansion_order: u32,
    /// Number of product-formula slices.
    pub num_time_slices: u32,
    /// Clock register size.
    pub num_ancillae: u32,
    /// Read the clock as two's complement.
    pub negative_evals: bool,
    /// Explicit evolution time; derived from the spectral bound if unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evo_time: Option<f64>,
}

impl Default for EigsOptions {
    fn default() -> Self {
        Self {
            expansion_mode: ExpansionMode::Suzuki,
            expansion_order: 2,
            num_time_slices: 50,
            num_ancillae: 3,
            negative_evals: false,
            evo_time: None,
        }
    }
}

impl EigsOptions {
    /// Set the expansion mode.
    #[must_use]
    pub fn with_expansion_mode(mut self, mode: ExpansionMode) -> Self {
        self.expansion_mode = mode;
        self
    }

    /// Set the Suzuki order.
    #[must_use]
    pub fn with_expansion_order(mut self, order: u32) -> Self {
        self.expansion_order = order;
        self
    }

    /// Set the number of time slices.
    #[must_use]
    pub fn with_num_time_slices(mut self, slices: u32) -> Self {
        self.num_time_slices = slices;
        self
    }

    /// Set the clock register size.
    #[must_use]
    pub fn with_num_ancillae(mut self, n: u32) -> Self {
        self.num_ancillae = n;
        self
    }

    /// Enable or disable negative-eigenvalue mode.
    #[must_use]
    pub fn with_negative_evals(mut self, negative: bool) -> Self {
        self.negative_evals = negative;
        self
    }

    /// Fix the evolution time.
    #[must_use]
    pub fn with_evo_time(mut self, t: f64) -> Self {
        self.evo_time = Some(t);
        self
    }

    /// Check the options on their own.
    pub fn validate(&self) -> AlgoResult<()> {
        let min = if self.negative_evals { 2 } else { 1 };
        if !(min..=MAX_CLOCK_QUBITS).contains(&self.num_ancillae) {
            return Err(AlgoError::InvalidParameter(format!(
                "num_ancillae must be in {min}..={MAX_CLOCK_QUBITS}{}, got {}",
                if self.negative_evals { " in negative mode" } else { "" },
                self.num_ancillae
            )));
        }
        if self.num_time_slices == 0 {
            return Err(AlgoError::InvalidParameter(
                "num_time_slices must be at least 1".into(),
            ));
        }
        if let Some(t) = self.evo_time {
            if !(t.is_finite() && t > 0.0) {
                return Err(AlgoError::InvalidParameter(format!(
                    "evo_time must be positive, got {t}"
                )));
            }
        }
        Ok(())
    }
}

/// Phase estimation over a dense Hermitian matrix.
#[derive(Debug, Clone)]
pub struct EigsQpe {
    options: EigsOptions,
    hamiltonian: Hamiltonian,
    time: f64,
    unitary: Matrix,
    n_qubits: u32,
}

impl EigsQpe {
    /// Prepare phase estimation for a Hermitian `2^q × 2^q` matrix.
    pub fn new(matrix: &Matrix, options: EigsOptions) -> AlgoResult<Self> {
        options.validate()?;
        let hamiltonian = Hamiltonian::from_matrix(matrix)?;
        let n_qubits = matrix.nrows().trailing_zeros();

        let bound = hamiltonian.lambda();
        if bound <= 0.0 {
            return Err(AlgoError::Singular);
        }
        let range = if options.negative_evals { 0.5 } else { 1.0 };
        let time = options
            .evo_time
            .unwrap_or(2.0 * PI * range * PHASE_HEADROOM / bound);

        let unitary = ProductFormula::new(
            &hamiltonian,
            time,
            options.num_time_slices,
            options.expansion_mode,
            options.expansion_order,
        )
        .unitary(n_qubits)?;

        debug!(
            terms = hamiltonian.n_terms(),
            lambda = bound,
            time,
            clock = options.num_ancillae,
            negative = options.negative_evals,
            "prepared eigenvalue estimation"
        );
        Ok(Self {
            options,
            hamiltonian,
            time,
            unitary,
            n_qubits,
        })
    }

    /// The options in effect.
    pub fn options(&self) -> &EigsOptions {
        &self.options
    }

    /// Pauli decomposition of the matrix.
    pub fn hamiltonian(&self) -> &Hamiltonian {
        &self.hamiltonian
    }

    /// Evolution time `t`.
    pub fn evolution_time(&self) -> f64 {
        self.time
    }

    /// The evolution unitary `U ≈ exp(i A t)`.
    pub fn unitary(&self) -> &Matrix {
        &self.unitary
    }

    /// Number of clock values `N`.
    pub fn clock_size(&self) -> usize {
        1usize << self.options.num_ancillae
    }

    /// Eigenvalue resolution `2π / (N t)`.
    pub fn eigenvalue_unit(&self) -> f64 {
        2.0 * PI / (self.clock_size() as f64 * self.time)
    }

    /// Clock value as a signed integer (two's complement in negative mode).
    pub fn signed_clock(&self, k: usize) -> i64 {
        signed_clock(k, self.options.num_ancillae, self.options.negative_evals)
    }

    /// Eigenvalue decoded from clock value `k`.
    pub fn eigenvalue(&self, k: usize) -> f64 {
        self.signed_clock(k) as f64 * self.eigenvalue_unit()
    }

    /// Qubits used: clock plus system register.
    pub fn resources(&self) -> CircuitResources {
        CircuitResources::new(
            self.options.num_ancillae + self.n_qubits,
            self.options.num_ancillae,
        )
    }

    /// Run phase estimation on `b`.
    ///
    /// Returns the system-register component for each clock value; their
    /// squared norms sum to `‖b‖²`.
    pub fn estimate(&self, b: &Vector) -> AlgoResult<Vec<Vector>> {
        let dim = self.unitary.nrows();
        if b.len() != dim {
            return Err(AlgoError::DimensionMismatch(format!(
                "vector has length {}, matrix has dimension {dim}",
                b.len()
            )));
        }
        let n = self.clock_size();
        let norm = (n as f64).sqrt();

        // Controlled powers: ψ_k = U^k b / √N
        let mut psi = Vec::with_capacity(n);
        let mut v = b.clone();
        for _ in 0..n {
            psi.push(v.mapv(|z| z / norm));
            v = self.unitary.dot(&v);
        }

        Ok(fourier(&psi, -1.0))
    }

    /// Undo phase estimation and project the clock onto zero.
    ///
    /// `phi` is the per-clock-value state after the controlled rotation.
    pub fn uncompute(&self, phi: &[Vector]) -> AlgoResult<Vector> {
        let n = self.clock_size();
        if phi.len() != n {
            return Err(AlgoError::DimensionMismatch(format!(
                "expected {n} clock components, got {}",
                phi.len()
            )));
        }
        let dim = self.unitary.nrows();
        let norm = (n as f64).sqrt();
        let p = fourier(phi, 1.0);

        let u_dag = adjoint(&self.unitary);
        let mut power = identity(dim);
        let mut x = Vector::zeros(dim);
        for pk in &p {
            x = x + power.dot(pk).mapv(|z| z / norm);
            power = u_dag.dot(&power);
        }
        Ok(x)
    }

    /// Probability of each clock value when estimating `b`.
    pub fn clock_distribution(&self, b: &Vector) -> AlgoResult<Vec<f64>> {
        let total = b.iter().map(Complex64::norm_sqr).sum::<f64>();
        Ok(self
            .estimate(b)?
            .iter()
            .map(|phi| phi.iter().map(Complex64::norm_sqr).sum::<f64>() / total)
            .collect())
    }
}

/// Decode clock value `k` of an `n`-qubit register.
pub fn signed_clock(k: usize, n: u32, negative: bool) -> i64 {
    let size = 1i64 << n;
    let k = k as i64;
    if negative && k >= size / 2 {
        k - size
    } else {
        k
    }
}

/// Discrete Fourier transform across the clock index with sign `sign`.
///
/// `out[j] = (1/√N) Σ_k exp(sign · 2πi·jk/N) · input[k]`
fn fourier(input: &[Vector], sign: f64) -> Vec<Vector> {
    let n = input.len();
    let dim = input.first().map_or(0, |v| v.len());
    let norm = (n as f64).sqrt();
    let twiddle: Vec<Complex64> = (0..n)
        .map(|m| Complex64::from_polar(1.0, sign * 2.0 * PI * m as f64 / n as f64))
        .collect();

    (0..n)
        .map(|j| {
            let mut acc = Vector::zeros(dim);
            for (k, v) in input.iter().enumerate() {
                let w = twiddle[(j * k) % n] / norm;
                acc.zip_mut_with(v, |a, b| *a += w * b);
            }
            acc
        })
        .collect()
}
