//! HHL linear-system solver.
//!
//! The solver prepares `|b⟩`, estimates eigenvalues into a clock
//! register, rotates a flag qubit by the reciprocal of the clock value,
//! and uncomputes the clock. Conditioned on flag = 1 the system register
//! holds a state proportional to `A⁻¹|b⟩`.
//!
//! The measured program has two registers: the flag at bit 0 and the
//! system register above it, so basis index = `flag | x << 1`.
//!
//! # Preprocessing
//!
//! - A non-Hermitian `A` is replaced by `[[0, A], [A†, 0]]` with vector
//!   `[b, 0]`; the solution is the second half. This embedding has
//!   eigenvalues of both signs, so it needs negative-eigenvalue mode.
//! - Dimensions are padded to a power of two with an identity block.
//!
//! # Readout
//!
//! Backends that return a statevector give the flag = 1 block directly.
//! Sampling backends go through Pauli-basis tomography of that block.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use qharness_hal::{Backend, CircuitResources, HalError, Register, RunConfig, StatePreparation};

use crate::eigs::{EigsOptions, EigsQpe};
use crate::error::{AlgoError, AlgoResult};
use crate::linalg::{Matrix, TOLERANCE, Vector, adjoint, is_hermitian, norm, padded_dimension};
use crate::reciprocal::{Reciprocal, ReciprocalOptions};
use crate::tomography::{MeasurementBasis, StateTomography, rotate, settings};

/// Largest system register simulated.
pub const MAX_SYSTEM_QUBITS: u32 = 6;

/// Outcome of an HHL run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HhlResult {
    /// Estimate of `x` with `A x = b`, in the caller's dimension.
    pub solution: Vec<Complex64>,
    /// Normalized post-selected state of the system register.
    pub output: Vec<Complex64>,
    /// Probability of the flag reading 1.
    pub probability_result: f64,
    /// Qubit account of the circuit.
    pub resources: CircuitResources,
}

/// Configured HHL solver for one linear system.
#[derive(Debug, Clone)]
pub struct Hhl {
    eigs: EigsQpe,
    reciprocal: Reciprocal,
    /// Prepared `|b⟩`, normalized, in the padded dimension.
    state: Vector,
    b_norm: f64,
    original_dim: usize,
    embedded: bool,
    num_system_qubits: u32,
}

impl Hhl {
    /// Set up the solver for `A x = b`.
    pub fn new(
        matrix: &Matrix,
        vector: &Vector,
        eigs: EigsOptions,
        reciprocal: ReciprocalOptions,
    ) -> AlgoResult<Self> {
        if eigs.negative_evals != reciprocal.negative_evals {
            return Err(AlgoError::InconsistentNegativeEigenvalues {
                eigs: eigs.negative_evals,
                reciprocal: reciprocal.negative_evals,
            });
        }
        let (rows, cols) = matrix.dim();
        if rows != cols || rows == 0 {
            return Err(AlgoError::DimensionMismatch(format!(
                "matrix is {rows}x{cols}, expected non-empty square"
            )));
        }
        if vector.len() != rows {
            return Err(AlgoError::DimensionMismatch(format!(
                "vector has length {}, matrix has dimension {rows}",
                vector.len()
            )));
        }
        let b_norm = norm(vector);
        if b_norm < 1e-300 {
            return Err(AlgoError::InvalidParameter("right-hand side is zero".into()));
        }

        let embedded = !is_hermitian(matrix, TOLERANCE);
        let (a, b) = if embedded {
            if !eigs.negative_evals {
                return Err(AlgoError::NegativeModeRequired);
            }
            embed(matrix, vector)
        } else {
            (matrix.clone(), vector.clone())
        };
        let (a, b) = pad(&a, &b);
        let num_system_qubits = a.nrows().trailing_zeros();
        if num_system_qubits > MAX_SYSTEM_QUBITS {
            return Err(AlgoError::TooLarge(format!(
                "{num_system_qubits} system qubits exceed the limit of {MAX_SYSTEM_QUBITS}"
            )));
        }

        let eigs = EigsQpe::new(&a, eigs)?;
        let reciprocal = Reciprocal::new(reciprocal, &eigs)?;
        debug!(
            dim = rows,
            embedded,
            padded = a.nrows(),
            gain = reciprocal.gain(),
            "prepared HHL instance"
        );
        Ok(Self {
            eigs,
            reciprocal,
            state: b.mapv(|z| z / b_norm),
            b_norm,
            original_dim: rows,
            embedded,
            num_system_qubits,
        })
    }

    /// Eigenvalue-estimation stage.
    pub fn eigs(&self) -> &EigsQpe {
        &self.eigs
    }

    /// Reciprocal stage.
    pub fn reciprocal(&self) -> &Reciprocal {
        &self.reciprocal
    }

    /// True if the matrix was embedded as a Hermitian block matrix.
    pub fn is_embedded(&self) -> bool {
        self.embedded
    }

    /// Qubit account: clock, system, flag and reciprocal ancillas.
    pub fn resources(&self) -> CircuitResources {
        let qpe = self.eigs.resources();
        let extra = self.reciprocal.extra_ancillae();
        CircuitResources::new(qpe.num_qubits + 1 + extra, qpe.num_ancillae + extra)
    }

    /// Unnormalized joint state of (flag, system) after the clock is
    /// uncomputed and projected onto zero.
    fn raw_state(&self) -> AlgoResult<Vec<Complex64>> {
        let phi = self.eigs.estimate(&self.state)?;
        let mut rotated = Vec::with_capacity(phi.len());
        let mut kept = Vec::with_capacity(phi.len());
        for (k, component) in phi.iter().enumerate() {
            let f = self.reciprocal.amplitude(k);
            let g = (1.0 - f * f).max(0.0).sqrt();
            rotated.push(component.mapv(|z| z * f));
            kept.push(component.mapv(|z| z * g));
        }
        let x1 = self.eigs.uncompute(&rotated)?;
        let x0 = self.eigs.uncompute(&kept)?;

        let mut amps = vec![Complex64::new(0.0, 0.0); 2 * x1.len()];
        for i in 0..x1.len() {
            amps[i << 1] = x0[i];
            amps[(i << 1) | 1] = x1[i];
        }
        Ok(amps)
    }

    /// The program handed to the backend.
    pub fn program(&self) -> AlgoResult<StatePreparation> {
        self.prepare(self.raw_state()?)
    }

    fn prepare(&self, amplitudes: Vec<Complex64>) -> AlgoResult<StatePreparation> {
        let prep = StatePreparation::new(
            "hhl",
            vec![Register::new("flag", 1), Register::new("x", self.num_system_qubits)],
            amplitudes,
        )?;
        Ok(prep.with_resources(self.resources()))
    }

    /// Solve on a backend.
    #[instrument(skip(self, backend), fields(backend = backend.name(), shots = config.shots))]
    pub fn run(&self, backend: &dyn Backend, config: &RunConfig) -> AlgoResult<HhlResult> {
        let raw = self.raw_state()?;
        let scale = raw.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt();
        let prep = self.prepare(raw)?;

        let (block, probability) = if backend.capabilities().statevector {
            self.read_statevector(backend, &prep, config)?
        } else {
            self.read_tomography(backend, &prep, config)?
        };
        if probability <= 0.0 {
            warn!("flag never reads 1; solution is zero");
        }

        let factor = scale * self.b_norm / self.reciprocal.gain();
        let scaled: Vec<Complex64> = block.iter().map(|z| z * factor).collect();
        let solution = self.extract(&scaled);
        let output_norm = norm(&block);
        let output = if output_norm > 0.0 {
            block.iter().map(|z| z / output_norm).collect()
        } else {
            block.to_vec()
        };

        info!(probability, embedded = self.embedded, "HHL run complete");
        Ok(HhlResult {
            solution,
            output,
            probability_result: probability,
            resources: prep.resources(),
        })
    }

    /// Flag = 1 block of the returned statevector, in the normalized frame.
    fn read_statevector(
        &self,
        backend: &dyn Backend,
        prep: &StatePreparation,
        config: &RunConfig,
    ) -> AlgoResult<(Vector, f64)> {
        let result = backend.execute(prep, config)?;
        let sv = result.statevector.ok_or_else(|| {
            AlgoError::Hal(HalError::Backend(format!(
                "{} reported statevector support but returned none",
                backend.name()
            )))
        })?;
        let block: Vector = (0..sv.len() / 2).map(|i| sv[(i << 1) | 1]).collect();
        let probability = block.iter().map(Complex64::norm_sqr).sum();
        Ok((block, probability))
    }

    /// Flag = 1 block estimated by tomography, in the normalized frame.
    fn read_tomography(
        &self,
        backend: &dyn Backend,
        prep: &StatePreparation,
        config: &RunConfig,
    ) -> AlgoResult<(Vector, f64)> {
        let q = self.num_system_qubits;
        let mut tomo = StateTomography::new(q, 1).with_postselection(0, true);
        let mut probability = 0.0;

        for (index, setting) in settings(q).into_iter().enumerate() {
            let amps = rotate(prep.amplitudes(), &setting, 1);
            let program = StatePreparation::new(
                format!("hhl_tomography_{index}"),
                prep.registers().to_vec(),
                amps,
            )?
            .with_resources(prep.resources());
            let run = match config.seed {
                Some(seed) => config.with_seed(seed.wrapping_add(index as u64)),
                None => *config,
            };
            let result = backend.execute(&program, &run)?;
            let kept = tomo.add(&setting, &result.counts);
            if setting.iter().all(|b| *b == MeasurementBasis::Z) {
                probability = kept as f64 / result.counts.total_shots().max(1) as f64;
            }
        }
        debug!(settings = 3usize.pow(q), probability, "tomography complete");

        let state = tomo.pure_state()?;
        Ok((state.mapv(|z| z * probability.sqrt()), probability))
    }

    /// Undo padding and embedding.
    fn extract(&self, x: &[Complex64]) -> Vec<Complex64> {
        let n = self.original_dim;
        let range = if self.embedded { n..2 * n } else { 0..n };
        x[range].to_vec()
    }
}

/// Hermitian embedding `[[0, A], [A†, 0]]` with vector `[b, 0]`.
fn embed(a: &Matrix, b: &Vector) -> (Matrix, Vector) {
    let n = a.nrows();
    let a_dag = adjoint(a);
    let mut m: Matrix = Matrix::zeros((2 * n, 2 * n));
    for i in 0..n {
        for j in 0..n {
            m[[i, n + j]] = a[[i, j]];
            m[[n + i, j]] = a_dag[[i, j]];
        }
    }
    let mut v = Vector::zeros(2 * n);
    for i in 0..n {
        v[i] = b[i];
    }
    (m, v)
}

/// Pad to a power of two with an identity block and zero vector entries.
fn pad(a: &Matrix, b: &Vector) -> (Matrix, Vector) {
    let n = a.nrows();
    let dim = padded_dimension(n);
    if dim == n {
        return (a.clone(), b.clone());
    }
    let mut m: Matrix = Matrix::zeros((dim, dim));
    let mut v = Vector::zeros(dim);
    for i in 0..dim {
        if i < n {
            for j in 0..n {
                m[[i, j]] = a[[i, j]];
            }
            v[i] = b[i];
        } else {
            m[[i, i]] = Complex64::new(1.0, 0.0);
        }
    }
    (m, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::{identity, real_matrix, real_vector};

    #[test]
    fn test_inconsistent_negative_flags() {
        let err = Hhl::new(
            &identity(2),
            &real_vector(&[1.0, 0.0]),
            EigsOptions::default().with_negative_evals(true).with_num_ancillae(4),
            ReciprocalOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AlgoError::InconsistentNegativeEigenvalues { eigs: true, reciprocal: false }
        ));
    }

    #[test]
    fn test_non_hermitian_needs_negative_mode() {
        let a = real_matrix(&[vec![1.0, 2.0], vec![0.0, 1.0]]).unwrap();
        let err = Hhl::new(
            &a,
            &real_vector(&[1.0, 0.0]),
            EigsOptions::default(),
            ReciprocalOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AlgoError::NegativeModeRequired));
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = Hhl::new(
            &identity(2),
            &real_vector(&[1.0, 0.0, 0.0]),
            EigsOptions::default(),
            ReciprocalOptions::default(),
        );
        assert!(matches!(err, Err(AlgoError::DimensionMismatch(_))));
    }

    #[test]
    fn test_padding() {
        let a = identity(3).mapv(|z| z * 2.0);
        let (m, v) = pad(&a, &real_vector(&[1.0, 2.0, 3.0]));
        assert_eq!(m.nrows(), 4);
        assert_eq!(m[[3, 3]], Complex64::new(1.0, 0.0));
        assert_eq!(m[[2, 2]], Complex64::new(2.0, 0.0));
        assert_eq!(v[3], Complex64::new(0.0, 0.0));
    }

    #[test]
    fn test_embedding_is_hermitian() {
        let a = real_matrix(&[vec![1.0, 2.0], vec![0.0, 1.0]]).unwrap();
        let (m, v) = embed(&a, &real_vector(&[1.0, 1.0]));
        assert!(is_hermitian(&m, 1e-12));
        assert_eq!(v.len(), 4);
        assert_eq!(v[2], Complex64::new(0.0, 0.0));
    }

    #[test]
    fn test_resources() {
        let hhl = Hhl::new(
            &identity(2),
            &real_vector(&[1.0, 0.0]),
            EigsOptions::default(),
            ReciprocalOptions::default(),
        )
        .unwrap();
        // 3 clock + 1 system + 1 flag
        assert_eq!(hhl.resources(), CircuitResources::new(5, 3));
        assert_eq!(hhl.program().unwrap().num_measured_qubits(), 2);
    }
}
