//! Pauli-basis state tomography from sampled counts.
//!
//! Every qubit of the target register is measured in the X, Y or Z basis,
//! giving `3^q` settings. Each setting estimates the expectation of every
//! Pauli string it is compatible with; estimates from all compatible
//! settings are averaged and the density matrix follows by linear
//! inversion:
//!
//!   ρ = (1/2^q) Σ_P ⟨P⟩ · P
//!
//! Counts can be post-selected on a fixed set of bits outside the target
//! register (the HHL flag qubit).

use std::f64::consts::FRAC_1_SQRT_2;

use ndarray::Array2;
use num_complex::Complex64;

use qharness_hal::Counts;

use crate::error::{AlgoError, AlgoResult};
use crate::hamiltonian::{PauliOp, PauliString};
use crate::linalg::{Matrix, Vector, dominant_eigenvector};

/// Power-iteration cap for the dominant eigenvector.
const MAX_POWER_ITERATIONS: usize = 2000;

/// Single-qubit measurement basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementBasis {
    /// Rotate with H before measuring.
    X,
    /// Rotate with H·S† before measuring.
    Y,
    /// Computational basis.
    Z,
}

impl MeasurementBasis {
    const ALL: [MeasurementBasis; 3] = [MeasurementBasis::X, MeasurementBasis::Y, MeasurementBasis::Z];

    fn pauli(self) -> PauliOp {
        match self {
            MeasurementBasis::X => PauliOp::X,
            MeasurementBasis::Y => PauliOp::Y,
            MeasurementBasis::Z => PauliOp::Z,
        }
    }

    /// Basis-change matrix as `[[a, b], [c, d]]`.
    fn rotation(self) -> [[Complex64; 2]; 2] {
        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        match self {
            MeasurementBasis::X => [[h, h], [h, -h]],
            // H·S† = 1/√2 [[1, -i], [1, i]]
            MeasurementBasis::Y => [
                [h, Complex64::new(0.0, -FRAC_1_SQRT_2)],
                [h, Complex64::new(0.0, FRAC_1_SQRT_2)],
            ],
            MeasurementBasis::Z => [
                [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
                [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
            ],
        }
    }
}

/// All `3^q` settings; qubit 0 varies fastest.
pub fn settings(num_qubits: u32) -> Vec<Vec<MeasurementBasis>> {
    let total = 3usize.pow(num_qubits);
    (0..total)
        .map(|mut idx| {
            (0..num_qubits)
                .map(|_| {
                    let basis = MeasurementBasis::ALL[idx % 3];
                    idx /= 3;
                    basis
                })
                .collect()
        })
        .collect()
}

/// Apply a setting's basis change to `amplitudes`.
///
/// Target qubit `j` sits at bit `offset + j` of the basis-state index.
pub fn rotate(amplitudes: &[Complex64], setting: &[MeasurementBasis], offset: u32) -> Vec<Complex64> {
    let mut out = amplitudes.to_vec();
    for (j, basis) in setting.iter().enumerate() {
        if *basis == MeasurementBasis::Z {
            continue;
        }
        let m = basis.rotation();
        let bit = 1usize << (offset + j as u32);
        for i in 0..out.len() {
            if i & bit != 0 {
                continue;
            }
            let (a0, a1) = (out[i], out[i | bit]);
            out[i] = m[0][0] * a0 + m[0][1] * a1;
            out[i | bit] = m[1][0] * a0 + m[1][1] * a1;
        }
    }
    out
}

/// Accumulates Pauli expectation estimates across settings.
#[derive(Debug, Clone)]
pub struct StateTomography {
    num_qubits: u32,
    offset: u32,
    postselect: Vec<(u32, bool)>,
    sums: Vec<f64>,
    weights: Vec<u64>,
}

impl StateTomography {
    /// Tomography of a `num_qubits` register starting at bit `offset`.
    pub fn new(num_qubits: u32, offset: u32) -> Self {
        let n_strings = 1usize << (2 * num_qubits);
        Self {
            num_qubits,
            offset,
            postselect: Vec::new(),
            sums: vec![0.0; n_strings],
            weights: vec![0; n_strings],
        }
    }

    /// Keep only outcomes whose bit `bit` equals `value`.
    #[must_use]
    pub fn with_postselection(mut self, bit: u32, value: bool) -> Self {
        self.postselect.push((bit, value));
        self
    }

    fn accepts(&self, index: usize) -> bool {
        self.postselect
            .iter()
            .all(|&(bit, value)| ((index >> bit) & 1 == 1) == value)
    }

    /// Fold in the counts measured under `setting`.
    ///
    /// Returns the number of post-selected shots.
    pub fn add(&mut self, setting: &[MeasurementBasis], counts: &Counts) -> u64 {
        let mut kept = 0u64;
        let mut parity_sums = vec![0i64; 1usize << self.num_qubits];

        for (bits, &n) in counts.iter() {
            let Ok(index) = usize::from_str_radix(bits, 2) else {
                continue;
            };
            if !self.accepts(index) {
                continue;
            }
            kept += n;
            let outcome = (index >> self.offset) & ((1usize << self.num_qubits) - 1);
            for (subset, sum) in parity_sums.iter_mut().enumerate() {
                let sign = if (outcome & subset).count_ones() % 2 == 0 { 1 } else { -1 };
                *sum += sign * n as i64;
            }
        }
        if kept == 0 {
            return 0;
        }

        for (subset, sum) in parity_sums.iter().enumerate() {
            let string = self.string_index(setting, subset);
            self.sums[string] += *sum as f64 / kept as f64;
            self.weights[string] += 1;
        }
        kept
    }

    /// Pauli-string index of `setting` restricted to the qubits in `subset`.
    fn string_index(&self, setting: &[MeasurementBasis], subset: usize) -> usize {
        (0..self.num_qubits as usize)
            .filter(|j| subset & (1 << j) != 0)
            .map(|j| {
                let digit = PauliOp::ALL
                    .iter()
                    .position(|op| *op == setting[j].pauli())
                    .unwrap_or(0);
                digit << (2 * j)
            })
            .sum()
    }

    /// Averaged expectation of the `index`-th Pauli string, if observed.
    pub fn expectation(&self, index: usize) -> Option<f64> {
        match self.weights.get(index) {
            Some(&w) if w > 0 => Some(self.sums[index] / w as f64),
            _ => None,
        }
    }

    /// Density matrix by linear inversion.
    pub fn density_matrix(&self) -> AlgoResult<Matrix> {
        if self.expectation(0).is_none() {
            return Err(AlgoError::PostSelection(
                "no post-selected samples in any setting".into(),
            ));
        }
        let dim = 1usize << self.num_qubits;
        let mut rho: Matrix = Array2::zeros((dim, dim));
        for index in 0..self.sums.len() {
            let Some(value) = self.expectation(index) else {
                continue;
            };
            let pauli = PauliString::from_index(index, self.num_qubits);
            for c in 0..dim {
                let (r, phase) = pauli.act(c);
                rho[[r, c]] += phase * (value / dim as f64);
            }
        }
        Ok(rho)
    }

    /// Most likely pure state: dominant eigenvector of the estimate.
    ///
    /// The global phase is fixed so the largest component is real and
    /// positive.
    pub fn pure_state(&self) -> AlgoResult<Vector> {
        let rho = self.density_matrix()?;
        let v = dominant_eigenvector(&rho, 1.0, MAX_POWER_ITERATIONS)?;
        let pivot = v
            .iter()
            .copied()
            .max_by(|a, b| a.norm().total_cmp(&b.norm()))
            .unwrap_or(Complex64::new(1.0, 0.0));
        let phase = if pivot.norm() > 0.0 {
            pivot.conj() / pivot.norm()
        } else {
            Complex64::new(1.0, 0.0)
        };
        Ok(v.mapv(|z| z * phase))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::inner;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    /// Exact counts for a state, scaled to `shots`.
    fn exact_counts(amps: &[Complex64], width: usize, shots: f64) -> Counts {
        let mut counts = Counts::new();
        for (i, a) in amps.iter().enumerate() {
            let n = (a.norm_sqr() * shots).round() as u64;
            if n > 0 {
                counts.insert(format!("{:0width$b}", i), n);
            }
        }
        counts
    }

    #[test]
    fn test_settings_enumeration() {
        let s = settings(2);
        assert_eq!(s.len(), 9);
        assert_eq!(s[0], vec![MeasurementBasis::X, MeasurementBasis::X]);
        assert_eq!(s[8], vec![MeasurementBasis::Z, MeasurementBasis::Z]);
    }

    #[test]
    fn test_rotation_maps_plus_to_zero() {
        let plus = vec![c(FRAC_1_SQRT_2, 0.0), c(FRAC_1_SQRT_2, 0.0)];
        let out = rotate(&plus, &[MeasurementBasis::X], 0);
        assert!((out[0].norm_sqr() - 1.0).abs() < 1e-12);

        let plus_i = vec![c(FRAC_1_SQRT_2, 0.0), c(0.0, FRAC_1_SQRT_2)];
        let out = rotate(&plus_i, &[MeasurementBasis::Y], 0);
        assert!((out[0].norm_sqr() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_reconstructs_pure_state() {
        // (|0⟩ + i|1⟩)/√2 ⊗ |0⟩ on two qubits
        let psi = vec![c(FRAC_1_SQRT_2, 0.0), c(0.0, FRAC_1_SQRT_2), c(0.0, 0.0), c(0.0, 0.0)];
        let mut tomo = StateTomography::new(2, 0);
        for setting in settings(2) {
            let rotated = rotate(&psi, &setting, 0);
            tomo.add(&setting, &exact_counts(&rotated, 2, 1e6));
        }
        let est = tomo.pure_state().unwrap();
        let target: Vector = psi.into_iter().collect();
        assert!(inner(&est, &target).norm_sqr() > 1.0 - 1e-4);
    }

    #[test]
    fn test_postselection_on_flag() {
        // Flag at bit 0, one target qubit at bit 1. Flag=1 branch holds |1⟩.
        let amps = vec![c(0.6, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(0.8, 0.0)];
        let mut tomo = StateTomography::new(1, 1).with_postselection(0, true);
        for setting in settings(1) {
            let rotated = rotate(&amps, &setting, 1);
            tomo.add(&setting, &exact_counts(&rotated, 2, 1e6));
        }
        assert!((tomo.expectation(3).unwrap() + 1.0).abs() < 1e-3);
        let est = tomo.pure_state().unwrap();
        assert!(est[1].norm_sqr() > 1.0 - 1e-4);
    }

    #[test]
    fn test_no_postselected_samples() {
        let mut tomo = StateTomography::new(1, 1).with_postselection(0, true);
        let mut counts = Counts::new();
        counts.insert("00", 10);
        assert_eq!(tomo.add(&[MeasurementBasis::Z], &counts), 0);
        assert!(matches!(tomo.density_matrix(), Err(AlgoError::PostSelection(_))));
    }
}
