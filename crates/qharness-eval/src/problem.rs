//! Problem instances under test.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use qharness_algo::linalg::{self, Matrix, TOLERANCE, Vector, hermitian_eigenvalues, is_hermitian};
use qharness_algo::random_matrix::{random_diag, random_hermitian};
use qharness_algo::{Cnf, SpectrumSpec};

use crate::error::{ConfigError, HarnessError, HarnessResult};
use crate::groundtruth::{GroundTruth, parse_ground_truth};

/// SAT instance files shipped with the harness.
const BUILTIN_SAT: [(&str, &str); 3] = [
    ("test_grover", include_str!("../resources/test_grover.cnf")),
    ("test_grover_tiny", include_str!("../resources/test_grover_tiny.cnf")),
    (
        "test_grover_no_solution",
        include_str!("../resources/test_grover_no_solution.cnf"),
    ),
];

/// Names of the built-in SAT instances.
pub fn builtin_sat_names() -> Vec<&'static str> {
    BUILTIN_SAT.iter().map(|(name, _)| *name).collect()
}

/// Immutable description of a problem.
#[derive(Debug, Clone)]
pub enum ProblemInstance {
    /// Boolean satisfiability.
    Sat(SatInstance),
    /// Linear system `A x = b`.
    Linear(LinearInstance),
}

impl ProblemInstance {
    /// Instance name.
    pub fn name(&self) -> &str {
        match self {
            ProblemInstance::Sat(s) => &s.name,
            ProblemInstance::Linear(l) => &l.name,
        }
    }
}

/// A DIMACS formula and the ground truth from its header.
#[derive(Debug, Clone)]
pub struct SatInstance {
    name: String,
    dimacs: String,
    ground_truth: GroundTruth,
}

impl SatInstance {
    /// Build from instance text; the header must carry the ground truth.
    pub fn from_dimacs(name: impl Into<String>, text: impl Into<String>) -> HarnessResult<Self> {
        let dimacs = text.into();
        let ground_truth = parse_ground_truth(&dimacs)?;
        // Reject malformed formulas before any backend is involved.
        Cnf::parse(&dimacs)?;
        Ok(Self {
            name: name.into(),
            dimacs,
            ground_truth,
        })
    }

    /// Load an instance file.
    pub fn from_file(path: &Path) -> HarnessResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            HarnessError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("instance");
        Self::from_dimacs(name, text)
    }

    /// One of the shipped instances by name.
    pub fn builtin(name: &str) -> HarnessResult<Self> {
        let (_, text) = BUILTIN_SAT
            .iter()
            .find(|(n, _)| *n == name)
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "unknown built-in instance '{name}'. Available: {}",
                    builtin_sat_names().join(", ")
                ))
            })?;
        Self::from_dimacs(name, *text)
    }

    /// Instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw instance text.
    pub fn dimacs(&self) -> &str {
        &self.dimacs
    }

    /// Expected satisfying assignments.
    pub fn ground_truth(&self) -> &GroundTruth {
        &self.ground_truth
    }
}

/// Spectrum family of a generated matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RandomMatrixKind {
    /// Diagonal matrix.
    Diagonal,
    /// Dense Hermitian matrix with a random eigenbasis.
    Hermitian,
}

/// A linear system. The classical answer is computed on demand.
#[derive(Debug, Clone)]
pub struct LinearInstance {
    name: String,
    matrix: Matrix,
    vector: Vector,
    generated: bool,
}

impl LinearInstance {
    /// Build from a complex matrix and vector.
    pub fn new(name: impl Into<String>, matrix: Matrix, vector: Vector) -> HarnessResult<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols || rows == 0 {
            return Err(ConfigError::Invalid(format!(
                "matrix is {rows}x{cols}, expected non-empty square"
            ))
            .into());
        }
        if vector.len() != rows {
            return Err(ConfigError::Invalid(format!(
                "vector has length {}, matrix has dimension {rows}",
                vector.len()
            ))
            .into());
        }
        Ok(Self {
            name: name.into(),
            matrix,
            vector,
            generated: false,
        })
    }

    /// Build from real rows and a real vector.
    pub fn from_real(name: impl Into<String>, rows: &[Vec<f64>], vector: &[f64]) -> HarnessResult<Self> {
        let matrix = linalg::real_matrix(rows)?;
        Self::new(name, matrix, linalg::real_vector(vector))
    }

    /// Generate a seeded random matrix with the given spectrum.
    ///
    /// Without an explicit `vector`, `b` is drawn from the same generator
    /// after the matrix, one uniform `[0, 1)` entry per row.
    pub fn random(
        name: impl Into<String>,
        kind: RandomMatrixKind,
        size: usize,
        spectrum: SpectrumSpec,
        seed: u64,
        vector: Option<&[f64]>,
    ) -> HarnessResult<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let matrix = match kind {
            RandomMatrixKind::Diagonal => random_diag(size, spectrum, &mut rng)?,
            RandomMatrixKind::Hermitian => random_hermitian(size, spectrum, &mut rng)?,
        };
        let vector = match vector {
            Some(v) => v.to_vec(),
            None => (0..size).map(|_| rng.r#gen::<f64>()).collect(),
        };
        debug!(?kind, size, seed, "generated random system");
        let mut instance = Self::new(name, matrix, linalg::real_vector(&vector))?;
        instance.generated = true;
        Ok(instance)
    }

    /// Instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The matrix `A`.
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// The right-hand side `b`.
    pub fn vector(&self) -> &Vector {
        &self.vector
    }

    /// True if the matrix came from a random generator.
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// True if `A` is Hermitian.
    pub fn is_hermitian(&self) -> bool {
        is_hermitian(&self.matrix, TOLERANCE)
    }

    /// True if the system involves negative eigenvalues.
    ///
    /// Non-Hermitian matrices always do once embedded. For Hermitian ones
    /// the full spectrum is computed and an eigenvalue counts as negative
    /// below `-TOLERANCE`; anything in `[-TOLERANCE, 0)` is treated as zero.
    pub fn has_negative_eigenvalues(&self) -> HarnessResult<bool> {
        if !self.is_hermitian() {
            return Ok(true);
        }
        let evs = hermitian_eigenvalues(&self.matrix)?;
        Ok(evs.first().is_some_and(|&min| min < -TOLERANCE))
    }

    /// Normalized classical solution of `A x = b`.
    pub fn classical_solution(&self) -> HarnessResult<Vector> {
        let x = linalg::solve(&self.matrix, &self.vector)?;
        Ok(linalg::normalize(&x)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_instances_parse() {
        for name in builtin_sat_names() {
            let inst = SatInstance::builtin(name).unwrap();
            assert_eq!(inst.name(), name);
        }
        let none = SatInstance::builtin("test_grover_no_solution").unwrap();
        assert!(none.ground_truth().is_unsatisfiable());
        assert!(SatInstance::builtin("nope").is_err());
    }

    #[test]
    fn test_sat_needs_ground_truth() {
        let err = SatInstance::from_dimacs("x", "p cnf 1 1\n1 0\n").unwrap_err();
        assert!(matches!(err, HarnessError::GroundTruth(_)));
    }

    #[test]
    fn test_linear_shape_checks() {
        assert!(LinearInstance::from_real("a", &[vec![1.0, 0.0]], &[1.0]).is_err());
        assert!(LinearInstance::from_real("a", &[vec![1.0]], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_classical_solution_is_normalized() {
        let inst = LinearInstance::from_real("a", &[vec![2.0, 0.0], vec![0.0, 4.0]], &[2.0, 4.0]).unwrap();
        let x = inst.classical_solution().unwrap();
        let expected = std::f64::consts::FRAC_1_SQRT_2;
        assert!((x[0].re - expected).abs() < 1e-12);
        assert!((x[1].re - expected).abs() < 1e-12);
    }

    #[test]
    fn test_negative_eigenvalue_detection() {
        let pos = LinearInstance::from_real("p", &[vec![1.0, 0.0], vec![0.0, 0.5]], &[1.0, 1.0]).unwrap();
        assert!(!pos.has_negative_eigenvalues().unwrap());

        let neg = LinearInstance::from_real("n", &[vec![0.5, 0.0], vec![0.0, -0.5]], &[1.0, 1.0]).unwrap();
        assert!(neg.has_negative_eigenvalues().unwrap());

        let asym = LinearInstance::from_real("a", &[vec![1.0, 2.0], vec![0.0, 1.0]], &[1.0, 1.0]).unwrap();
        assert!(asym.has_negative_eigenvalues().unwrap());
    }

    #[test]
    fn test_small_negative_eigenvalue_is_found() {
        // Spectrum {1, -1e-6} rotated off the axes; the dominant eigenvalue
        // is a million times larger than the negative one.
        let (cs, sn) = (0.6, 0.8);
        let (l1, l2) = (1.0, -1e-6);
        let rows = [
            vec![l1 * cs * cs + l2 * sn * sn, (l1 - l2) * cs * sn],
            vec![(l1 - l2) * cs * sn, l1 * sn * sn + l2 * cs * cs],
        ];
        let inst = LinearInstance::from_real("s", &rows, &[1.0, 0.0]).unwrap();
        assert!(inst.has_negative_eigenvalues().unwrap());

        let flipped: [Vec<f64>; 2] = [rows[0].iter().map(|x| -x).collect(), rows[1].iter().map(|x| -x).collect()];
        let inst = LinearInstance::from_real("f", &flipped, &[1.0, 0.0]).unwrap();
        assert!(inst.has_negative_eigenvalues().unwrap());

        let tiny = LinearInstance::from_real("t", &[vec![1.0, 0.0], vec![0.0, -1e-12]], &[1.0, 0.0]).unwrap();
        assert!(!tiny.has_negative_eigenvalues().unwrap());
    }

    #[test]
    fn test_random_vector_is_drawn_from_seed() {
        let spec = SpectrumSpec::new(0.0, 1.0).with_max_condition(10.0);
        let a = LinearInstance::random("r", RandomMatrixKind::Diagonal, 2, spec, 3, None).unwrap();
        let b = LinearInstance::random("r", RandomMatrixKind::Diagonal, 2, spec, 3, None).unwrap();
        let c = LinearInstance::random("r", RandomMatrixKind::Diagonal, 2, spec, 4, None).unwrap();
        assert_eq!(a.vector(), b.vector());
        assert_ne!(a.vector(), c.vector());
        assert!(a.vector().iter().all(|z| (0.0..1.0).contains(&z.re) && z.im == 0.0));
    }

    #[test]
    fn test_random_instance_is_seeded() {
        let spec = SpectrumSpec::new(0.0, 1.0).with_max_condition(10.0);
        let a = LinearInstance::random("r", RandomMatrixKind::Hermitian, 2, spec, 9, Some(&[1.0, 1.0])).unwrap();
        let b = LinearInstance::random("r", RandomMatrixKind::Hermitian, 2, spec, 9, Some(&[1.0, 1.0])).unwrap();
        assert_eq!(a.matrix(), b.matrix());
        assert!(a.is_generated());
        assert!(a.is_hermitian());
    }
}
