//! End-to-end HHL runs against the local backends.

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use qharness_adapter_sim::{QasmBackend, StatevectorBackend};
use qharness_algo::linalg::{identity, real_matrix, real_vector, solve};
use qharness_algo::random_matrix::{random_diag, random_hermitian};
use qharness_algo::{
    EigsOptions, Hhl, Matrix, ReciprocalMode, ReciprocalOptions, SpectrumSpec, Vector,
};
use qharness_hal::RunConfig;

fn fidelity(a: &[Complex64], b: &[Complex64]) -> f64 {
    let na: f64 = a.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt();
    let nb: f64 = b.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt();
    let overlap: Complex64 = a.iter().zip(b).map(|(x, y)| x * y.conj()).sum();
    (overlap.norm() / (na * nb)).powi(2)
}

fn classical(a: &Matrix, b: &Vector) -> Vec<Complex64> {
    solve(a, b).unwrap().to_vec()
}

fn run_sv(a: &Matrix, b: &Vector, eigs: EigsOptions, recip: ReciprocalOptions) -> Vec<Complex64> {
    Hhl::new(a, b, eigs, recip)
        .unwrap()
        .run(&StatevectorBackend::new(), &RunConfig::new(1))
        .unwrap()
        .solution
}

// ---------------------------------------------------------------------------
// Deterministic backend
// ---------------------------------------------------------------------------

#[test]
fn test_identity_lookup() {
    let a = identity(2);
    for b in [[0.0, 1.0], [1.0, 0.0], [1.0, 1.0], [1.0, 10.0]] {
        let b = real_vector(&b);
        let x = run_sv(&a, &b, EigsOptions::default(), ReciprocalOptions::default());
        assert!(fidelity(&x, &classical(&a, &b)) >= 1.0 - 1e-5, "b = {b}");
        // The solution carries the right scale, not just the direction.
        for (xi, bi) in x.iter().zip(b.iter()) {
            assert!((xi - bi).norm() < 1e-6);
        }
    }
}

#[test]
fn test_identity_long_division() {
    let a = identity(2);
    let recip = ReciprocalOptions::default()
        .with_mode(ReciprocalMode::LongDivision)
        .with_scale(1.0);
    for b in [[0.0, 1.0], [1.0, 0.0], [1.0, 1.0], [1.0, 10.0]] {
        let b = real_vector(&b);
        let x = run_sv(&a, &b, EigsOptions::default(), recip);
        assert!(fidelity(&x, &classical(&a, &b)) >= 1.0 - 1e-5);
    }
}

#[test]
fn test_identity_negative_mode() {
    let a = identity(2);
    let eigs = EigsOptions::default().with_num_ancillae(4).with_negative_evals(true);
    let recip = ReciprocalOptions::default().with_negative_evals(true);
    for b in [[-1.0, 0.0], [0.0, -1.0], [-1.0, -1.0]] {
        let b = real_vector(&b);
        let x = run_sv(&a, &b, eigs, recip);
        assert!(fidelity(&x, &classical(&a, &b)) >= 1.0 - 1e-5);
    }
}

#[test]
fn test_negative_eigenvalue_matrix() {
    let a = identity(2).mapv(|z| -z);
    let eigs = EigsOptions::default().with_num_ancillae(4).with_negative_evals(true);
    let recip = ReciprocalOptions::default().with_negative_evals(true);
    let b = real_vector(&[1.0, 2.0]);
    let x = run_sv(&a, &b, eigs, recip);
    assert!((x[0] + Complex64::new(1.0, 0.0)).norm() < 1e-6);
    assert!((x[1] + Complex64::new(2.0, 0.0)).norm() < 1e-6);
}

#[test]
fn test_random_hermitian() {
    let mut rng = StdRng::seed_from_u64(7);
    let spec = SpectrumSpec::new(0.0, 1.0).with_max_condition(10.0);
    let eigs = EigsOptions::default().with_num_ancillae(6);
    for _ in 0..5 {
        let a = random_hermitian(2, spec, &mut rng).unwrap();
        let b = real_vector(&[rng.r#gen(), rng.r#gen()]);
        let x = run_sv(&a, &b, eigs, ReciprocalOptions::default());
        assert!(fidelity(&x, &classical(&a, &b)) >= 1.0 - 1e-2);
    }
}

#[test]
fn test_random_diagonal_negative() {
    let mut rng = StdRng::seed_from_u64(11);
    let spec = SpectrumSpec::new(-1.0, 1.0).with_max_condition(10.0);
    let eigs = EigsOptions::default().with_num_ancillae(6).with_negative_evals(true);
    let recip = ReciprocalOptions::default().with_negative_evals(true);
    for _ in 0..5 {
        let a = random_diag(2, spec, &mut rng).unwrap();
        let b = real_vector(&[rng.r#gen(), rng.r#gen()]);
        let x = run_sv(&a, &b, eigs, recip);
        assert!(fidelity(&x, &classical(&a, &b)) >= 1.0 - 1e-2);
    }
}

#[test]
fn test_non_hermitian_embedding() {
    // Embedding is -Y⊗Y with eigenvalues ±1.
    let a = real_matrix(&[vec![0.0, 1.0], vec![-1.0, 0.0]]).unwrap();
    let b = real_vector(&[1.0, 2.0]);
    let eigs = EigsOptions::default().with_num_ancillae(4).with_negative_evals(true);
    let recip = ReciprocalOptions::default().with_negative_evals(true);

    let hhl = Hhl::new(&a, &b, eigs, recip).unwrap();
    assert!(hhl.is_embedded());
    let x = hhl
        .run(&StatevectorBackend::new(), &RunConfig::new(1))
        .unwrap()
        .solution;
    assert_eq!(x.len(), 2);
    assert!(fidelity(&x, &classical(&a, &b)) >= 1.0 - 1e-5);
}

#[test]
fn test_padding_to_power_of_two() {
    let a = identity(3).mapv(|z| z * 0.5);
    let b = real_vector(&[1.0, 0.0, 1.0]);
    let x = run_sv(&a, &b, EigsOptions::default(), ReciprocalOptions::default());
    assert_eq!(x.len(), 3);
    assert!(fidelity(&x, &classical(&a, &b)) >= 1.0 - 1e-5);
}

#[test]
fn test_deterministic_runs_are_idempotent() {
    let a = real_matrix(&[vec![0.6, 0.2], vec![0.2, 0.4]]).unwrap();
    let b = real_vector(&[1.0, 0.5]);
    let hhl = Hhl::new(&a, &b, EigsOptions::default(), ReciprocalOptions::default()).unwrap();
    let backend = StatevectorBackend::new();
    let first = hhl.run(&backend, &RunConfig::new(1)).unwrap();
    let second = hhl.run(&backend, &RunConfig::new(1)).unwrap();
    assert_eq!(first.solution, second.solution);
    assert_eq!(first.probability_result, second.probability_result);
}

// ---------------------------------------------------------------------------
// Sampling backend
// ---------------------------------------------------------------------------

#[test]
fn test_qasm_identity() {
    let a = identity(2);
    let backend = QasmBackend::new();
    let config = RunConfig::new(600).with_seed(1234);
    for b in [[0.0, 1.0], [1.0, 0.0], [1.0, 1.0], [1.0, 10.0]] {
        let b = real_vector(&b);
        let hhl = Hhl::new(&a, &b, EigsOptions::default(), ReciprocalOptions::default()).unwrap();
        let result = hhl.run(&backend, &config).unwrap();
        assert!(fidelity(&result.solution, &classical(&a, &b)) > 0.8);
        assert!(result.probability_result > 0.0);
    }
}

#[test]
fn test_qasm_reports_resources() {
    let a = identity(2);
    let b = real_vector(&[1.0, 0.0]);
    let hhl = Hhl::new(&a, &b, EigsOptions::default(), ReciprocalOptions::default()).unwrap();
    let result = hhl
        .run(&QasmBackend::new(), &RunConfig::new(100).with_seed(3))
        .unwrap();
    assert_eq!(result.resources, hhl.resources());
    assert_eq!(result.output.len(), 2);
}
