//! Dense complex linear algebra.
//!
//! Matrices and vectors are `ndarray` arrays of [`Complex64`]. Everything
//! here is sized for the small systems the engines simulate densely.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use crate::error::{AlgoError, AlgoResult};

/// Dense complex matrix.
pub type Matrix = Array2<Complex64>;

/// Dense complex vector.
pub type Vector = Array1<Complex64>;

/// Default tolerance for structural checks.
pub const TOLERANCE: f64 = 1e-9;

/// Build a real matrix from rows.
pub fn real_matrix(rows: &[Vec<f64>]) -> AlgoResult<Matrix> {
    let n = rows.len();
    let m = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|r| r.len() != m) {
        return Err(AlgoError::DimensionMismatch("ragged rows".into()));
    }
    Ok(Array2::from_shape_fn((n, m), |(i, j)| {
        Complex64::new(rows[i][j], 0.0)
    }))
}

/// Build a real vector.
pub fn real_vector(values: &[f64]) -> Vector {
    values.iter().map(|&v| Complex64::new(v, 0.0)).collect()
}

/// Identity matrix of size `n`.
pub fn identity(n: usize) -> Matrix {
    Array2::from_shape_fn((n, n), |(i, j)| {
        if i == j {
            Complex64::new(1.0, 0.0)
        } else {
            Complex64::new(0.0, 0.0)
        }
    })
}

/// Conjugate transpose.
pub fn adjoint(a: &Matrix) -> Matrix {
    a.t().mapv(|z| z.conj())
}

/// Euclidean norm.
pub fn norm(v: &Vector) -> f64 {
    v.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt()
}

/// Scale `v` to unit norm.
pub fn normalize(v: &Vector) -> AlgoResult<Vector> {
    let n = norm(v);
    if n < 1e-300 {
        return Err(AlgoError::InvalidParameter("cannot normalize a zero vector".into()));
    }
    Ok(v.mapv(|z| z / n))
}

/// Inner product `Σ a_i · conj(b_i)`.
pub fn inner(a: &Vector, b: &Vector) -> Complex64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y.conj()).sum()
}

/// True if `a` is square and equal to its adjoint within `tol`.
pub fn is_hermitian(a: &Matrix, tol: f64) -> bool {
    let (n, m) = a.dim();
    if n != m {
        return false;
    }
    (0..n).all(|i| (i..n).all(|j| (a[[i, j]] - a[[j, i]].conj()).norm() <= tol))
}

/// Solve `A x = b` by Gaussian elimination with partial pivoting.
pub fn solve(a: &Matrix, b: &Vector) -> AlgoResult<Vector> {
    let (n, m) = a.dim();
    if n != m {
        return Err(AlgoError::DimensionMismatch(format!(
            "matrix is {n}x{m}, expected square"
        )));
    }
    if b.len() != n {
        return Err(AlgoError::DimensionMismatch(format!(
            "vector has length {}, matrix has {n} rows",
            b.len()
        )));
    }

    let mut lu = a.clone();
    let mut x = b.clone();
    let scale = a.iter().map(|z| z.norm()).fold(0.0, f64::max).max(1.0);

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| lu[[i, col]].norm().total_cmp(&lu[[j, col]].norm()))
            .unwrap_or(col);
        if lu[[pivot, col]].norm() <= 1e-13 * scale {
            return Err(AlgoError::Singular);
        }
        if pivot != col {
            for k in 0..n {
                lu.swap([pivot, k], [col, k]);
            }
            x.swap(pivot, col);
        }

        let p = lu[[col, col]];
        for row in (col + 1)..n {
            let factor = lu[[row, col]] / p;
            if factor.norm() == 0.0 {
                continue;
            }
            for k in col..n {
                let v = lu[[col, k]];
                lu[[row, k]] -= factor * v;
            }
            let v = x[col];
            x[row] -= factor * v;
        }
    }

    for row in (0..n).rev() {
        let mut acc = x[row];
        for k in (row + 1)..n {
            acc -= lu[[row, k]] * x[k];
        }
        x[row] = acc / lu[[row, row]];
    }
    Ok(x)
}

/// Dominant eigenvector of a Hermitian matrix by shifted power iteration.
///
/// The shift makes every eigenvalue of a trace-one, possibly slightly
/// indefinite estimate positive so the largest one dominates.
pub fn dominant_eigenvector(a: &Matrix, shift: f64, max_iter: usize) -> AlgoResult<Vector> {
    let n = a.nrows();
    if n == 0 || a.ncols() != n {
        return Err(AlgoError::DimensionMismatch("expected a non-empty square matrix".into()));
    }
    let shifted = a + &identity(n).mapv(|z| z * shift);

    let start = (0..n)
        .max_by(|&i, &j| a[[i, i]].re.total_cmp(&a[[j, j]].re))
        .unwrap_or(0);
    let mut v = shifted.column(start).to_owned();
    if norm(&v) < 1e-300 {
        v = Array1::from_elem(n, Complex64::new(1.0, 0.0));
    }
    v = normalize(&v)?;

    for _ in 0..max_iter {
        let next = normalize(&shifted.dot(&v))?;
        let overlap = inner(&next, &v).norm();
        v = next;
        if (1.0 - overlap).abs() < 1e-14 {
            break;
        }
    }
    Ok(v)
}

/// Cyclic Jacobi sweeps before giving up on convergence.
const JACOBI_MAX_SWEEPS: usize = 100;

/// Eigenvalues of a Hermitian matrix, ascending.
///
/// `a` is mapped to the real symmetric `[[Re a, -Im a], [Im a, Re a]]`,
/// which carries every eigenvalue of `a` twice, and diagonalized by
/// cyclic Jacobi rotations until the off-diagonal mass is below `1e-28`
/// of the total.
pub fn hermitian_eigenvalues(a: &Matrix) -> AlgoResult<Vec<f64>> {
    let n = a.nrows();
    if n == 0 || a.ncols() != n {
        return Err(AlgoError::DimensionMismatch("expected a non-empty square matrix".into()));
    }
    if !is_hermitian(a, TOLERANCE) {
        return Err(AlgoError::NotHermitian);
    }

    let m = 2 * n;
    let mut s = Array2::<f64>::zeros((m, m));
    for ((i, j), z) in a.indexed_iter() {
        s[[i, j]] = z.re;
        s[[i + n, j + n]] = z.re;
        s[[i, j + n]] = -z.im;
        s[[i + n, j]] = z.im;
    }

    let total: f64 = s.iter().map(|x| x * x).sum();
    let mut converged = false;
    for _ in 0..JACOBI_MAX_SWEEPS {
        let off: f64 = s
            .indexed_iter()
            .filter(|((i, j), _)| i != j)
            .map(|(_, x)| x * x)
            .sum();
        if off <= 1e-28 * total {
            converged = true;
            break;
        }
        for p in 0..m {
            for q in (p + 1)..m {
                let apq = s[[p, q]];
                if apq.abs() < 1e-300 {
                    continue;
                }
                let theta = (s[[q, q]] - s[[p, p]]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let sn = t * c;
                for k in 0..m {
                    let (kp, kq) = (s[[k, p]], s[[k, q]]);
                    s[[k, p]] = c * kp - sn * kq;
                    s[[k, q]] = sn * kp + c * kq;
                }
                for k in 0..m {
                    let (pk, qk) = (s[[p, k]], s[[q, k]]);
                    s[[p, k]] = c * pk - sn * qk;
                    s[[q, k]] = sn * pk + c * qk;
                }
            }
        }
    }
    if !converged {
        return Err(AlgoError::InvalidParameter(format!(
            "eigenvalues did not converge in {JACOBI_MAX_SWEEPS} Jacobi sweeps"
        )));
    }

    let mut evs: Vec<f64> = s.diag().to_vec();
    evs.sort_by(f64::total_cmp);
    Ok(evs.into_iter().step_by(2).collect())
}

/// Next power of two not below `n`.
pub fn padded_dimension(n: usize) -> usize {
    n.next_power_of_two().max(2)
}
