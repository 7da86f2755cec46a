//! Linear least-squares solvers shared by the parameter fits.

use nalgebra::{DMatrix, DVector, SymmetricEigen};

use crate::error::FitError;

/// Smallest acceptable ratio between the extreme singular values (or eigenvalues).
pub const RCOND_MIN: f64 = 1e-12;

/// Below this ratio a solve still succeeds but the fit is reported as poorly conditioned.
pub const RCOND_WARN: f64 = 1e-8;

#[derive(Debug, Clone)]
pub struct Solution {
    pub params: DVector<f64>,
    /// Ratio of the smallest to the largest singular value (or eigenvalue).
    pub rcond: f64,
}

/// Solve min ‖A x - l‖ by SVD, refusing rank-deficient design matrices.
pub fn solve_svd(a: &DMatrix<f64>, l: &DVector<f64>) -> Result<Solution, FitError> {
    let svd = a.clone().svd(true, true);
    let s_max = svd.singular_values.max();
    let s_min = svd.singular_values.min();
    if !(s_max > 0.0) || s_min / s_max < RCOND_MIN {
        return Err(FitError::Degenerate(format!(
            "design matrix is rank deficient (singular values {s_min:e}..{s_max:e})"
        )));
    }
    let params = svd
        .solve(l, 0.0)
        .map_err(|e| FitError::Degenerate(e.to_string()))?;
    Ok(Solution {
        params,
        rcond: s_min / s_max,
    })
}

/// Solve the normal equations N x = W by Cholesky after Jacobi scaling.
///
/// The scaled matrix D N D (D = diag(N)^-½) is checked for conditioning first;
/// scaling does not change the solution.
pub fn solve_normal(n: &DMatrix<f64>, w: &DVector<f64>) -> Result<Solution, FitError> {
    let dim = n.nrows();
    let mut d = DVector::zeros(dim);
    for i in 0..dim {
        let nii = n[(i, i)];
        if !(nii > 0.0) {
            return Err(FitError::Degenerate(format!(
                "normal matrix has a vanishing diagonal at column {i}"
            )));
        }
        d[i] = 1.0 / nii.sqrt();
    }

    let scaled = DMatrix::from_fn(dim, dim, |i, j| n[(i, j)] * d[i] * d[j]);
    let eig = SymmetricEigen::new(scaled.clone());
    let l_max = eig.eigenvalues.max();
    let l_min = eig.eigenvalues.min();
    if !(l_max > 0.0) || l_min / l_max < RCOND_MIN {
        return Err(FitError::Degenerate(format!(
            "normal matrix is singular (eigenvalues {l_min:e}..{l_max:e})"
        )));
    }

    let chol = scaled
        .cholesky()
        .ok_or_else(|| FitError::Degenerate("normal matrix is not positive definite".into()))?;
    let rhs = w.component_mul(&d);
    let y = chol.solve(&rhs);
    Ok(Solution {
        params: y.component_mul(&d),
        rcond: l_min / l_max,
    })
}
