use faer::{Mat, linalg::solvers::DenseSolveCore};

use crate::error::{BanditError, Result};

/// Ridge regression model for one LinUCB arm
///
/// Holds `A = I + sum(x * x^T)` and `b = sum(reward * x)`. The coefficients
/// `theta = A^-1 * b` are not stored; [`RidgeModel::solve`] recomputes them
/// from the current `A` and `b` on demand.
#[derive(Debug, Clone)]
pub struct RidgeModel {
    /// A = I + X^T X
    pub a_matrix: Mat<f64>,
    /// X^T y
    pub xty: Mat<f64>,
    /// Number of features
    pub num_features: usize,
}

/// Inverse design matrix and coefficients derived from a [`RidgeModel`]
#[derive(Debug, Clone)]
pub struct RidgeSolution {
    /// A^-1
    pub a_inv: Mat<f64>,
    /// theta = A^-1 * b
    pub theta: Mat<f64>,
}

impl RidgeModel {
    /// Create a model with `A = I` and `b = 0`
    pub fn new(num_features: usize) -> Self {
        Self {
            a_matrix: identity(num_features),
            xty: Mat::<f64>::zeros(num_features, 1),
            num_features,
        }
    }

    /// Fold one observation into `A` and `b`
    ///
    /// `x * x^T` is positive semi-definite, so `A` stays positive definite.
    pub fn fit(&mut self, x: &[f64], y: f64) {
        for i in 0..self.num_features {
            for j in 0..self.num_features {
                self.a_matrix[(i, j)] += x[i] * x[j];
            }
            self.xty[(i, 0)] += y * x[i];
        }
    }

    /// Invert `A` and compute the coefficient vector
    pub fn solve(&self) -> Result<RidgeSolution> {
        let lu = self.a_matrix.partial_piv_lu();
        // Note: In faer, inverse() returns a Mat directly, not a Result
        let a_inv = lu.inverse();

        for j in 0..self.num_features {
            for i in 0..self.num_features {
                if !a_inv[(i, j)].is_finite() {
                    return Err(BanditError::NumericalError {
                        message: "design matrix is not invertible".into(),
                    });
                }
            }
        }

        let theta = &a_inv * &self.xty;
        Ok(RidgeSolution { a_inv, theta })
    }

    /// Reset the model to initial state
    pub fn reset(&mut self) {
        self.a_matrix = identity(self.num_features);
        self.xty = Mat::<f64>::zeros(self.num_features, 1);
    }
}

impl RidgeSolution {
    /// Predicted reward `theta^T * x`
    pub fn predict(&self, x: &[f64]) -> f64 {
        x.iter()
            .enumerate()
            .map(|(i, &xi)| xi * self.theta[(i, 0)])
            .sum()
    }

    /// Returns sqrt(x^T * A_inv * x), the width of the confidence bound
    pub fn uncertainty(&self, x: &[f64]) -> f64 {
        let mut result = 0.0;
        for (i, &xi) in x.iter().enumerate() {
            let mut a_inv_x_i = 0.0;
            for (j, &xj) in x.iter().enumerate() {
                a_inv_x_i += self.a_inv[(i, j)] * xj;
            }
            result += xi * a_inv_x_i;
        }

        // Rounding can push a zero quadratic form slightly negative
        result.max(0.0).sqrt()
    }
}

fn identity(n: usize) -> Mat<f64> {
    Mat::from_fn(n, n, |i, j| if i == j { 1.0 } else { 0.0 })
}
