//! Ordinary least squares via the normal equations, solved by Gaussian
//! elimination on the small `(p+1) x (p+1)` system (design matrix
//! augmented with an intercept column). Fine for the feature counts
//! this coordinator expects; not meant to scale to thousands of
//! columns.

use super::Predictor;

#[derive(Debug, Default)]
pub struct LinearRegressionModel {
    coef: Vec<f64>,
    intercept: f64,
    fitted: bool,
}

impl LinearRegressionModel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Predictor for LinearRegressionModel {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), String> {
        if x.is_empty() {
            return Err("cannot fit on an empty feature matrix".to_string());
        }
        if x.len() != y.len() {
            return Err(format!(
                "feature rows ({}) and target rows ({}) must match",
                x.len(),
                y.len()
            ));
        }
        let p = x[0].len();
        let n_params = p + 1;

        // Normal equations: (X^T X) beta = X^T y, X augmented with a
        // leading column of ones for the intercept.
        let mut xtx = vec![vec![0.0f64; n_params]; n_params];
        let mut xty = vec![0.0f64; n_params];

        for (row, &target) in x.iter().zip(y.iter()) {
            if row.len() != p {
                return Err("all feature rows must have the same width".to_string());
            }
            let mut augmented = Vec::with_capacity(n_params);
            augmented.push(1.0);
            augmented.extend_from_slice(row);

            for i in 0..n_params {
                xty[i] += augmented[i] * target;
                for j in 0..n_params {
                    xtx[i][j] += augmented[i] * augmented[j];
                }
            }
        }

        let beta = solve_linear_system(xtx, xty)?;
        self.intercept = beta[0];
        self.coef = beta[1..].to_vec();
        self.fitted = true;
        Ok(())
    }

    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, String> {
        if !self.fitted {
            return Err("model has not been fit yet".to_string());
        }
        x.iter()
            .map(|row| {
                if row.len() != self.coef.len() {
                    return Err(format!(
                        "expected {} features, got {}",
                        self.coef.len(),
                        row.len()
                    ));
                }
                Ok(self.intercept
                    + row.iter().zip(self.coef.iter()).map(|(a, b)| a * b).sum::<f64>())
            })
            .collect()
    }
}

/// Gaussian elimination with partial pivoting on a small dense system.
fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>, String> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&r1, &r2| a[r1][col].abs().total_cmp(&a[r2][col].abs()))
            .unwrap();
        if a[pivot][col].abs() < 1e-12 {
            return Err("feature matrix is singular; cannot solve normal equations".to_string());
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let sum: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - sum) / a[row][row];
    }
    Ok(x)
}
