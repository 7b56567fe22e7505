//! Binary logistic regression fit by batch gradient descent on the
//! cross-entropy loss. No external optimizer crate — the corpus this
//! workspace grew out of never pulled one in, so this follows the same
//! hand-rolled gradient-descent shape as [`super::sgd`].

use super::Predictor;

const LEARNING_RATE: f64 = 0.1;
const MAX_ITER: usize = 1000;

#[derive(Debug, Default)]
pub struct LogisticRegressionModel {
    coef: Vec<f64>,
    intercept: f64,
    fitted: bool,
}

impl LogisticRegressionModel {
    pub fn new() -> Self {
        Self::default()
    }

    fn logit(&self, row: &[f64]) -> f64 {
        self.intercept + row.iter().zip(self.coef.iter()).map(|(a, b)| a * b).sum::<f64>()
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Predictor for LogisticRegressionModel {
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
        self.coef = vec![0.0; p];
        self.intercept = 0.0;
        let n = x.len() as f64;

        for _ in 0..MAX_ITER {
            let mut grad_coef = vec![0.0; p];
            let mut grad_intercept = 0.0;

            for (row, &target) in x.iter().zip(y.iter()) {
                if row.len() != p {
                    return Err("all feature rows must have the same width".to_string());
                }
                let pred = sigmoid(self.logit(row));
                let err = pred - target;
                for (g, v) in grad_coef.iter_mut().zip(row.iter()) {
                    *g += err * v;
                }
                grad_intercept += err;
            }

            for (c, g) in self.coef.iter_mut().zip(grad_coef.iter()) {
                *c -= LEARNING_RATE * g / n;
            }
            self.intercept -= LEARNING_RATE * grad_intercept / n;
        }

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
                Ok(if sigmoid(self.logit(row)) >= 0.5 { 1.0 } else { 0.0 })
            })
            .collect()
    }
}
