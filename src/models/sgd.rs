//! Mini-batch SGD learners that expose a single-step interface for the
//! parameter-server worker (`spec.md` §4.4/§4.6).
//!
//! `coef_`/`intercept_` start at zero (`spec.md` §9 Open Questions:
//! zero-init rather than a near-zero-eta0 `partial_fit` warm start) and
//! are only ever mutated by the master applying an averaged gradient —
//! `fit_step` reports the delta it *would* apply without touching
//! `self`, and `fit` (the standalone, non-PS path) applies its own
//! steps directly for `n_iter` passes over the data.

use super::{LinearLearner, Predictor};

const DEFAULT_ETA0: f64 = 0.01;
const DEFAULT_MAX_ITER: usize = 100;

#[derive(Debug, Clone, Copy)]
pub struct SgdHyperParams {
    pub eta0: f64,
    pub max_iter: usize,
}

impl Default for SgdHyperParams {
    fn default() -> Self {
        Self {
            eta0: DEFAULT_ETA0,
            max_iter: DEFAULT_MAX_ITER,
        }
    }
}

#[derive(Debug)]
pub struct SgdRegressor {
    coef: Vec<f64>,
    intercept: f64,
    params: SgdHyperParams,
}

impl SgdRegressor {
    pub fn new(n_features: usize, params: SgdHyperParams) -> Self {
        Self {
            coef: vec![0.0; n_features],
            intercept: 0.0,
            params,
        }
    }

    fn predict_one(&self, row: &[f64]) -> f64 {
        self.intercept + row.iter().zip(self.coef.iter()).map(|(a, b)| a * b).sum::<f64>()
    }

    fn gradient(&self, x: &[Vec<f64>], y: &[f64]) -> Result<(Vec<f64>, f64), String> {
        if x.len() != y.len() {
            return Err(format!(
                "feature rows ({}) and target rows ({}) must match",
                x.len(),
                y.len()
            ));
        }
        let n = x.len().max(1) as f64;
        let mut grad_coef = vec![0.0; self.coef.len()];
        let mut grad_intercept = 0.0;
        for (row, &target) in x.iter().zip(y.iter()) {
            if row.len() != self.coef.len() {
                return Err(format!(
                    "expected {} features, got {}",
                    self.coef.len(),
                    row.len()
                ));
            }
            let err = self.predict_one(row) - target;
            for (g, v) in grad_coef.iter_mut().zip(row.iter()) {
                *g += err * v;
            }
            grad_intercept += err;
        }
        for g in &mut grad_coef {
            *g /= n;
        }
        Ok((grad_coef, grad_intercept / n))
    }
}

impl Predictor for SgdRegressor {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), String> {
        if x.is_empty() {
            return Err("cannot fit on an empty feature matrix".to_string());
        }
        if self.coef.len() != x[0].len() {
            self.coef = vec![0.0; x[0].len()];
        }
        for _ in 0..self.params.max_iter {
            let (grad_coef, grad_intercept) = self.gradient(x, y)?;
            for (c, g) in self.coef.iter_mut().zip(grad_coef.iter()) {
                *c -= self.params.eta0 * g;
            }
            self.intercept -= self.params.eta0 * grad_intercept;
        }
        Ok(())
    }

    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, String> {
        x.iter()
            .map(|row| {
                if row.len() != self.coef.len() {
                    return Err(format!(
                        "expected {} features, got {}",
                        self.coef.len(),
                        row.len()
                    ));
                }
                Ok(self.predict_one(row))
            })
            .collect()
    }
}

impl LinearLearner for SgdRegressor {
    fn coef(&self) -> &[f64] {
        &self.coef
    }

    fn intercept(&self) -> f64 {
        self.intercept
    }

    fn set_coef(&mut self, coef: Vec<f64>) {
        self.coef = coef;
    }

    fn set_intercept(&mut self, intercept: f64) {
        self.intercept = intercept;
    }

    fn fit_step(&mut self, x: &[Vec<f64>], y: &[f64], eta0: f64) -> Result<Vec<f64>, String> {
        let (grad_coef, grad_intercept) = self.gradient(x, y)?;
        let mut delta = grad_coef.into_iter().map(|g| -eta0 * g).collect::<Vec<_>>();
        delta.push(-eta0 * grad_intercept);
        Ok(delta)
    }
}

/// Binary classifier sharing `SgdRegressor`'s linear core with a
/// sigmoid link for prediction and cross-entropy gradient.
#[derive(Debug)]
pub struct SgdClassifier {
    inner: SgdRegressor,
}

impl SgdClassifier {
    pub fn new(n_features: usize, params: SgdHyperParams) -> Self {
        Self {
            inner: SgdRegressor::new(n_features, params),
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Predictor for SgdClassifier {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), String> {
        self.inner.fit(x, y)
    }

    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, String> {
        let logits = self.inner.predict(x)?;
        Ok(logits
            .into_iter()
            .map(|z| if sigmoid(z) >= 0.5 { 1.0 } else { 0.0 })
            .collect())
    }
}

impl LinearLearner for SgdClassifier {
    fn coef(&self) -> &[f64] {
        self.inner.coef()
    }

    fn intercept(&self) -> f64 {
        self.inner.intercept()
    }

    fn set_coef(&mut self, coef: Vec<f64>) {
        self.inner.set_coef(coef);
    }

    fn set_intercept(&mut self, intercept: f64) {
        self.inner.set_intercept(intercept);
    }

    fn fit_step(&mut self, x: &[Vec<f64>], y: &[f64], eta0: f64) -> Result<Vec<f64>, String> {
        self.inner.fit_step(x, y, eta0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_step_returns_a_delta_without_mutating_coef() {
        let mut model = SgdRegressor::new(1, SgdHyperParams::default());
        let x = vec![vec![1.0], vec![2.0]];
        let y = vec![2.0, 4.0];
        let before = model.coef().to_vec();
        let delta = model.fit_step(&x, &y, 0.1).unwrap();
        assert_eq!(model.coef().to_vec(), before);
        assert_eq!(delta.len(), 2); // coef delta + intercept delta
    }

    #[test]
    fn set_coef_overwrites_state_directly() {
        let mut model = SgdRegressor::new(2, SgdHyperParams::default());
        model.set_coef(vec![1.0, 2.0]);
        model.set_intercept(0.5);
        assert_eq!(model.coef(), &[1.0, 2.0]);
        assert_eq!(model.intercept(), 0.5);
    }
}
