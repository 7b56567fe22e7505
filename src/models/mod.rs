//! Concrete learners behind the `Predictor`/`LinearLearner` traits.
//!
//! `spec.md` treats the statistical model itself as an external
//! dependency — callers just need "a predictor" and "a linear
//! learner with mutable coefficients." This module supplies the
//! minimum concrete implementations a runnable crate needs behind
//! those seams: ordinary least squares for regression, batch
//! gradient descent for classification, and the mini-batch SGD
//! variants the parameter-server worker drives one step at a time.

mod linear_regression;
mod logistic_regression;
mod sgd;

pub use linear_regression::LinearRegressionModel;
pub use logistic_regression::LogisticRegressionModel;
pub use sgd::{SgdClassifier, SgdHyperParams, SgdRegressor};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// A model that can be fit on a feature matrix plus target vector and
/// then used to predict on new rows.
pub trait Predictor: Send + Sync {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), String>;
    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, String>;
}

/// A linear model whose coefficients can be read and overwritten
/// directly — the parameter server applies averaged gradients to
/// `coef_`/`intercept_` without going through `fit` (`spec.md` §4.6).
pub trait LinearLearner: Predictor {
    fn coef(&self) -> &[f64];
    fn intercept(&self) -> f64;
    fn set_coef(&mut self, coef: Vec<f64>);
    fn set_intercept(&mut self, intercept: f64);

    /// Run one local gradient step against `x`/`y` at learning rate
    /// `eta0` and return the coefficient delta `coef_ - coef_before`,
    /// without applying it back to `self` (the master aggregates
    /// deltas from every worker before any single one is applied).
    fn fit_step(&mut self, x: &[Vec<f64>], y: &[f64], eta0: f64) -> Result<Vec<f64>, String>;
}

/// Which concrete learner an ensemble is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictorKind {
    LinearRegression,
    LogisticRegression,
}

/// Build `n` independently-constructed predictors of `kind`, seeded
/// deterministically from `seed` plus the member's index so repeated
/// runs with the same seed reproduce the same ensemble membership
/// (`spec.md` §4.3 Bootstrapper feeds each member a distinct resample;
/// the models themselves only need a seed when they have randomized
/// initialization, which these don't, but `rng` is threaded through
/// for parity with `SgdRegressor`/`SgdClassifier` construction).
pub fn ensemble_of(n: usize, kind: PredictorKind, seed: u64) -> Vec<Box<dyn Predictor>> {
    (0..n)
        .map(|i| {
            let _rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
            match kind {
                PredictorKind::LinearRegression => {
                    Box::new(LinearRegressionModel::new()) as Box<dyn Predictor>
                }
                PredictorKind::LogisticRegression => {
                    Box::new(LogisticRegressionModel::new()) as Box<dyn Predictor>
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensemble_of_builds_requested_count() {
        let members = ensemble_of(5, PredictorKind::LinearRegression, 42);
        assert_eq!(members.len(), 5);
    }
}
