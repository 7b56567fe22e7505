//! `SGDWorker`: the parameter-server-member role. Runs one local
//! gradient step against its private data shard per request and can
//! hand the master a small sample of its own data so the PS master
//! can discover the feature count before the fit loop starts
//! (`spec.md` §4.4).

use std::fs;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::csv;
use crate::error::AppError;
use crate::scalar::Scalar;

use super::state::{WorkerState, SAMPLE_SIZE_FALLBACKS};

#[derive(Debug, Deserialize)]
pub struct FitStepRequest {
    pub coef: Vec<f64>,
    pub intercept: f64,
    pub eta0: f64,
}

#[derive(Debug, Serialize)]
pub struct FitStepResponse {
    pub coef_delta: Vec<f64>,
    pub intercept_delta: f64,
}

pub async fn fit_step(
    State(state): State<WorkerState>,
    Json(req): Json<FitStepRequest>,
) -> Result<Json<FitStepResponse>, AppError> {
    let features_csv = fs::read_to_string(state.features_path())?;
    let labels_csv = fs::read_to_string(state.labels_path())?;

    let x_frame = csv::read_frame(&features_csv).map_err(AppError::Validation)?;
    let y_frame = csv::read_frame(&labels_csv).map_err(AppError::Validation)?;

    if x_frame.n_rows() != y_frame.n_rows() {
        return Err(AppError::Validation(
            "X_train_rows and y_train_rows length mismatch".to_string(),
        ));
    }

    let x: Vec<Vec<f64>> = x_frame
        .rows
        .iter()
        .map(|row| row.iter().map(Scalar::as_f64).collect::<Result<Vec<_>, _>>())
        .collect::<Result<_, _>>()
        .map_err(AppError::Validation)?;
    let y: Vec<f64> = y_frame
        .rows
        .iter()
        .map(|row| row[0].as_f64())
        .collect::<Result<_, _>>()
        .map_err(AppError::Validation)?;

    let mut model = state.linear_learner.lock().await;
    model.set_coef(req.coef);
    model.set_intercept(req.intercept);
    let delta = model
        .fit_step(&x, &y, req.eta0)
        .map_err(AppError::Validation)?;

    let (coef_delta, intercept_delta) = delta
        .split_last()
        .map(|(last, rest)| (rest.to_vec(), *last))
        .ok_or_else(|| AppError::Other("fit_step returned an empty delta".to_string()))?;

    Ok(Json(FitStepResponse {
        coef_delta,
        intercept_delta,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct DataSampleRequest {
    #[serde(default)]
    pub requested_size: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct DataSampleResponse {
    #[serde(rename = "X_sample_rows")]
    pub x_sample_rows: Vec<Vec<Scalar>>,
    #[serde(rename = "y_sample_rows")]
    pub y_sample_rows: Vec<Scalar>,
    pub sample_size: usize,
}

/// Pick the largest fallback size (descending from 200) that both
/// satisfies `requested` (when given) and fits within `available`
/// rows. Falls back to the full available row count when even the
/// smallest fallback (2) doesn't fit.
fn pick_sample_size(available: usize, requested: Option<usize>) -> usize {
    let ceiling = requested.unwrap_or(SAMPLE_SIZE_FALLBACKS[0]);
    SAMPLE_SIZE_FALLBACKS
        .iter()
        .copied()
        .filter(|&size| size <= ceiling)
        .find(|&size| size <= available)
        .unwrap_or_else(|| available.min(ceiling))
}

pub async fn fit_request_data_sample(
    State(state): State<WorkerState>,
    Json(req): Json<DataSampleRequest>,
) -> Result<Json<DataSampleResponse>, AppError> {
    let features_csv = fs::read_to_string(state.features_path())?;
    let labels_csv = fs::read_to_string(state.labels_path())?;

    let x_frame = csv::read_frame(&features_csv).map_err(AppError::Validation)?;
    let y_frame = csv::read_frame(&labels_csv).map_err(AppError::Validation)?;

    let available = x_frame.n_rows().min(y_frame.n_rows());
    let sample_size = pick_sample_size(available, req.requested_size);

    Ok(Json(DataSampleResponse {
        x_sample_rows: x_frame.rows[..sample_size].to_vec(),
        y_sample_rows: y_frame.rows[..sample_size].iter().map(|r| r[0].clone()).collect(),
        sample_size,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_largest_fallback_that_fits() {
        assert_eq!(pick_sample_size(1000, None), 200);
        assert_eq!(pick_sample_size(40, None), 25);
        assert_eq!(pick_sample_size(1, None), 1);
    }

    #[test]
    fn honors_a_smaller_explicit_request() {
        assert_eq!(pick_sample_size(1000, Some(50)), 50);
        assert_eq!(pick_sample_size(10, Some(50)), 10);
    }
}
