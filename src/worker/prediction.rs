//! `PredictionWorker`: the ensemble-member role. Each instance fits one
//! bootstrap-resampled model and predicts on demand; the
//! `EnsembleMaster` fans out to every worker and averages the results
//! (`spec.md` §4.2).

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::scalar::Scalar;

use super::state::WorkerState;

#[derive(Debug, Deserialize)]
pub struct FitRequest {
    #[serde(rename = "X_train_rows")]
    pub x_train_rows: Vec<Vec<Scalar>>,
    #[serde(rename = "y_train_rows")]
    pub y_train_rows: Vec<Scalar>,
}

#[derive(Debug, Serialize)]
pub struct FitResponse {
    pub message: String,
    pub rows_fit: usize,
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(rename = "X_rows")]
    pub x_rows: Vec<Vec<Scalar>>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    #[serde(rename = "y_pred_rows")]
    pub y_pred_rows: Vec<f64>,
}

pub async fn fit(
    State(state): State<WorkerState>,
    Json(req): Json<FitRequest>,
) -> Result<Json<FitResponse>, AppError> {
    if req.x_train_rows.len() != req.y_train_rows.len() {
        return Err(AppError::Validation(
            "X_train_rows and y_train_rows length mismatch".to_string(),
        ));
    }

    let x: Vec<Vec<f64>> = req
        .x_train_rows
        .iter()
        .map(|row| row.iter().map(Scalar::as_f64).collect::<Result<Vec<_>, _>>())
        .collect::<Result<_, _>>()
        .map_err(AppError::Validation)?;
    let y: Vec<f64> = req
        .y_train_rows
        .iter()
        .map(Scalar::as_f64)
        .collect::<Result<_, _>>()
        .map_err(AppError::Validation)?;

    let mut model = state.predictor.lock().await;
    model.fit(&x, &y).map_err(AppError::Validation)?;

    Ok(Json(FitResponse {
        message: "fit complete".to_string(),
        rows_fit: x.len(),
    }))
}

pub async fn predict(
    State(state): State<WorkerState>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, AppError> {
    let x: Vec<Vec<f64>> = req
        .x_rows
        .iter()
        .map(|row| row.iter().map(Scalar::as_f64).collect::<Result<Vec<_>, _>>())
        .collect::<Result<_, _>>()
        .map_err(AppError::Validation)?;

    let model = state.predictor.lock().await;
    let preds = model.predict(&x).map_err(AppError::Validation)?;

    Ok(Json(PredictResponse { y_pred_rows: preds }))
}
