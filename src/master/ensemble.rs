//! `EnsembleMaster`: bagging over the worker fleet (`spec.md` §4.5).
//!
//! Fit bootstrap-resamples the training rows once per worker and fans
//! each resample out concurrently; predict fans the same input out to
//! every worker and averages their per-row predictions. Either call
//! reports the first failure in worker-index order, not whichever
//! response lands first — a flaky worker at index 3 must not mask a
//! structural failure at index 0.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::bootstrap::Bootstrapper;
use crate::error::AppError;
use crate::scalar::Scalar;

use super::state::MasterState;

#[derive(Debug, Deserialize)]
pub struct FitInput {
    #[serde(rename = "X_train_rows")]
    pub x_train_rows: Vec<Vec<Scalar>>,
    #[serde(rename = "y_train_rows")]
    pub y_train_rows: Vec<Scalar>,
}

#[derive(Debug, Serialize)]
pub struct FitOutput {
    pub message: String,
    pub n_workers_fit: usize,
}

#[derive(Debug, Deserialize)]
pub struct PredictInput {
    #[serde(rename = "X_rows")]
    pub x_rows: Vec<Vec<Scalar>>,
}

#[derive(Debug, Serialize)]
pub struct PredictOutput {
    #[serde(rename = "y_pred_rows")]
    pub y_pred_rows: Vec<f64>,
}

pub async fn fit(
    State(state): State<MasterState>,
    Json(input): Json<FitInput>,
) -> Result<Json<FitOutput>, AppError> {
    if input.x_train_rows.len() != input.y_train_rows.len() {
        return Err(AppError::Validation(
            "X_train_rows and y_train_rows length mismatch".to_string(),
        ));
    }

    let n = state.n_workers();
    if n == 0 {
        return Err(AppError::Validation("no workers configured".to_string()));
    }

    let mut bootstrapper = Bootstrapper::new(crate::bootstrap::DEFAULT_SEED);
    let mut futures = Vec::with_capacity(n);

    for i in 0..n {
        let idx = bootstrapper.resample_indices(input.x_train_rows.len());
        let x_sample: Vec<Vec<Scalar>> = idx.iter().map(|&j| input.x_train_rows[j].clone()).collect();
        let y_sample: Vec<Scalar> = idx.iter().map(|&j| input.y_train_rows[j].clone()).collect();

        let body = serde_json::json!({
            "X_train_rows": x_sample,
            "y_train_rows": y_sample,
        });
        let url = state.worker_url(i, "/node/fit");
        let client = state.client.clone();
        futures.push(async move { client.post_json::<_, serde_json::Value>(&url, &body).await });
    }

    let results = futures::future::join_all(futures).await;
    for result in results {
        result?;
    }

    tracing::info!(n_workers = n, "ensemble fit complete");
    Ok(Json(FitOutput {
        message: "ensemble fit complete".to_string(),
        n_workers_fit: n,
    }))
}

pub async fn predict(
    State(state): State<MasterState>,
    Json(input): Json<PredictInput>,
) -> Result<Json<PredictOutput>, AppError> {
    let n = state.n_workers();
    if n == 0 {
        return Err(AppError::Validation("no workers configured".to_string()));
    }

    #[derive(Deserialize)]
    struct WorkerPredictResponse {
        #[serde(rename = "y_pred_rows")]
        y_pred_rows: Vec<f64>,
    }

    let body = serde_json::json!({ "X_rows": input.x_rows });
    let mut futures = Vec::with_capacity(n);
    for i in 0..n {
        let url = state.worker_url(i, "/node/predict");
        let client = state.client.clone();
        let body = body.clone();
        futures.push(async move {
            client
                .post_json::<_, WorkerPredictResponse>(&url, &body)
                .await
        });
    }

    let results: Vec<Vec<f64>> = {
        let raw = futures::future::join_all(futures).await;
        let mut out = Vec::with_capacity(raw.len());
        for r in raw {
            out.push(r?.y_pred_rows);
        }
        out
    };

    if results.iter().any(|r| r.len() != input.x_rows.len()) {
        return Err(AppError::Worker(
            "a worker returned a different number of predictions than rows requested".to_string(),
        ));
    }

    let n_rows = input.x_rows.len();
    let mut averaged = vec![0.0; n_rows];
    for worker_preds in &results {
        for (acc, &p) in averaged.iter_mut().zip(worker_preds.iter()) {
            *acc += p;
        }
    }
    for v in &mut averaged {
        *v /= n as f64;
    }

    Ok(Json(PredictOutput { y_pred_rows: averaged }))
}
