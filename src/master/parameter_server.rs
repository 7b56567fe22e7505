//! `ParameterServerMaster`: synchronous (BSP) parameter-server SGD over
//! the worker fleet (`spec.md` §4.6).
//!
//! Each `/fit` call runs through six stages:
//!
//! - **S0** validate the fleet has at least one worker.
//! - **S1** discover the feature count from one worker's data sample.
//! - **S2** zero-initialize the global `coef_`/`intercept_`.
//! - **S3** fan a `fit_step` out to every worker in lockstep (BSP: the
//!   round doesn't advance until every worker has replied).
//! - **S4** recover each worker's raw gradient from its returned delta
//!   and average them (forcing a vanishingly small `eta0` when calling
//!   workers means their delta is `-eta0 * grad`; dividing back out by
//!   that same `eta0` recovers `grad` without the master re-deriving
//!   it independently — `spec.md` §9 Open Questions).
//! - **S5** apply the averaged gradient directly to the global model
//!   (`coef_ -= mean_grad`, no additional learning-rate scaling at the
//!   master) and check the element-wise absolute convergence test.
//! - **S6** stop at convergence or at the iteration cap, whichever
//!   comes first, and report which one.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::scalar::Scalar;

use super::state::MasterState;

/// `eta0` forced on every worker's `fit_step` call so its returned
/// delta is effectively the raw gradient once rescaled (`spec.md` §9
/// Open Questions).
const PS_PROBE_ETA0: f64 = 1e-20;
const DEFAULT_MAX_ITER: usize = 200;
const DEFAULT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Default)]
struct GlobalModel {
    coef: Vec<f64>,
    intercept: f64,
}

#[derive(Clone)]
pub struct PsMasterState {
    pub inner: MasterState,
    model: Arc<Mutex<GlobalModel>>,
}

impl PsMasterState {
    pub fn new(inner: MasterState) -> Self {
        Self {
            inner,
            model: Arc::new(Mutex::new(GlobalModel::default())),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FitInput {
    #[serde(default)]
    pub max_iter: Option<usize>,
    #[serde(default)]
    pub tolerance: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct FitOutput {
    pub converged: bool,
    pub iterations: usize,
    pub n_features: usize,
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

#[derive(Deserialize)]
struct DataSampleResponse {
    #[serde(rename = "X_sample_rows")]
    x_sample_rows: Vec<Vec<Scalar>>,
}

#[derive(Deserialize)]
struct FitStepResponse {
    coef_delta: Vec<f64>,
    intercept_delta: f64,
}

pub async fn fit(
    State(state): State<PsMasterState>,
    Json(input): Json<FitInput>,
) -> Result<Json<FitOutput>, AppError> {
    let n = state.inner.n_workers();
    if n == 0 {
        return Err(AppError::Validation("no workers configured".to_string()));
    }

    // S1: discover feature count from worker 0's local data.
    let sample_url = state.inner.worker_url(0, "/sgd/fit_request_data_sample");
    let sample: DataSampleResponse = state
        .inner
        .client
        .post_json(&sample_url, &serde_json::json!({ "requested_size": 2 }))
        .await?;
    let n_features = sample
        .x_sample_rows
        .first()
        .map(Vec::len)
        .ok_or_else(|| AppError::Worker("worker returned an empty data sample".to_string()))?;

    // S2: zero-initialize the global model.
    let mut model = state.model.lock().await;
    model.coef = vec![0.0; n_features];
    model.intercept = 0.0;

    let max_iter = input.max_iter.unwrap_or(DEFAULT_MAX_ITER);
    let tolerance = input.tolerance.unwrap_or(DEFAULT_TOLERANCE);

    let mut converged = false;
    let mut iterations = 0;

    for iter in 0..max_iter {
        iterations = iter + 1;

        // S3: fan fit_step out to every worker in lockstep.
        let body = serde_json::json!({
            "coef": model.coef,
            "intercept": model.intercept,
            "eta0": PS_PROBE_ETA0,
        });
        let mut futures = Vec::with_capacity(n);
        for i in 0..n {
            let url = state.inner.worker_url(i, "/sgd/fit_step");
            let client = state.inner.client.clone();
            let body = body.clone();
            futures.push(async move { client.post_json::<_, FitStepResponse>(&url, &body).await });
        }
        let results = futures::future::join_all(futures).await;

        // S4: recover each worker's raw gradient and average them.
        let mut mean_coef_grad = vec![0.0; n_features];
        let mut mean_intercept_grad = 0.0;
        for result in results {
            let step = result?;
            for (acc, delta) in mean_coef_grad.iter_mut().zip(step.coef_delta.iter()) {
                *acc += -delta / PS_PROBE_ETA0;
            }
            mean_intercept_grad += -step.intercept_delta / PS_PROBE_ETA0;
        }
        for g in &mut mean_coef_grad {
            *g /= n as f64;
        }
        mean_intercept_grad /= n as f64;

        // S5: apply the averaged gradient, no further LR scaling.
        for (c, g) in model.coef.iter_mut().zip(mean_coef_grad.iter()) {
            *c -= g;
        }
        model.intercept -= mean_intercept_grad;

        let max_abs_grad = mean_coef_grad
            .iter()
            .chain(std::iter::once(&mean_intercept_grad))
            .fold(0.0_f64, |acc, &g| acc.max(g.abs()));

        tracing::info!(iteration = iterations, max_abs_grad, "parameter server round complete");

        if max_abs_grad < tolerance {
            converged = true;
            break;
        }
    }

    // S6
    Ok(Json(FitOutput {
        converged,
        iterations,
        n_features,
    }))
}

pub async fn predict(
    State(state): State<PsMasterState>,
    Json(input): Json<PredictInput>,
) -> Result<Json<PredictOutput>, AppError> {
    let model = state.model.lock().await;
    if model.coef.is_empty() {
        return Err(AppError::Validation(
            "parameter server model has not been fit yet".to_string(),
        ));
    }

    let preds = input
        .x_rows
        .iter()
        .map(|row| {
            let features: Result<Vec<f64>, String> = row.iter().map(Scalar::as_f64).collect();
            let features = features.map_err(AppError::Validation)?;
            if features.len() != model.coef.len() {
                return Err(AppError::Validation(format!(
                    "expected {} features, got {}",
                    model.coef.len(),
                    features.len()
                )));
            }
            Ok(model.intercept
                + features.iter().zip(model.coef.iter()).map(|(a, b)| a * b).sum::<f64>())
        })
        .collect::<Result<Vec<f64>, AppError>>()?;

    Ok(Json(PredictOutput { y_pred_rows: preds }))
}
