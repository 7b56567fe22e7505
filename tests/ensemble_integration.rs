//! End-to-end ensemble coordination: real worker HTTP servers on
//! loopback ports, driven through the master's router with
//! `tower::ServiceExt::oneshot` (`spec.md` §8).

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use chimera::config::EndpointsConfig;
use chimera::http_client::WorkerClient;
use chimera::master::{EnsembleMaster, MasterState};
use chimera::models::{LinearRegressionModel, SgdHyperParams, SgdRegressor};
use chimera::worker::{PredictionWorker, WorkerState};

async fn spawn_prediction_worker() -> String {
    let state = WorkerState::new(
        PathBuf::from("/tmp"),
        "X_train.csv".to_string(),
        "y_train.csv".to_string(),
        Box::new(LinearRegressionModel::new()),
        Box::new(SgdRegressor::new(0, SgdHyperParams::default())),
    );
    let router = PredictionWorker::new(state).router();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn ensemble_predict_averages_every_workers_exact_fit() {
    let urls = futures::future::join_all((0..3).map(|_| spawn_prediction_worker())).await;
    let client = WorkerClient::new(EndpointsConfig::default()).unwrap();
    let state = MasterState::from_worker_urls(urls, client);
    let router = EnsembleMaster::new(state).router();

    // y = 2x + 1, every bootstrap resample of these exactly-linear
    // points still recovers the same line, so the ensemble's averaged
    // prediction should match it exactly regardless of which rows each
    // member happened to resample.
    let fit_body = json!({
        "X_train_rows": [[1.0], [2.0], [3.0], [4.0], [5.0]],
        "y_train_rows": [3.0, 5.0, 7.0, 9.0, 11.0],
    });
    let fit_resp = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ensemble/fit")
                .header("content-type", "application/json")
                .body(Body::from(fit_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(fit_resp.status(), StatusCode::OK);

    let predict_body = json!({ "X_rows": [[10.0]] });
    let predict_resp = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ensemble/predict")
                .header("content-type", "application/json")
                .body(Body::from(predict_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(predict_resp.status(), StatusCode::OK);

    let json = body_json(predict_resp).await;
    let pred = json["y_pred_rows"][0].as_f64().unwrap();
    assert!((pred - 21.0).abs() < 1e-6, "expected ~21.0, got {pred}");
}

#[tokio::test]
async fn ensemble_fit_rejects_mismatched_row_counts() {
    let urls = futures::future::join_all((0..2).map(|_| spawn_prediction_worker())).await;
    let client = WorkerClient::new(EndpointsConfig::default()).unwrap();
    let state = MasterState::from_worker_urls(urls, client);
    let router = EnsembleMaster::new(state).router();

    let fit_body = json!({
        "X_train_rows": [[1.0], [2.0]],
        "y_train_rows": [1.0],
    });
    let resp = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ensemble/fit")
                .header("content-type", "application/json")
                .body(Body::from(fit_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(resp).await;
    assert_eq!(json["details"]["errorMessage"], "ValidationError");
}

