//! End-to-end parameter-server fit/predict over real SGD worker HTTP
//! servers reading real CSV shards from disk (`spec.md` §4.4, §4.6,
//! §8).

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use chimera::config::EndpointsConfig;
use chimera::http_client::WorkerClient;
use chimera::master::{MasterState, ParameterServerMaster};
use chimera::models::{LinearRegressionModel, SgdHyperParams, SgdRegressor};
use chimera::worker::{SGDWorker, WorkerState};

fn write_shard(dir: &std::path::Path, x: &[f64], y: &[f64]) {
    let mut x_csv = "x\n".to_string();
    for v in x {
        x_csv.push_str(&format!("{v}\n"));
    }
    std::fs::write(dir.join("X_train.csv"), x_csv).unwrap();

    let mut y_csv = "y\n".to_string();
    for v in y {
        y_csv.push_str(&format!("{v}\n"));
    }
    std::fs::write(dir.join("y_train.csv"), y_csv).unwrap();
}

async fn spawn_sgd_worker(data_folder: PathBuf) -> String {
    let state = WorkerState::new(
        data_folder,
        "X_train.csv".to_string(),
        "y_train.csv".to_string(),
        Box::new(LinearRegressionModel::new()),
        Box::new(SgdRegressor::new(0, SgdHyperParams::default())),
    );
    let router = SGDWorker::new(state).router();
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
async fn parameter_server_fit_then_predict_runs_end_to_end() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    write_shard(dir_a.path(), &[0.001, 0.002, 0.003], &[0.003, 0.006, 0.009]);
    write_shard(dir_b.path(), &[0.004, 0.005, 0.006], &[0.012, 0.015, 0.018]);

    let url_a = spawn_sgd_worker(dir_a.path().to_path_buf()).await;
    let url_b = spawn_sgd_worker(dir_b.path().to_path_buf()).await;

    let client = WorkerClient::new(EndpointsConfig::default()).unwrap();
    let state = MasterState::from_worker_urls(vec![url_a, url_b], client);
    let router = ParameterServerMaster::new(state).router();

    let fit_resp = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/fit")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "max_iter": 20 }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(fit_resp.status(), StatusCode::OK);
    let fit_json = body_json(fit_resp).await;
    assert_eq!(fit_json["n_features"], 1);
    assert!(fit_json["iterations"].as_u64().unwrap() >= 1);

    let predict_resp = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "X_rows": [[0.005]] }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(predict_resp.status(), StatusCode::OK);
    let predict_json = body_json(predict_resp).await;
    let pred = predict_json["y_pred_rows"][0].as_f64().unwrap();
    assert!(pred.is_finite());
}

#[tokio::test]
async fn parameter_server_predict_before_fit_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    write_shard(dir.path(), &[1.0], &[1.0]);
    let url = spawn_sgd_worker(dir.path().to_path_buf()).await;

    let client = WorkerClient::new(EndpointsConfig::default()).unwrap();
    let state = MasterState::from_worker_urls(vec![url], client);
    let router = ParameterServerMaster::new(state).router();

    let resp = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "X_rows": [[1.0]] }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
