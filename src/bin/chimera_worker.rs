//! `chimera-worker`: runs one worker container's HTTP surface, either
//! as a `PredictionWorker` (ensemble member) or an `SGDWorker`
//! (parameter-server member), chosen by `CHIMERA_MODE`.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use chimera::models::{LinearRegressionModel, PredictorKind, SgdHyperParams, SgdRegressor};
use chimera::worker::{PredictionWorker, SGDWorker, WorkerState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Prediction,
    Sgd,
}

impl std::str::FromStr for Mode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "prediction" => Ok(Mode::Prediction),
            "sgd" => Ok(Mode::Sgd),
            other => Err(format!("unknown worker mode {other:?}; expected \"prediction\" or \"sgd\"")),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "chimera-worker", about = "Chimera distributed training/inference worker")]
struct Args {
    /// Worker role: "prediction" or "sgd".
    #[arg(long, env = "CHIMERA_MODE")]
    mode: Mode,

    /// Port this worker's HTTP server binds to inside its container.
    #[arg(long, env = "CHIMERA_WORKERS_PORT", default_value_t = 80)]
    port: u16,

    /// Directory holding this worker's private training data shard.
    #[arg(long, env = "CHIMERA_DATA_FOLDER", default_value = "/data")]
    data_folder: PathBuf,

    #[arg(long, env = "CHIMERA_TRAIN_FEATURES_FILENAME", default_value = "X_train.csv")]
    train_features_filename: String,

    #[arg(long, env = "CHIMERA_TRAIN_LABELS_FILENAME", default_value = "y_train.csv")]
    train_labels_filename: String,

    /// Which concrete predictor the `prediction` role fits (`spec.md`
    /// §3 SUPPLEMENT — models are otherwise an external concern).
    #[arg(long, env = "CHIMERA_PREDICTOR_KIND", default_value = "linear_regression")]
    predictor_kind: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let predictor_kind = match args.predictor_kind.as_str() {
        "linear_regression" => PredictorKind::LinearRegression,
        "logistic_regression" => PredictorKind::LogisticRegression,
        other => bail!("unknown predictor kind {other:?}"),
    };
    let predictor: Box<dyn chimera::models::Predictor> = match predictor_kind {
        PredictorKind::LinearRegression => Box::new(LinearRegressionModel::new()),
        PredictorKind::LogisticRegression => Box::new(chimera::models::LogisticRegressionModel::new()),
    };
    let linear_learner = Box::new(SgdRegressor::new(0, SgdHyperParams::default()));

    let state = WorkerState::new(
        args.data_folder,
        args.train_features_filename,
        args.train_labels_filename,
        predictor,
        linear_learner,
    );

    let router = match args.mode {
        Mode::Prediction => PredictionWorker::new(state).router(),
        Mode::Sgd => SGDWorker::new(state).router(),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!(%addr, mode = ?args.mode, "chimera worker listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, router).await.context("worker server exited")?;
    Ok(())
}
