//! Worker-side HTTP surface: the two roles a worker container can play
//! (`spec.md` §4.2 PredictionWorker, §4.4 SGDWorker). Both roles share
//! the same binary (`chimera-worker`); which routes are mounted is
//! chosen by the `CHIMERA_MODE` the container starts with.

mod prediction;
mod sgd;
mod state;

pub use state::WorkerState;

use axum::routing::post;
use axum::Router;
use tower_http::trace::TraceLayer;

/// An ensemble-member worker: exposes `/node/fit` and `/node/predict`
/// over one bootstrap-resampled model (`spec.md` §4.2).
pub struct PredictionWorker {
    state: WorkerState,
}

impl PredictionWorker {
    pub fn new(state: WorkerState) -> Self {
        Self { state }
    }

    pub fn router(self) -> Router {
        Router::new()
            .route("/node/fit", post(prediction::fit))
            .route("/node/predict", post(prediction::predict))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state)
    }
}

/// A parameter-server-member worker: exposes `/sgd/fit_step` and
/// `/sgd/fit_request_data_sample` over its private data shard
/// (`spec.md` §4.4).
pub struct SGDWorker {
    state: WorkerState,
}

impl SGDWorker {
    pub fn new(state: WorkerState) -> Self {
        Self { state }
    }

    pub fn router(self) -> Router {
        Router::new()
            .route("/sgd/fit_step", post(sgd::fit_step))
            .route(
                "/sgd/fit_request_data_sample",
                post(sgd::fit_request_data_sample),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(self.state)
    }
}
