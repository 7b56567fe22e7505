//! Master-side HTTP surface: the two coordination strategies a master
//! container can run (`spec.md` §4.5 EnsembleMaster, §4.6
//! ParameterServerMaster).

mod ensemble;
mod parameter_server;
mod state;

pub use parameter_server::PsMasterState;
pub use state::MasterState;

use axum::routing::post;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Bagging ensemble coordinator: exposes `/ensemble/fit` and
/// `/ensemble/predict`.
pub struct EnsembleMaster {
    state: MasterState,
}

impl EnsembleMaster {
    pub fn new(state: MasterState) -> Self {
        Self { state }
    }

    pub fn router(self) -> Router {
        Router::new()
            .route("/ensemble/fit", post(ensemble::fit))
            .route("/ensemble/predict", post(ensemble::predict))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state)
    }
}

/// Synchronous parameter-server coordinator: exposes `/fit` and
/// `/predict`.
pub struct ParameterServerMaster {
    state: PsMasterState,
}

impl ParameterServerMaster {
    pub fn new(state: MasterState) -> Self {
        Self {
            state: PsMasterState::new(state),
        }
    }

    pub fn router(self) -> Router {
        Router::new()
            .route("/fit", post(parameter_server::fit))
            .route("/predict", post(parameter_server::predict))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state)
    }
}
