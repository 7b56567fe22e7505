//! Top-level coordination-strategy registry (`spec.md` §4.7).
//!
//! A master process picks one of two strategies at startup —
//! `aggregation` (bagging ensemble) or `parameter_server` (synchronous
//! SGD) — bootstraps the fleet, then serves that strategy's HTTP
//! surface for the lifetime of the process.

use std::net::SocketAddr;

use anyhow::{bail, Context, Result};

use crate::config::{NetworkConfig, WorkersConfig};
use crate::http_client::WorkerClient;
use crate::master::{EnsembleMaster, MasterState, ParameterServerMaster};
use crate::orchestrator::ContainerOrchestrator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Aggregation,
    ParameterServer,
}

impl Strategy {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "aggregation" => Ok(Strategy::Aggregation),
            "parameter_server" => Ok(Strategy::ParameterServer),
            other => bail!("unknown coordination strategy {other:?}; expected \"aggregation\" or \"parameter_server\""),
        }
    }
}

pub struct Chimera {
    strategy: Strategy,
    workers: WorkersConfig,
    network: NetworkConfig,
    worker_image: String,
}

impl Chimera {
    pub fn new(strategy: Strategy, workers: WorkersConfig, network: NetworkConfig, worker_image: String) -> Self {
        Self {
            strategy,
            workers,
            network,
            worker_image,
        }
    }

    /// Bootstrap the worker fleet, then serve this strategy's router
    /// on `port` until the process is killed.
    pub async fn serve(self, port: u16) -> Result<()> {
        let orchestrator = ContainerOrchestrator::new(
            self.network.clone(),
            self.workers.clone(),
            self.worker_image.clone(),
        );
        orchestrator
            .bootstrap()
            .await
            .context("failed to bring up the worker fleet")?;

        let client = WorkerClient::new(self.workers.endpoints).context("failed to build worker HTTP client")?;
        let master_state = MasterState::new(self.workers, client);

        let router = match self.strategy {
            Strategy::Aggregation => EnsembleMaster::new(master_state).router(),
            Strategy::ParameterServer => ParameterServerMaster::new(master_state).router(),
        };

        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        tracing::info!(%addr, strategy = ?self.strategy, "chimera master listening");
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        axum::serve(listener, router)
            .await
            .context("master server exited")?;
        Ok(())
    }
}
