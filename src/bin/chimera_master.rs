//! `chimera-master`: bootstraps the worker fleet and serves either the
//! bagging-ensemble or parameter-server coordination surface.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use chimera::config::{NetworkConfig, WorkersConfig};
use chimera::{Chimera, Strategy};

#[derive(Debug, Parser)]
#[command(name = "chimera-master", about = "Chimera distributed training/inference master")]
struct Args {
    /// Coordination strategy: "aggregation" or "parameter_server".
    #[arg(long, env = "CHIMERA_STRATEGY")]
    strategy: String,

    /// Port the master HTTP server listens on.
    #[arg(long, env = "CHIMERA_MASTER_PORT", default_value_t = 8000)]
    port: u16,

    /// Docker image used to start worker containers.
    #[arg(long, env = "CHIMERA_WORKER_IMAGE", default_value = "chimera-worker:latest")]
    worker_image: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let strategy = Strategy::parse(&args.strategy)?;

    let workers = WorkersConfig::from_env().context("failed to load worker fleet topology")?;
    let network = NetworkConfig::from_env().context("failed to load bridge network configuration")?;

    tracing::info!(n_workers = workers.len(), strategy = %args.strategy, "starting chimera master");

    Chimera::new(strategy, workers, network, args.worker_image)
        .serve(args.port)
        .await
}
