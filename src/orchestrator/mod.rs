//! `ContainerOrchestrator`: stands up the worker fleet as Docker
//! containers on a private bridge network by shelling out to the
//! `docker` CLI (`spec.md` §4.1).
//!
//! No Docker Engine API crate is used — the fleet's own container
//! tooling drives `docker` as a subprocess, and this follows the same
//! approach rather than adding a new client dependency for it.

use tokio::process::Command;

use crate::config::{NetworkConfig, WorkersConfig};
use crate::error::AppError;

pub struct ContainerOrchestrator {
    network: NetworkConfig,
    workers: WorkersConfig,
    image: String,
}

impl ContainerOrchestrator {
    pub fn new(network: NetworkConfig, workers: WorkersConfig, image: String) -> Self {
        Self {
            network,
            workers,
            image,
        }
    }

    /// Bring the fleet up: create the bridge network if it doesn't
    /// already exist, then start any worker container that isn't
    /// already running. Idempotent — re-running against an already-up
    /// fleet is a no-op (`spec.md` §4.1: "safe to re-run against an
    /// already-up fleet").
    pub async fn bootstrap(&self) -> Result<(), AppError> {
        self.ensure_network().await?;
        for i in 0..self.workers.len() {
            self.ensure_worker(i).await?;
        }
        Ok(())
    }

    async fn ensure_network(&self) -> Result<(), AppError> {
        let inspect = Command::new("docker")
            .args(["network", "inspect", &self.network.network_name])
            .output()
            .await?;
        if inspect.status.success() {
            tracing::info!(network = %self.network.network_name, "bridge network already exists");
            return Ok(());
        }

        let create = Command::new("docker")
            .args([
                "network",
                "create",
                "--driver",
                "bridge",
                "--subnet",
                &self.network.subnet(),
                "--gateway",
                &self.network.gateway(),
                &self.network.network_name,
            ])
            .output()
            .await?;
        if !create.status.success() {
            return Err(AppError::Other(format!(
                "failed to create bridge network {}: {}",
                self.network.network_name,
                String::from_utf8_lossy(&create.stderr)
            )));
        }
        tracing::info!(network = %self.network.network_name, "created bridge network");
        Ok(())
    }

    async fn worker_running(&self, name: &str) -> Result<bool, AppError> {
        let out = Command::new("docker")
            .args(["ps", "--filter", &format!("name=^{name}$"), "--format", "{{.Names}}"])
            .output()
            .await?;
        Ok(String::from_utf8_lossy(&out.stdout).trim() == name)
    }

    async fn ensure_worker(&self, i: usize) -> Result<(), AppError> {
        let name = &self.workers.node_names[i];
        if self.worker_running(name).await? {
            tracing::info!(worker = %name, "container already running");
            return Ok(());
        }

        let ip = self.network.worker_ip(i);
        let cpu_shares = self.workers.cpu_shares[i].to_string();
        let port_mapping = format!("{}:{}", self.workers.mapped_ports[i], self.workers.workers_port);

        let run = Command::new("docker")
            .args([
                "run",
                "-d",
                "--name",
                name,
                "--hostname",
                name,
                "--network",
                &self.network.network_name,
                "--ip",
                &ip,
                "--cpu-shares",
                &cpu_shares,
                "-p",
                &port_mapping,
                &self.image,
            ])
            .output()
            .await?;
        if !run.status.success() {
            return Err(AppError::Other(format!(
                "failed to start container {name}: {}",
                String::from_utf8_lossy(&run.stderr)
            )));
        }
        tracing::info!(worker = %name, ip, "started worker container");
        Ok(())
    }
}
