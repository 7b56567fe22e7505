//! Shared master state: the worker fleet's base URLs and the HTTP
//! client used to reach them.

use std::sync::Arc;

use crate::config::WorkersConfig;
use crate::http_client::WorkerClient;

#[derive(Clone)]
pub struct MasterState {
    worker_urls: Arc<Vec<String>>,
    pub client: Arc<WorkerClient>,
}

impl MasterState {
    /// Build from a loaded fleet topology — each worker's base URL is
    /// its DNS name on the bridge network plus the shared internal
    /// worker port (`spec.md` §3).
    pub fn new(workers: WorkersConfig, client: WorkerClient) -> Self {
        let worker_urls = workers
            .node_names
            .iter()
            .map(|name| format!("http://{name}:{}", workers.workers_port))
            .collect();
        Self {
            worker_urls: Arc::new(worker_urls),
            client: Arc::new(client),
        }
    }

    /// Build directly from explicit worker base URLs (e.g.
    /// `http://127.0.0.1:9001`) — used by tests that run workers as
    /// loopback servers instead of named containers.
    pub fn from_worker_urls(worker_urls: Vec<String>, client: WorkerClient) -> Self {
        Self {
            worker_urls: Arc::new(worker_urls),
            client: Arc::new(client),
        }
    }

    pub fn worker_url(&self, i: usize, path: &str) -> String {
        format!("{}{}", self.worker_urls[i], path)
    }

    pub fn n_workers(&self) -> usize {
        self.worker_urls.len()
    }
}
