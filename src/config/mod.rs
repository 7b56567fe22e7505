//! Fleet topology and endpoint-policy configuration, loaded from
//! `CHIMERA_*` environment variables.
//!
//! ## Loading
//!
//! Call [`WorkersConfig::from_env`] once at process start. A malformed or
//! inconsistent topology aborts startup before any container is created
//! (`spec.md` §3 "Topology error ⇒ startup aborts before any container is
//! created").

mod network;
mod validation;
mod workers;

pub use network::NetworkConfig;
pub use validation::validate_topology;
pub use workers::{EndpointsConfig, WorkersConfig};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("failed to parse {name} as JSON list: {source}")]
    InvalidJson {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse {name}: {message}")]
    InvalidValue { name: &'static str, message: String },

    #[error("{0}")]
    Topology(String),
}
