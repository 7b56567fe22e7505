//! Worker fleet topology and outbound-call policy.

use super::{validate_topology, ConfigError};

/// Immutable fleet topology, loaded once at startup (`spec.md` §3).
#[derive(Debug, Clone)]
pub struct WorkersConfig {
    /// Ordered, unique worker identifiers — also DNS names and container names.
    pub node_names: Vec<String>,
    /// Relative CPU scheduling weight per worker, each >= 2.
    pub cpu_shares: Vec<i64>,
    /// Host-side TCP port per worker, all distinct.
    pub mapped_ports: Vec<u16>,
    /// Bind address workers listen on inside their container.
    pub workers_host: String,
    /// Container-internal port the worker HTTP server binds.
    pub workers_port: u16,
    /// Outbound master -> worker call policy.
    pub endpoints: EndpointsConfig,
}

/// Outbound HTTP call policy for master -> worker requests.
#[derive(Debug, Clone, Copy)]
pub struct EndpointsConfig {
    pub max_retries: u32,
    pub timeout_secs: u64,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            timeout_secs: 30,
        }
    }
}

impl WorkersConfig {
    /// Load and validate the fleet topology from `CHIMERA_WORKERS_*` env vars.
    ///
    /// Fails fast with a single aggregate message on a length mismatch or
    /// an out-of-range CPU share (`spec.md` §4.1 Validation) — no container
    /// is created before this succeeds.
    pub fn from_env() -> Result<Self, ConfigError> {
        let node_names: Vec<String> = parse_json_list("CHIMERA_WORKERS_NODES_NAMES")?;
        let cpu_shares: Vec<i64> = parse_json_list("CHIMERA_WORKERS_CPU_SHARES")?;
        let mapped_ports: Vec<u16> = parse_json_list("CHIMERA_WORKERS_MAPPED_PORTS")?;

        let workers_host = std::env::var("CHIMERA_WORKERS_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string());
        let workers_port = std::env::var("CHIMERA_WORKERS_PORT")
            .ok()
            .map(|v| v.parse::<u16>())
            .transpose()
            .map_err(|e| ConfigError::InvalidValue {
                name: "CHIMERA_WORKERS_PORT",
                message: e.to_string(),
            })?
            .unwrap_or(80);

        let max_retries = std::env::var("CHIMERA_WORKERS_ENDPOINTS_MAX_RETRIES")
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|e| ConfigError::InvalidValue {
                name: "CHIMERA_WORKERS_ENDPOINTS_MAX_RETRIES",
                message: e.to_string(),
            })?
            .unwrap_or(3);
        let timeout_secs = std::env::var("CHIMERA_WORKERS_ENDPOINTS_TIMEOUT")
            .ok()
            .map(|v| v.parse::<u64>())
            .transpose()
            .map_err(|e| ConfigError::InvalidValue {
                name: "CHIMERA_WORKERS_ENDPOINTS_TIMEOUT",
                message: e.to_string(),
            })?
            .unwrap_or(30);

        let cfg = Self {
            node_names,
            cpu_shares,
            mapped_ports,
            workers_host,
            workers_port,
            endpoints: EndpointsConfig {
                max_retries,
                timeout_secs,
            },
        };

        validate_topology(&cfg.node_names, &cfg.cpu_shares, &cfg.mapped_ports)?;
        Ok(cfg)
    }

    /// Number of workers in the fleet.
    pub fn len(&self) -> usize {
        self.node_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_names.is_empty()
    }
}

fn parse_json_list<T: serde::de::DeserializeOwned>(name: &'static str) -> Result<Vec<T>, ConfigError> {
    let raw = std::env::var(name).map_err(|_| ConfigError::Missing(name))?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::InvalidJson { name, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_default_matches_spec_expectations() {
        let e = EndpointsConfig::default();
        assert_eq!(e.max_retries, 3);
        assert_eq!(e.timeout_secs, 30);
    }
}
