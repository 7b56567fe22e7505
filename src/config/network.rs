//! Bridge-network configuration for the container fleet.

use super::ConfigError;

/// `CHIMERA_NETWORK_*` settings: the private Docker bridge network the
/// worker fleet is attached to.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Bridge network name (default `chimera-network`).
    pub network_name: String,
    /// First three octets of the subnet, e.g. `192.168.10`.
    pub network_prefix: String,
    /// CIDR subnet mask bits, e.g. `23`.
    pub subnet_mask: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            network_name: "chimera-network".to_string(),
            network_prefix: "192.168.10".to_string(),
            subnet_mask: "23".to_string(),
        }
    }
}

impl NetworkConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        if let Ok(v) = std::env::var("CHIMERA_NETWORK_NAME") {
            cfg.network_name = v;
        }
        if let Ok(v) = std::env::var("CHIMERA_NETWORK_PREFIX") {
            cfg.network_prefix = v;
        }
        if let Ok(v) = std::env::var("CHIMERA_NETWORK_SUBNET_MASK") {
            cfg.subnet_mask = v;
        }
        Ok(cfg)
    }

    /// Subnet in `<prefix>.0/<mask>` CIDR form.
    pub fn subnet(&self) -> String {
        format!("{}.0/{}", self.network_prefix, self.subnet_mask)
    }

    /// Gateway address `<prefix>.1`.
    pub fn gateway(&self) -> String {
        format!("{}.1", self.network_prefix)
    }

    /// Container IP for worker index `i`: `<prefix>.(i+2)`.
    pub fn worker_ip(&self, i: usize) -> String {
        format!("{}.{}", self.network_prefix, i + 2)
    }
}
