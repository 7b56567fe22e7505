//! Fleet topology validation (`spec.md` §4.1 "Validation").
//!
//! Fails fast with a single aggregate message so a caller never ends up
//! creating containers for a half-valid topology.

use super::ConfigError;

/// Minimum allowed CPU share — a relative scheduling weight, not a hard
/// quota (`spec.md` §3 Invariant: each `cpuShares[i]` >= 2).
pub const MIN_CPU_SHARE: i64 = 2;

/// Validate that `node_names`, `cpu_shares`, and `mapped_ports` agree in
/// length and that every CPU share is an integer >= [`MIN_CPU_SHARE`].
pub fn validate_topology(
    node_names: &[String],
    cpu_shares: &[i64],
    mapped_ports: &[u16],
) -> Result<(), ConfigError> {
    if node_names.len() != cpu_shares.len() || node_names.len() != mapped_ports.len() {
        return Err(ConfigError::Topology(
            "Number of nodes, number of hosts names and CPU relative weights must be equal"
                .to_string(),
        ));
    }

    if cpu_shares.iter().any(|&shares| shares < MIN_CPU_SHARE) {
        return Err(ConfigError::Topology(format!(
            "All CPU_SHARES values must be integers and greater than or equal to {MIN_CPU_SHARE}."
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Property 8: topology with mismatched lengths must fail before any
    /// container is started.
    #[test]
    fn rejects_length_mismatch() {
        let names = vec!["a".to_string(), "b".to_string()];
        let cpu = vec![2];
        let ports = vec![81, 82];
        assert!(validate_topology(&names, &cpu, &ports).is_err());
    }

    /// Property 9: cpu_shares = [1, 2] must fail validation.
    #[test]
    fn rejects_cpu_share_below_minimum() {
        let names = vec!["a".to_string(), "b".to_string()];
        let cpu = vec![1, 2];
        let ports = vec![81, 82];
        assert!(validate_topology(&names, &cpu, &ports).is_err());
    }

    #[test]
    fn accepts_valid_topology() {
        let names = vec!["a".to_string(), "b".to_string()];
        let cpu = vec![2, 4];
        let ports = vec![81, 82];
        assert!(validate_topology(&names, &cpu, &ports).is_ok());
    }
}
