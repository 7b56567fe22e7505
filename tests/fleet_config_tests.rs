//! Fleet topology loading from environment variables (`spec.md` §4.1,
//! §6, §8). Env vars are process-global, so every case lives in one
//! test function to avoid cross-test races.

use chimera::config::WorkersConfig;

const VARS: &[&str] = &[
    "CHIMERA_WORKERS_NODES_NAMES",
    "CHIMERA_WORKERS_CPU_SHARES",
    "CHIMERA_WORKERS_MAPPED_PORTS",
    "CHIMERA_WORKERS_HOST",
    "CHIMERA_WORKERS_PORT",
    "CHIMERA_WORKERS_ENDPOINTS_MAX_RETRIES",
    "CHIMERA_WORKERS_ENDPOINTS_TIMEOUT",
];

fn clear_env() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
fn fleet_topology_env_loading() {
    clear_env();

    // Missing required vars surfaces a Missing error, not a panic.
    assert!(WorkersConfig::from_env().is_err());

    // A valid topology loads with its defaults filled in.
    std::env::set_var("CHIMERA_WORKERS_NODES_NAMES", r#"["w0","w1","w2"]"#);
    std::env::set_var("CHIMERA_WORKERS_CPU_SHARES", "[2,2,4]");
    std::env::set_var("CHIMERA_WORKERS_MAPPED_PORTS", "[8081,8082,8083]");
    let cfg = WorkersConfig::from_env().expect("valid topology should load");
    assert_eq!(cfg.len(), 3);
    assert_eq!(cfg.workers_port, 80);
    assert_eq!(cfg.endpoints.max_retries, 3);
    assert_eq!(cfg.endpoints.timeout_secs, 30);

    // A length mismatch across the three lists fails validation.
    std::env::set_var("CHIMERA_WORKERS_CPU_SHARES", "[2,2]");
    assert!(WorkersConfig::from_env().is_err());

    // A CPU share below the minimum fails validation.
    std::env::set_var("CHIMERA_WORKERS_CPU_SHARES", "[1,2,2]");
    assert!(WorkersConfig::from_env().is_err());

    // Overriding the endpoint policy is honored.
    std::env::set_var("CHIMERA_WORKERS_CPU_SHARES", "[2,2,4]");
    std::env::set_var("CHIMERA_WORKERS_ENDPOINTS_MAX_RETRIES", "5");
    std::env::set_var("CHIMERA_WORKERS_ENDPOINTS_TIMEOUT", "10");
    let cfg = WorkersConfig::from_env().expect("valid topology should load");
    assert_eq!(cfg.endpoints.max_retries, 5);
    assert_eq!(cfg.endpoints.timeout_secs, 10);

    // Comma-separated lists (not JSON) are rejected — the contract is
    // JSON array syntax, matching `spec.md` §6.
    std::env::set_var("CHIMERA_WORKERS_NODES_NAMES", "w0,w1,w2");
    assert!(WorkersConfig::from_env().is_err());

    clear_env();
}
