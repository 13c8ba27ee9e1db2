//! Runtime configuration.
//!
//! Only the struct, its defaults, and validation live here — loading a
//! config from a file or environment is out of scope for this runtime;
//! an embedding application builds a `RuntimeConfig` itself (e.g. from
//! its own CLI flags) and hands it to [`crate::run`].

use serde::{Deserialize, Serialize};

/// Tunables for a single runtime instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Maximum number of agents the roster will register at once.
    pub max_agents: usize,
    /// Wall-clock budget for a single agent cycle to land in `Idle` or
    /// `Error`, in seconds.
    pub cycle_timeout_s: u64,
    /// Per-tool-call budget, in seconds. Not yet enforced by
    /// `conclave-interaction` (see its module docs); carried here so a
    /// future enforcement point has a config value to read.
    pub tool_timeout_s: u64,
    /// Maximum turns a single cycle will run before giving up.
    pub max_turns_per_cycle: u32,
    /// Cap on an agent's `message_history` length (see
    /// `conclave_agent::MAX_HISTORY_ENTRIES` for the compile-time
    /// default this should normally match).
    pub history_cap: usize,
    /// How often the guardian hot-spot sweep runs, in milliseconds.
    pub monitoring_interval_ms: u64,
    /// `tracing_subscriber` filter directive used when `RUST_LOG` isn't
    /// set.
    pub log_level: String,
    /// Placeholder for the REST facade's bind address. Unused: the
    /// HTTP/WS front-end is out of scope for this runtime.
    pub bind_addr: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_agents: conclave_agent::MAX_AGENTS,
            cycle_timeout_s: 120,
            tool_timeout_s: 30,
            max_turns_per_cycle: 6,
            history_cap: conclave_agent::MAX_HISTORY_ENTRIES,
            monitoring_interval_ms: 30_000,
            log_level: "info".to_string(),
            bind_addr: None,
        }
    }
}

impl RuntimeConfig {
    /// Check the configuration for values that would make the runtime
    /// unable to start, returning a human-readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_agents == 0 {
            return Err("max_agents must be at least 1".to_string());
        }
        if self.max_turns_per_cycle == 0 {
            return Err("max_turns_per_cycle must be at least 1".to_string());
        }
        if self.cycle_timeout_s == 0 {
            return Err("cycle_timeout_s must be at least 1".to_string());
        }
        Ok(())
    }
}
