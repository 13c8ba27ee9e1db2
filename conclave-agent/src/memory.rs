//! An agent's narrow, in-process memory.
//!
//! This is deliberately not a persistent or vector-backed store — just
//! the short-term/episodic/semantic maps an agent keeps for the
//! duration of a process, pruned on a schedule for data minimization.
//! Durable cross-session memory goes through `conclave_protocol::StateStore`
//! instead.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A short-term memory entry with the timestamp it was written, used
/// to expire entries after an hour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortTermEntry {
    /// The stored value.
    pub value: serde_json::Value,
    /// Milliseconds since the agent was created, at write time.
    pub written_at: u64,
}

/// An agent's working memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentMemory {
    /// Recent, time-boxed key/value state.
    pub short_term: HashMap<String, ShortTermEntry>,
    /// An append-only log of notable events.
    pub episodic: Vec<serde_json::Value>,
    /// Longer-lived facts not tied to a single event.
    pub semantic: HashMap<String, serde_json::Value>,
    /// Compliance tracking: recorded violations and a running score.
    pub constitutional: HashMap<String, serde_json::Value>,
}

const SHORT_TERM_TTL_MS: u64 = 3_600_000;

impl AgentMemory {
    /// Drop episodic entries beyond `max_items`, keeping the most
    /// recent, and expire short-term entries older than one hour.
    pub fn prune(&mut self, max_items: usize, now_ms: u64) {
        if self.episodic.len() > max_items {
            let drop = self.episodic.len() - max_items;
            self.episodic.drain(0..drop);
        }

        self.short_term
            .retain(|_, entry| now_ms.saturating_sub(entry.written_at) <= SHORT_TERM_TTL_MS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prune_trims_episodic_to_cap() {
        let mut mem = AgentMemory::default();
        for i in 0..5 {
            mem.episodic.push(json!({ "i": i }));
        }
        mem.prune(3, 0);
        assert_eq!(mem.episodic.len(), 3);
        assert_eq!(mem.episodic[0]["i"], 2);
    }

    #[test]
    fn prune_expires_stale_short_term_entries() {
        let mut mem = AgentMemory::default();
        mem.short_term.insert(
            "fresh".into(),
            ShortTermEntry {
                value: json!(1),
                written_at: 9_000_000,
            },
        );
        mem.short_term.insert(
            "stale".into(),
            ShortTermEntry {
                value: json!(2),
                written_at: 0,
            },
        );
        mem.prune(1000, 9_000_000);
        assert!(mem.short_term.contains_key("fresh"));
        assert!(!mem.short_term.contains_key("stale"));
    }
}
