//! A single agent's state machine, memory, and metrics.

use crate::error::AgentError;
use crate::memory::AgentMemory;
use crate::state::{AgentCapability, AgentRole, AgentState, StateChange, is_valid_transition};
use conclave_protocol::id::AgentId;
use conclave_provider::ProviderMessage;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Default cap on `Agent::message_history` length, pruned on cleanup.
pub const MAX_HISTORY_ENTRIES: usize = 1000;

/// Default interval between heartbeat ticks for a running agent.
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Performance and health metrics for an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMetrics {
    /// Completed task count.
    pub tasks_completed: u64,
    /// Failed task count.
    pub tasks_failed: u64,
    /// Exponential moving average of cycle response time, in seconds.
    pub average_response_time: f64,
    /// Count of compliance violations attributed to this agent.
    pub constitutional_violations: u32,
    /// Health score in `[0.0, 1.0]`, recomputed on each heartbeat.
    pub health_score: f64,
}

impl Default for AgentMetrics {
    fn default() -> Self {
        Self {
            tasks_completed: 0,
            tasks_failed: 0,
            average_response_time: 0.0,
            constitutional_violations: 0,
            health_score: 1.0,
        }
    }
}

/// A point-in-time snapshot of an agent, suitable for status reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentStatus {
    /// The agent's ID.
    pub agent_id: AgentId,
    /// The agent's role.
    pub role: AgentRole,
    /// The agent's current state.
    pub current_state: AgentState,
    /// Capabilities granted to this agent.
    pub capabilities: Vec<AgentCapability>,
    /// Current metrics.
    pub metrics: AgentMetrics,
    /// Milliseconds since the agent was created.
    pub uptime_ms: u64,
    /// Whether the agent has zero recorded compliance violations.
    pub constitutional_compliant: bool,
}

/// A single agent: its state machine, memory, message history, and metrics.
pub struct Agent {
    /// The agent's unique ID.
    pub id: AgentId,
    /// The agent's role.
    pub role: AgentRole,
    /// Current state.
    pub current_state: AgentState,
    /// State prior to the current one.
    pub previous_state: AgentState,
    /// Log of every state transition taken so far.
    pub state_history: Vec<StateChange>,
    /// Capabilities granted to this agent.
    pub capabilities: HashSet<AgentCapability>,
    /// The agent's working memory.
    pub memory: AgentMemory,
    /// Accumulated conversation history sent to the provider on each cycle.
    pub message_history: Vec<ProviderMessage>,
    /// Performance and health metrics.
    pub metrics: AgentMetrics,
    /// Cap on episodic memory entries (data minimization).
    pub max_memory_items: usize,
    created_at: Instant,
    last_activity: Instant,
    state_change_callbacks: Vec<Box<dyn Fn(&StateChange) + Send + Sync>>,
}

impl Agent {
    /// Create a new agent in [`AgentState::Idle`] with its role's
    /// default capability set.
    pub fn new(id: AgentId, role: AgentRole) -> Self {
        let now = Instant::now();
        Self {
            id,
            capabilities: role.default_capabilities().into_iter().collect(),
            role,
            current_state: AgentState::Idle,
            previous_state: AgentState::Idle,
            state_history: Vec::new(),
            memory: AgentMemory::default(),
            message_history: Vec::new(),
            metrics: AgentMetrics::default(),
            max_memory_items: 1000,
            created_at: now,
            last_activity: now,
            state_change_callbacks: Vec::new(),
        }
    }

    /// Register a hook to run after every future transition this agent
    /// records, including ones driven by the workflow manager. Hooks
    /// run synchronously, in registration order, after the transition
    /// has already been applied and appended to `state_history`.
    pub fn add_state_change_callback<F>(&mut self, callback: F)
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.state_change_callbacks.push(Box::new(callback));
    }

    /// Milliseconds elapsed since this agent was created.
    pub fn uptime_ms(&self) -> u64 {
        self.created_at.elapsed().as_millis() as u64
    }

    /// Milliseconds since the agent's last recorded activity.
    pub fn idle_ms(&self) -> u64 {
        self.last_activity.elapsed().as_millis() as u64
    }

    /// Attempt a state transition, validating against the transition
    /// table. A transition to the current state is always accepted as
    /// a no-op.
    pub fn transition(&mut self, new_state: AgentState) -> Result<(), AgentError> {
        if !is_valid_transition(self.current_state, new_state) {
            return Err(AgentError::InvalidTransition {
                from: self.current_state,
                to: new_state,
            });
        }

        let change = StateChange {
            from_state: self.current_state,
            to_state: new_state,
            at: self.uptime_ms(),
        };

        self.previous_state = self.current_state;
        self.current_state = new_state;
        self.state_history.push(change.clone());
        self.last_activity = Instant::now();

        tracing::debug!(
            agent = %self.id,
            from = ?self.previous_state,
            to = ?self.current_state,
            "agent state transition"
        );

        for callback in &self.state_change_callbacks {
            callback(&change);
        }

        Ok(())
    }

    /// Recompute [`AgentMetrics::health_score`] from the agent's current
    /// failure counts and state.
    pub fn update_health_score(&mut self) {
        let mut score = 1.0f64;

        if self.metrics.constitutional_violations > 0 {
            score -= (self.metrics.constitutional_violations as f64 * 0.1).min(0.5);
        }

        if self.metrics.tasks_failed > 0 {
            let attempted = self.metrics.tasks_completed + self.metrics.tasks_failed;
            let failure_rate = self.metrics.tasks_failed as f64 / attempted.max(1) as f64;
            score -= failure_rate.min(0.3);
        }

        if self.current_state == AgentState::Error {
            score -= 0.4;
        }

        self.metrics.health_score = score.clamp(0.0, 1.0);
    }

    /// Fold a new cycle's wall-clock duration into the running average
    /// response time via an exponential moving average (alpha = 0.1).
    pub fn record_response_time(&mut self, seconds: f64) {
        const ALPHA: f64 = 0.1;
        self.metrics.average_response_time = if self.metrics.average_response_time == 0.0 {
            seconds
        } else {
            ALPHA * seconds + (1.0 - ALPHA) * self.metrics.average_response_time
        };
    }

    /// Prune stale memory, respecting `max_memory_items`, and cap
    /// `message_history` at [`MAX_HISTORY_ENTRIES`] so it doesn't grow
    /// unboundedly across cycles.
    pub fn cleanup_memory(&mut self) {
        self.memory.prune(self.max_memory_items, self.uptime_ms());
        if self.message_history.len() > MAX_HISTORY_ENTRIES {
            let drop = self.message_history.len() - MAX_HISTORY_ENTRIES;
            self.message_history.drain(0..drop);
        }
    }

    /// A point-in-time status snapshot.
    pub fn status(&self) -> AgentStatus {
        AgentStatus {
            agent_id: self.id.clone(),
            role: self.role,
            current_state: self.current_state,
            capabilities: self.capabilities.iter().copied().collect(),
            metrics: self.metrics.clone(),
            uptime_ms: self.uptime_ms(),
            constitutional_compliant: self.metrics.constitutional_violations == 0,
        }
    }

    /// Run the startup transition sequence: `Idle -> Startup -> Idle`.
    /// Memory and metrics are already at their initial values from
    /// [`Agent::new`]; this just walks the agent through the same
    /// entry path every other startup takes, so its `state_history`
    /// shows one rather than starting mid-lifecycle.
    pub fn enter_startup(&mut self) -> Result<(), AgentError> {
        self.transition(AgentState::Startup)?;
        self.transition(AgentState::Idle)
    }

    /// Transition to [`AgentState::Shutdown`] and log a status snapshot
    /// in place of persisting one — there is no durable store behind
    /// this agent, so the structured log is the record of what it
    /// looked like at the moment it stopped. Best-effort: a shutdown
    /// from a state with no `Shutdown` edge in the transition table
    /// still gets logged, just without the state change.
    pub fn enter_shutdown(&mut self) -> AgentStatus {
        if let Err(error) = self.transition(AgentState::Shutdown) {
            tracing::warn!(agent = %self.id, %error, "could not transition to shutdown");
        }
        let snapshot = self.status();
        tracing::info!(agent = %self.id, status = ?snapshot, "agent state snapshot at shutdown");
        snapshot
    }

    /// Spawn this agent's heartbeat task: on each tick, independent of
    /// whether a cycle has run, recompute the health score and prune
    /// stale memory/history. Returns the task handle so the caller can
    /// cancel it when the agent is removed.
    pub fn spawn_heartbeat(
        handle: &Arc<Mutex<Self>>,
        interval: Duration,
    ) -> tokio::task::JoinHandle<()> {
        let handle = Arc::clone(handle);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // first tick fires immediately, skip it
            loop {
                ticker.tick().await;
                let mut agent = handle.lock().await;
                agent.update_health_score();
                agent.cleanup_memory();
            }
        })
    }
}
