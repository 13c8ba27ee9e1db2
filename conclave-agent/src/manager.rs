//! The agent roster: creation, removal, lookup, and cycle scheduling.

use crate::agent::{Agent, AgentStatus, DEFAULT_HEARTBEAT_INTERVAL};
use crate::error::AgentManagerError;
use crate::state::{AgentCapability, AgentRole, AgentState};
use async_trait::async_trait;
use conclave_protocol::id::AgentId;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// An agent's shared handle plus the background tasks the manager owns
/// on its behalf. Kept separate from [`Agent`] itself since only the
/// manager — not the agent — knows about its own heartbeat task.
struct AgentRecord {
    handle: Arc<Mutex<Agent>>,
    heartbeat: tokio::task::JoinHandle<()>,
}

/// Something that can run one agent cycle to completion.
///
/// Implemented by the cycle runtime. The agent manager depends only on
/// this narrow interface so it never needs to know how a cycle is
/// actually executed — it just schedules one and gets out of the way.
#[async_trait]
pub trait CycleRunner: Send + Sync {
    /// Run a single cycle for the given agent.
    async fn run_cycle(&self, agent: Arc<Mutex<Agent>>);
}

/// Aggregate statistics across the roster.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ManagerStats {
    /// Total agents created over the manager's lifetime.
    pub total_agents_created: u64,
    /// Agents currently registered.
    pub active_agents: usize,
    /// Total cycles scheduled over the manager's lifetime.
    pub total_cycles_run: u64,
    /// Mean health score across all registered agents.
    pub average_health_score: f64,
    /// Count of agents per state.
    pub agent_states: HashMap<AgentState, usize>,
    /// Sum of constitutional violations across all agents.
    pub total_constitutional_violations: u32,
}

/// Central roster of agents for a runtime instance.
///
/// Mirrors the read/write asymmetry of `conclave_protocol::StateStore`:
/// agents are stored behind a per-agent mutex so a cycle in progress
/// serializes access without blocking lookups of other agents.
pub struct AgentManager {
    agents: RwLock<HashMap<AgentId, AgentRecord>>,
    agent_counter: std::sync::atomic::AtomicU64,
    max_agents: usize,
    cycle_runner: Arc<dyn CycleRunner>,
    stats: Mutex<(u64, u64)>, // (total_created, total_cycles_run)
    heartbeat_interval: Duration,
}

impl AgentManager {
    /// Create a new roster backed by the given cycle runner, capped at
    /// `max_agents` concurrently registered agents.
    pub fn new(cycle_runner: Arc<dyn CycleRunner>, max_agents: usize) -> Self {
        Self {
            agents: RwLock::new(HashMap::new()),
            agent_counter: std::sync::atomic::AtomicU64::new(0),
            max_agents,
            cycle_runner,
            stats: Mutex::new((0, 0)),
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
        }
    }

    /// Override the interval between heartbeat ticks (default 30s).
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    /// Create and register a new agent, returning its ID.
    ///
    /// Fails if the roster is already at `max_agents`.
    pub async fn create_agent(
        &self,
        role: AgentRole,
        extra_capabilities: &[AgentCapability],
    ) -> Result<AgentId, AgentManagerError> {
        let mut agents = self.agents.write().await;
        if agents.len() >= self.max_agents {
            return Err(AgentManagerError::LimitExceeded {
                current: agents.len(),
                max: self.max_agents,
            });
        }

        let seq = self
            .agent_counter
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
            + 1;
        let role_tag = match role {
            AgentRole::Admin => "admin",
            AgentRole::Pm => "pm",
            AgentRole::Worker => "worker",
            AgentRole::Guardian => "guardian",
        };
        let suffix = Uuid::new_v4().simple().to_string();
        let id = AgentId::new(format!("agent_{role_tag}_{seq:03}_{}", &suffix[..8]));

        let mut agent = Agent::new(id.clone(), role);
        agent.capabilities.extend(extra_capabilities.iter().copied());
        if let Err(error) = agent.enter_startup() {
            tracing::warn!(agent = %id, %error, "agent startup transition rejected");
        }

        let handle = Arc::new(Mutex::new(agent));
        let heartbeat = Agent::spawn_heartbeat(&handle, self.heartbeat_interval);
        agents.insert(id.clone(), AgentRecord { handle, heartbeat });

        let mut stats = self.stats.lock().await;
        stats.0 += 1;

        tracing::info!(agent = %id, role = ?role, "agent created");
        Ok(id)
    }

    /// Remove an agent from the roster: cancels its heartbeat task,
    /// transitions it to [`AgentState::Shutdown`] and logs a status
    /// snapshot, then drops it from the registry.
    pub async fn remove_agent(&self, id: &AgentId) -> Result<(), AgentManagerError> {
        let mut agents = self.agents.write().await;
        let Some(record) = agents.remove(id) else {
            return Err(AgentManagerError::NotFound(id.to_string()));
        };
        drop(agents);

        record.heartbeat.abort();
        record.handle.lock().await.enter_shutdown();

        tracing::info!(agent = %id, "agent removed");
        Ok(())
    }

    /// Look up an agent handle by ID.
    pub async fn get_agent(&self, id: &AgentId) -> Option<Arc<Mutex<Agent>>> {
        self.agents.read().await.get(id).map(|record| Arc::clone(&record.handle))
    }

    /// All agents with the given role.
    pub async fn agents_by_role(&self, role: AgentRole) -> Vec<Arc<Mutex<Agent>>> {
        let agents = self.agents.read().await;
        let mut matching = Vec::new();
        for record in agents.values() {
            if record.handle.lock().await.role == role {
                matching.push(Arc::clone(&record.handle));
            }
        }
        matching
    }

    /// Every agent currently registered.
    pub async fn all_agents(&self) -> Vec<Arc<Mutex<Agent>>> {
        self.agents
            .read()
            .await
            .values()
            .map(|record| Arc::clone(&record.handle))
            .collect()
    }

    /// Schedule a cycle for the given agent, unless one is already
    /// running (`AgentState::Processing`). Spawns the cycle as a
    /// background task and returns immediately.
    pub async fn schedule_cycle(&self, id: &AgentId) -> Result<(), AgentManagerError> {
        let handle = self
            .get_agent(id)
            .await
            .ok_or_else(|| AgentManagerError::NotFound(id.to_string()))?;

        let already_processing = handle.lock().await.current_state == AgentState::Processing;
        if already_processing {
            tracing::warn!(agent = %id, "agent already processing, cycle not scheduled");
            return Ok(());
        }

        let mut stats = self.stats.lock().await;
        stats.1 += 1;
        drop(stats);

        tracing::info!(agent = %id, "scheduling cycle");
        let runner = Arc::clone(&self.cycle_runner);
        tokio::spawn(async move {
            runner.run_cycle(handle).await;
        });
        Ok(())
    }

    /// Aggregate statistics across the roster.
    pub async fn stats(&self) -> ManagerStats {
        let agents = self.agents.read().await;
        let mut agent_states: HashMap<AgentState, usize> = HashMap::new();
        let mut total_violations = 0u32;
        let mut health_sum = 0.0f64;

        for record in agents.values() {
            let agent = record.handle.lock().await;
            *agent_states.entry(agent.current_state).or_insert(0) += 1;
            total_violations += agent.metrics.constitutional_violations;
            health_sum += agent.metrics.health_score;
        }

        let count = agents.len();
        let (total_created, total_cycles_run) = *self.stats.lock().await;

        ManagerStats {
            total_agents_created: total_created,
            active_agents: count,
            total_cycles_run,
            average_health_score: if count == 0 {
                0.0
            } else {
                health_sum / count as f64
            },
            agent_states,
            total_constitutional_violations: total_violations,
        }
    }

    /// Snapshot a single agent's status.
    pub async fn agent_status(&self, id: &AgentId) -> Option<AgentStatus> {
        let handle = self.get_agent(id).await?;
        Some(handle.lock().await.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopRunner;

    #[async_trait]
    impl CycleRunner for NoopRunner {
        async fn run_cycle(&self, agent: Arc<Mutex<Agent>>) {
            let mut agent = agent.lock().await;
            let _ = agent.transition(AgentState::Processing);
            let _ = agent.transition(AgentState::Idle);
        }
    }

    #[tokio::test]
    async fn create_and_lookup_agent() {
        let manager = AgentManager::new(Arc::new(NoopRunner), 10);
        let id = manager.create_agent(AgentRole::Worker, &[]).await.unwrap();
        assert!(manager.get_agent(&id).await.is_some());
        assert!(id.as_str().starts_with("agent_worker_"));
    }

    #[tokio::test]
    async fn create_agent_respects_max_agents() {
        let manager = AgentManager::new(Arc::new(NoopRunner), 1);
        manager.create_agent(AgentRole::Worker, &[]).await.unwrap();
        let result = manager.create_agent(AgentRole::Worker, &[]).await;
        assert!(matches!(
            result,
            Err(AgentManagerError::LimitExceeded { .. })
        ));
    }

    #[tokio::test]
    async fn remove_unknown_agent_errors() {
        let manager = AgentManager::new(Arc::new(NoopRunner), 10);
        let result = manager.remove_agent(&AgentId::new("nope")).await;
        assert!(matches!(result, Err(AgentManagerError::NotFound(_))));
    }

    #[tokio::test]
    async fn schedule_cycle_runs_and_returns_to_idle() {
        let manager = AgentManager::new(Arc::new(NoopRunner), 10);
        let id = manager.create_agent(AgentRole::Admin, &[]).await.unwrap();
        manager.schedule_cycle(&id).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        let status = manager.agent_status(&id).await.unwrap();
        assert_eq!(status.current_state, AgentState::Idle);
    }

    #[tokio::test]
    async fn schedule_cycle_skips_while_processing() {
        let manager = AgentManager::new(Arc::new(NoopRunner), 10);
        let id = manager.create_agent(AgentRole::Worker, &[]).await.unwrap();
        {
            let handle = manager.get_agent(&id).await.unwrap();
            handle.lock().await.transition(AgentState::Processing).unwrap();
        }
        manager.schedule_cycle(&id).await.unwrap();
        let stats = manager.stats().await;
        assert_eq!(stats.total_cycles_run, 0);
    }

    #[tokio::test]
    async fn create_agent_runs_startup_sequence() {
        let manager = AgentManager::new(Arc::new(NoopRunner), 10);
        let id = manager.create_agent(AgentRole::Worker, &[]).await.unwrap();
        let handle = manager.get_agent(&id).await.unwrap();
        let agent = handle.lock().await;
        assert_eq!(agent.current_state, AgentState::Idle);
        assert_eq!(agent.state_history.len(), 2);
    }

    #[tokio::test]
    async fn remove_agent_cancels_heartbeat_and_shuts_down() {
        let manager = AgentManager::new(Arc::new(NoopRunner), 10).with_heartbeat_interval(Duration::from_millis(5));
        let id = manager.create_agent(AgentRole::Worker, &[]).await.unwrap();
        let handle = manager.get_agent(&id).await.unwrap();

        manager.remove_agent(&id).await.unwrap();
        assert!(manager.get_agent(&id).await.is_none());
        assert_eq!(handle.lock().await.current_state, AgentState::Shutdown);

        // Heartbeat was aborted: sleeping past several intervals must
        // not panic or resurrect the agent's health score.
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
