#![deny(missing_docs)]
//! Configuration, logging setup, and the top-level driver loop that wires
//! the conclave crates into a runnable system.
//!
//! This crate owns no orchestration logic of its own — [`conclave_agent`]
//! and [`conclave_cycle`] already do that — it only assembles them behind
//! a single [`RuntimeConfig`] and exposes [`run`] as the entry point a
//! binary (or an embedding application) calls into.

mod config;
mod demo_provider;

pub use config::RuntimeConfig;
pub use demo_provider::EchoProvider;

use conclave_agent::{AgentManager, AgentRole, AgentState};
use conclave_cycle::CycleEngine;
use conclave_guardian::Guardian;
use conclave_protocol::id::AgentId;
use conclave_provider::Provider;
use conclave_tool::ToolRegistry;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors raised assembling or driving the runtime.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The agent roster rejected an operation.
    #[error(transparent)]
    Manager(#[from] conclave_agent::AgentManagerError),

    /// The initial agent never left `Processing`: its cycle hung past
    /// `cycle_timeout_s`.
    #[error("agent {0} did not complete a cycle within the configured timeout")]
    CycleTimedOut(AgentId),
}

/// Install a `tracing_subscriber::fmt` subscriber, honoring `RUST_LOG`
/// if set and falling back to `config.log_level` otherwise.
pub fn init_tracing(config: &RuntimeConfig) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Assemble a runtime from `config` and `provider`, create an Admin
/// agent, hand it `initial_message`, and drive it through one cycle.
///
/// Returns once the Admin agent leaves `Processing` (landing in `Idle`
/// or `Error`) or `config.cycle_timeout_s` elapses, whichever comes
/// first. Spawns a background sweep that logs guardian hot spots every
/// `config.monitoring_interval_ms`; the sweep runs for the lifetime of
/// the returned `AgentManager` and is not awaited here — callers that
/// want a clean shutdown should drop the returned manager once they're
/// done driving cycles through it.
pub async fn run<P>(
    config: RuntimeConfig,
    provider: P,
    initial_message: &str,
) -> Result<Arc<AgentManager>, RuntimeError>
where
    P: Provider + Send + Sync + 'static,
{
    config.validate().map_err(RuntimeError::Config)?;

    let guardian = Arc::new(Mutex::new(Guardian::new()));
    let manager = Arc::new_cyclic(|weak| {
        let engine = Arc::new(
            CycleEngine::new(provider, ToolRegistry::new(), weak.clone(), Arc::clone(&guardian))
                .with_max_turns_per_cycle(config.max_turns_per_cycle),
        );
        AgentManager::new(engine, config.max_agents)
    });

    spawn_hot_spot_sweep(Arc::clone(&guardian), config.monitoring_interval_ms);

    let admin_id = manager.create_agent(AgentRole::Admin, &[]).await?;
    {
        let handle = manager
            .get_agent(&admin_id)
            .await
            .expect("just-created agent must be in the roster");
        let mut agent = handle.lock().await;
        agent
            .message_history
            .push(conclave_provider::ProviderMessage {
                role: conclave_provider::Role::User,
                content: vec![conclave_provider::ContentPart::Text {
                    text: initial_message.to_string(),
                }],
            });
    }

    manager.schedule_cycle(&admin_id).await?;
    wait_for_cycle_to_land(&manager, &admin_id, config.cycle_timeout_s).await?;

    Ok(manager)
}

async fn wait_for_cycle_to_land(
    manager: &AgentManager,
    agent_id: &AgentId,
    timeout_s: u64,
) -> Result<(), RuntimeError> {
    let deadline = Duration::from_secs(timeout_s);
    let poll = Duration::from_millis(20);
    let mut waited = Duration::ZERO;

    loop {
        let status = manager
            .agent_status(agent_id)
            .await
            .expect("agent created just above still exists");
        if matches!(status.current_state, AgentState::Idle | AgentState::Error) {
            return Ok(());
        }
        if waited >= deadline {
            return Err(RuntimeError::CycleTimedOut(agent_id.clone()));
        }
        tokio::time::sleep(poll).await;
        waited += poll;
    }
}

fn spawn_hot_spot_sweep(guardian: Arc<Mutex<Guardian>>, interval_ms: u64) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms));
        loop {
            ticker.tick().await;
            let hot_spots = guardian.lock().await.detect_hot_spots();
            for hot_spot in hot_spots {
                tracing::warn!(?hot_spot, "guardian hot spot detected");
            }
        }
    });
}
