//! Errors for agent state management and the agent roster.

use crate::state::AgentState;
use thiserror::Error;

/// Errors raised while managing an agent's state machine.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AgentError {
    /// The requested state transition isn't in the valid-transitions table.
    #[error("invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        /// The state the agent was in.
        from: AgentState,
        /// The state the transition targeted.
        to: AgentState,
    },
}

/// Errors raised by the agent roster (create/remove/schedule).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AgentManagerError {
    /// The roster is at `max_agents` capacity.
    #[error("agent limit exceeded: {current} of {max} allowed")]
    LimitExceeded {
        /// Agents currently registered.
        current: usize,
        /// The configured maximum.
        max: usize,
    },

    /// No agent with that ID is registered.
    #[error("agent not found: {0}")]
    NotFound(String),

    /// The agent's own state machine rejected a transition during startup.
    #[error(transparent)]
    Agent(#[from] AgentError),
}
