//! Agent roles, states, and the state transition table.

use serde::{Deserialize, Serialize};

/// An agent's role in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// The user-linked primary agent.
    Admin,
    /// A project-manager agent coordinating a team of workers.
    Pm,
    /// A specialized execution agent.
    Worker,
    /// The compliance-monitoring agent.
    Guardian,
}

/// A capability an agent can be granted, driving what a prompt and
/// tool surface are assembled for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentCapability {
    /// Can generate free-form text.
    TextGeneration,
    /// Can hold a natural-language conversation.
    Conversation,
    /// Can plan and break down tasks.
    TaskPlanning,
    /// Can generate code.
    CodeGeneration,
    /// Can research and gather information.
    Research,
    /// Can monitor other agents or the system.
    Monitoring,
    /// Can coordinate work across agents.
    Coordination,
    /// Can review content for compliance.
    ComplianceCheck,
}

impl AgentRole {
    /// The default capability set granted to a freshly created agent
    /// of this role.
    pub fn default_capabilities(self) -> Vec<AgentCapability> {
        match self {
            AgentRole::Admin => vec![
                AgentCapability::Conversation,
                AgentCapability::TaskPlanning,
                AgentCapability::Coordination,
                AgentCapability::Monitoring,
            ],
            AgentRole::Pm => vec![
                AgentCapability::TaskPlanning,
                AgentCapability::Coordination,
                AgentCapability::Monitoring,
            ],
            AgentRole::Worker => vec![
                AgentCapability::TextGeneration,
                AgentCapability::Research,
                AgentCapability::CodeGeneration,
            ],
            AgentRole::Guardian => vec![
                AgentCapability::Monitoring,
                AgentCapability::ComplianceCheck,
            ],
        }
    }
}

/// An agent's position in its state machine.
///
/// States span the common lifecycle (`Idle`, `Startup`, `Shutdown`,
/// `Error`, `Processing`) and the role-specific working states used by
/// admin/PM/worker prompt assembly (`Planning`, `BuildTeamTasks`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    /// Not currently doing anything in particular.
    Idle,
    /// Agent is starting up.
    Startup,
    /// Admin agent drafting a plan from a user request.
    Planning,
    /// Admin agent holding a conversation with the user.
    Conversation,
    /// PM agent reviewing its plan and breaking it into tasks.
    BuildTeamTasks,
    /// PM agent assigning tasks to its worker agents.
    ActivateWorkers,
    /// PM agent monitoring and coordinating an in-progress project.
    Manage,
    /// PM agent idle after its project has completed.
    Standby,
    /// Worker agent executing an assigned task.
    Work,
    /// Worker agent idle after completing its task.
    Wait,
    /// Under maintenance (memory pruning, health recovery).
    Maintenance,
    /// Shutting down.
    Shutdown,
    /// In an error condition.
    Error,
    /// A cycle is currently running for this agent.
    Processing,
}

/// Valid transitions out of each state.
///
/// A transition from a state to itself is always valid (a no-op) and
/// is not listed explicitly here — checked separately by
/// [`is_valid_transition`].
fn valid_transitions(from: AgentState) -> &'static [AgentState] {
    use AgentState::*;
    match from {
        Idle => &[
            Startup,
            Planning,
            Conversation,
            Work,
            Maintenance,
            Shutdown,
            Processing,
            BuildTeamTasks,
            ActivateWorkers,
            Manage,
            Standby,
            Wait,
        ],
        // Processing is left however a cycle's outcome dictates — the
        // Cycle Handler privilege is only entering it (I2); once a cycle
        // decides the agent's next mode (state_change_requested, plan
        // hand-off, task breakdown, a timeout) it can land on any of the
        // normal operating states.
        Processing => &[
            Idle,
            Error,
            Planning,
            Conversation,
            Work,
            Wait,
            BuildTeamTasks,
            ActivateWorkers,
            Manage,
            Standby,
            Maintenance,
            Shutdown,
        ],
        Startup => &[Idle, Planning, BuildTeamTasks, Error],
        Planning => &[Idle, Conversation, Work, Maintenance, Error, Processing],
        Conversation => &[Idle, Planning, Work, Error, Processing],
        BuildTeamTasks => &[Idle, ActivateWorkers, Error, Processing],
        ActivateWorkers => &[Idle, Manage, Error, Processing],
        Manage => &[Idle, Standby, Error, Processing],
        Standby => &[Idle, Startup, Error],
        Work => &[Idle, Planning, Conversation, Wait, Maintenance, Error, Processing],
        Wait => &[Idle, Work, Error],
        Maintenance => &[Idle, Shutdown, Error],
        Shutdown => &[Startup],
        Error => &[Idle, Maintenance, Shutdown],
    }
}

/// Whether a transition from `from` to `to` is allowed.
///
/// A state transitioning to itself is always valid — it's a no-op that
/// records a state-history entry without changing behavior.
pub fn is_valid_transition(from: AgentState, to: AgentState) -> bool {
    from == to || valid_transitions(from).contains(&to)
}

/// A recorded state change, kept for audit and debugging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateChange {
    /// The state before the transition.
    pub from_state: AgentState,
    /// The state after the transition.
    pub to_state: AgentState,
    /// Milliseconds since the agent was created.
    pub at: u64,
}
