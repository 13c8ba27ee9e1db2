//! Errors raised while driving a cycle.

use conclave_agent::AgentManagerError;
use conclave_workflow::WorkflowError;
use thiserror::Error;

/// Errors raised while driving a single agent cycle.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CycleError {
    /// The model provider call failed.
    #[error("provider call failed: {0}")]
    Provider(String),

    /// A workflow hand-off (plan, task list, state change) failed.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// The agent roster rejected an operation.
    #[error(transparent)]
    Manager(#[from] AgentManagerError),
}
