#![deny(missing_docs)]
//! # conclave — umbrella crate
//!
//! A single import surface for the local-first multi-agent orchestration
//! runtime. Re-exports the `conclave-*` component crates behind feature
//! flags, plus a [`prelude`] for the common happy-path imports.

#[cfg(feature = "core")]
pub use conclave_parser;
#[cfg(feature = "core")]
pub use conclave_prompt;
#[cfg(feature = "core")]
pub use conclave_protocol;
#[cfg(feature = "core")]
pub use conclave_provider;
#[cfg(feature = "core")]
pub use conclave_tool;

#[cfg(feature = "hooks")]
pub use conclave_hooks;

#[cfg(feature = "state-memory")]
pub use conclave_state;

#[cfg(feature = "guardian")]
pub use conclave_guardian;
#[cfg(feature = "workflow")]
pub use conclave_workflow;

#[cfg(feature = "agent")]
pub use conclave_agent;

#[cfg(feature = "cycle")]
pub use conclave_cycle;
#[cfg(feature = "cycle")]
pub use conclave_interaction;

#[cfg(feature = "runtime")]
pub use conclave_runtime;

/// Happy-path imports for composing conclave systems.
pub mod prelude {
    #[cfg(feature = "core")]
    pub use conclave_protocol::{
        AgentId, Content, ContentBlock, Hook, HookAction, HookContext, HookPoint, Orchestrator,
        ScopeId, SessionId, StateReader, StateStore, WorkflowId,
    };

    #[cfg(feature = "core")]
    pub use conclave_tool::{ToolDyn, ToolError, ToolRegistry};

    #[cfg(feature = "core")]
    pub use conclave_provider::{Provider, ProviderError, ProviderRequest, ProviderResponse};

    #[cfg(feature = "core")]
    pub use conclave_parser::{parse_tool_calls, ParsedToolCall, ToolCallParse};

    #[cfg(feature = "core")]
    pub use conclave_prompt::PromptAssembler;

    #[cfg(feature = "hooks")]
    pub use conclave_hooks::HookRegistry;

    #[cfg(feature = "state-memory")]
    pub use conclave_state::MemoryStore;

    #[cfg(feature = "guardian")]
    pub use conclave_guardian::{Guardian, ReviewVerdict};

    #[cfg(feature = "workflow")]
    pub use conclave_workflow::WorkflowManager;

    #[cfg(feature = "agent")]
    pub use conclave_agent::{Agent, AgentManager, AgentRole, AgentState};

    #[cfg(feature = "cycle")]
    pub use conclave_cycle::CycleEngine;

    #[cfg(feature = "runtime")]
    pub use conclave_runtime::{run, RuntimeConfig};
}
