#![deny(missing_docs)]
//! Drives a single agent cycle: assemble the prompt, call the model,
//! parse its output, dispatch whatever it asked for, and land the
//! agent back in a normal state.
//!
//! [`CycleEngine`] is the concrete [`conclave_agent::CycleRunner`] that
//! an [`AgentManager`](conclave_agent::AgentManager) schedules cycles
//! through. It does not implement `conclave_protocol::Turn` — that
//! trait's contract is explicit that a turn carries no history of its
//! own and reads it back from a `StateStore` during context assembly,
//! whereas an [`Agent`] here owns its `message_history` directly and a
//! cycle reads it straight off the locked agent. Forcing this engine
//! through `Turn` would mean round-tripping history through a store on
//! every single cycle for no benefit.

mod dispatch;
mod engine;
mod error;

#[cfg(test)]
mod tests;

pub use engine::{CycleEngine, EFFECT_TOOL_NAMES};
pub use error::CycleError;
