#![deny(missing_docs)]
//! Model provider trait, wire types, and context-compaction strategies.
//!
//! [`Provider`] is deliberately not object-safe (it uses RPITIT) — code
//! that needs to store providers behind a trait object, such as
//! `conclave-cycle`'s cycle engine, is generic over `P: Provider` at
//! construction and erases to a narrower object-safe trait afterward.

pub mod context;
pub mod provider;
pub mod types;

#[cfg(feature = "test-utils")]
pub mod scripted;

pub use context::{ContextStrategy, NoCompaction, SlidingWindow};
pub use provider::{Provider, ProviderError};
#[cfg(feature = "test-utils")]
pub use scripted::ScriptedProvider;
pub use types::{
    ContentPart, ImageSource, ProviderMessage, ProviderRequest, ProviderResponse, Role,
    StopReason, ToolSchema, TokenUsage,
};
