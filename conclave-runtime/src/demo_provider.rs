//! A minimal standalone [`Provider`] for running the binary without a
//! real model backend, which is out of scope for this runtime (see the
//! crate-level docs on `conclave-provider`). Not a test double — it has
//! no script to exhaust and never panics — just a fixed acknowledgment
//! so the driver loop has something to call.

use conclave_provider::{
    ContentPart, Provider, ProviderError, ProviderRequest, ProviderResponse, StopReason,
    TokenUsage,
};
use std::future::Future;

/// Always answers with a fixed acknowledgment and never requests a tool
/// call, a plan, or a state change — one cycle, `final_response`, done.
pub struct EchoProvider {
    reply: String,
}

impl EchoProvider {
    /// Build a provider that answers every call with `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into() }
    }
}

impl Default for EchoProvider {
    fn default() -> Self {
        Self::new("Acknowledged.")
    }
}

impl Provider for EchoProvider {
    fn complete(
        &self,
        _request: ProviderRequest,
    ) -> impl Future<Output = Result<ProviderResponse, ProviderError>> + Send {
        let reply = self.reply.clone();
        async move {
            Ok(ProviderResponse {
                content: vec![ContentPart::Text { text: reply }],
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage::default(),
                model: "echo".to_string(),
                cost: None,
                truncated: None,
            })
        }
    }
}
