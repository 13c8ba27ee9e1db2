//! The Provider trait for model backends.
//!
//! [`Provider`] uses RPITIT (return-position `impl Trait` in traits) and
//! is intentionally NOT object-safe. The object-safe boundary for the
//! runtime is `conclave_protocol::Turn` — a type generic over
//! `P: Provider` implements `Turn`, not `Provider` itself.

use crate::types::{ProviderRequest, ProviderResponse};
use std::future::Future;
use thiserror::Error;

/// Errors from model providers.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP or network request failed.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// Provider rate-limited the request.
    #[error("rate limited")]
    RateLimited,

    /// Authentication/authorization failed.
    #[error("auth failed: {0}")]
    AuthFailed(String),

    /// Could not parse the provider's response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Catch-all for other errors.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ProviderError {
    /// Whether retrying this request might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited | ProviderError::RequestFailed(_)
        )
    }
}

/// Model provider interface.
///
/// Each backend (Anthropic, OpenAI, a local model server) implements
/// this trait. Provider-native features (truncation, caching, thinking
/// blocks) are handled by the implementation using `ProviderRequest.extra`.
pub trait Provider: Send + Sync {
    /// Send a completion request to the provider.
    fn complete(
        &self,
        request: ProviderRequest,
    ) -> impl Future<Output = Result<ProviderResponse, ProviderError>> + Send;
}
