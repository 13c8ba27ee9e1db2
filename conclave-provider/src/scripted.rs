//! A deterministic [`Provider`] double for tests.

use crate::provider::{Provider, ProviderError};
use crate::types::{ProviderRequest, ProviderResponse};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A provider that replays a fixed script of responses in order.
///
/// Panics if called more times than there are queued responses —
/// tests should script exactly as many turns as they expect to run.
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<ProviderResponse>>,
    call_count: AtomicUsize,
}

impl ScriptedProvider {
    /// Build a provider that returns these responses in order, one per call.
    pub fn new(responses: Vec<ProviderResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// How many times `complete` has been called so far.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Queue another response at the back of the script.
    ///
    /// Lets a test append a response that depends on state not known
    /// until after construction — a freshly created agent's ID, say —
    /// as long as it arrives before the call that should consume it.
    pub fn push(&self, response: ProviderResponse) {
        self.responses.lock().unwrap().push_back(response);
    }
}

impl Provider for ScriptedProvider {
    fn complete(
        &self,
        _request: ProviderRequest,
    ) -> impl std::future::Future<Output = Result<ProviderResponse, ProviderError>> + Send {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let next = self.responses.lock().unwrap().pop_front();
        async move {
            next.ok_or_else(|| {
                ProviderError::Other("ScriptedProvider: script exhausted".into())
            })
        }
    }
}

impl Provider for Arc<ScriptedProvider> {
    fn complete(
        &self,
        request: ProviderRequest,
    ) -> impl std::future::Future<Output = Result<ProviderResponse, ProviderError>> + Send {
        let provider: &ScriptedProvider = self;
        provider.complete(request)
    }
}
