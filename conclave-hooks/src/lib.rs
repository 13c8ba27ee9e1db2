#![deny(missing_docs)]
//! Hook registry and composition for the conclave runtime.
//!
//! The [`HookRegistry`] collects multiple [`Hook`] implementations into
//! an ordered pipeline. At each hook point, hooks are dispatched in
//! registration order. The pipeline short-circuits on `Halt`, `SkipTool`,
//! `ModifyToolInput`, or `ModifyToolOutput` — subsequent hooks are not
//! called. Hook errors are logged and the pipeline continues (errors
//! don't halt).

use conclave_protocol::hook::{Hook, HookAction, HookContext};
use std::sync::Arc;

/// A registry that dispatches hook events to an ordered pipeline of hooks.
///
/// Hooks are called in the order they were registered. The pipeline
/// short-circuits on any action other than `Continue` (except errors,
/// which are logged and ignored).
pub struct HookRegistry {
    hooks: Vec<Arc<dyn Hook>>,
}

impl HookRegistry {
    /// Create a new empty hook registry.
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Add a hook to the end of the pipeline.
    pub fn add(&mut self, hook: Arc<dyn Hook>) {
        self.hooks.push(hook);
    }

    /// Number of hooks currently registered.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Whether the registry has no hooks registered.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Dispatch a hook event through the pipeline.
    ///
    /// Returns the final action. If all hooks return `Continue`, the
    /// result is `Continue`. If any hook returns `Halt`, `SkipTool`,
    /// `ModifyToolInput`, or `ModifyToolOutput`, the pipeline stops and
    /// that action is returned. Hook errors are logged and treated as
    /// `Continue`.
    pub async fn dispatch(&self, ctx: &HookContext) -> HookAction {
        for hook in &self.hooks {
            if !hook.points().contains(&ctx.point) {
                continue;
            }

            match hook.on_event(ctx).await {
                Ok(HookAction::Continue) => continue,
                Ok(action) => {
                    tracing::debug!(point = ?ctx.point, ?action, "hook pipeline short-circuited");
                    return action;
                }
                Err(error) => {
                    tracing::warn!(point = ?ctx.point, %error, "hook returned an error, continuing pipeline");
                    continue;
                }
            }
        }

        HookAction::Continue
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use conclave_protocol::error::HookError;
    use conclave_protocol::hook::HookPoint;
    use conclave_protocol::test_utils::LoggingHook;

    struct HaltingHook;

    #[async_trait]
    impl Hook for HaltingHook {
        fn points(&self) -> &[HookPoint] {
            &[HookPoint::PreToolUse]
        }

        async fn on_event(&self, _ctx: &HookContext) -> Result<HookAction, HookError> {
            Ok(HookAction::Halt {
                reason: "policy violation".into(),
            })
        }
    }

    struct FailingHook;

    #[async_trait]
    impl Hook for FailingHook {
        fn points(&self) -> &[HookPoint] {
            &[HookPoint::PreInference]
        }

        async fn on_event(&self, _ctx: &HookContext) -> Result<HookAction, HookError> {
            Err(HookError::Failed("boom".into()))
        }
    }

    #[tokio::test]
    async fn empty_registry_continues() {
        let registry = HookRegistry::new();
        let ctx = HookContext::new(HookPoint::PreInference);
        assert!(matches!(registry.dispatch(&ctx).await, HookAction::Continue));
    }

    #[tokio::test]
    async fn short_circuits_on_halt() {
        let logging = Arc::new(LoggingHook::new());
        let mut registry = HookRegistry::new();
        registry.add(logging.clone());
        registry.add(Arc::new(HaltingHook));

        let ctx = HookContext::new(HookPoint::PreToolUse);
        let action = registry.dispatch(&ctx).await;
        assert!(matches!(action, HookAction::Halt { .. }));
        assert_eq!(logging.events().len(), 1);
    }

    #[tokio::test]
    async fn errors_are_swallowed_and_pipeline_continues() {
        let mut registry = HookRegistry::new();
        registry.add(Arc::new(FailingHook));
        let logging = Arc::new(LoggingHook::new());
        registry.add(logging.clone());

        let ctx = HookContext::new(HookPoint::PreInference);
        let action = registry.dispatch(&ctx).await;
        assert!(matches!(action, HookAction::Continue));
        assert_eq!(logging.events().len(), 1);
    }

    #[tokio::test]
    async fn skips_hooks_not_registered_for_point() {
        let mut registry = HookRegistry::new();
        registry.add(Arc::new(HaltingHook));

        let ctx = HookContext::new(HookPoint::PostToolUse);
        let action = registry.dispatch(&ctx).await;
        assert!(matches!(action, HookAction::Continue));
    }
}
