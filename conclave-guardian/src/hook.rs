//! A [`Hook`] that routes model output through guardian review.

use crate::guardian::Guardian;
use async_trait::async_trait;
use conclave_protocol::error::HookError;
use conclave_protocol::hook::{Hook, HookAction, HookContext, HookPoint};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Reviews each model response for constitutional compliance before it
/// re-enters the turn, halting on violations.
///
/// Fires at [`HookPoint::PostInference`] only. A non-compliant
/// response halts the turn rather than silently continuing — the
/// guardian's job is oversight, not quiet cleanup.
pub struct GuardianHook {
    guardian: Arc<Mutex<Guardian>>,
}

impl GuardianHook {
    /// Wrap a shared guardian instance as a hook.
    pub fn new(guardian: Arc<Mutex<Guardian>>) -> Self {
        Self { guardian }
    }
}

#[async_trait]
impl Hook for GuardianHook {
    fn points(&self) -> &[HookPoint] {
        &[HookPoint::PostInference]
    }

    async fn on_event(&self, ctx: &HookContext) -> Result<HookAction, HookError> {
        if ctx.point != HookPoint::PostInference {
            return Ok(HookAction::Continue);
        }

        let Some(ref output) = ctx.model_output else {
            return Ok(HookAction::Continue);
        };

        let Some(text) = output.as_text() else {
            return Ok(HookAction::Continue);
        };

        let mut guardian = self.guardian.lock().await;
        let verdict = guardian.review_output(None, text);

        if verdict.compliant {
            Ok(HookAction::Continue)
        } else {
            Ok(HookAction::Halt {
                reason: verdict
                    .reason
                    .unwrap_or_else(|| "constitutional violation".into()),
            })
        }
    }
}
