//! Dispatch for the directives a cycle can pull out of agent output:
//! tool calls (including the intercepted `send_message` effect),
//! worker creation requests, and ad-hoc state-change requests.

use crate::engine::{system_message, user_message, CycleEngine, EFFECT_TOOL_NAMES};
use crate::error::CycleError;
use conclave_agent::{Agent, AgentRole, AgentState};
use conclave_interaction::InteractionHandler;
use conclave_parser::ParsedToolCall;
use conclave_protocol::id::AgentId;
use conclave_provider::Provider;
use conclave_workflow::WorkflowManager;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

impl<P: Provider> CycleEngine<P> {
    /// Dispatch a single requested tool call.
    ///
    /// `send_message` is handled directly against the agent roster
    /// (see [`EFFECT_TOOL_NAMES`]); everything else goes through the
    /// generic [`InteractionHandler`] against the registered tool set.
    /// Either way, the outcome is appended to the agent's history so
    /// the next provider call in this cycle can see it.
    pub(crate) async fn dispatch_tool_call(
        &self,
        agent: &Arc<Mutex<Agent>>,
        agent_id: &AgentId,
        call: &ParsedToolCall,
    ) {
        let summary = if EFFECT_TOOL_NAMES.contains(&call.name.as_str()) {
            self.send_message_effect(agent_id, call).await
        } else {
            let handler = InteractionHandler::new(&self.tools);
            let result = handler.execute_tool_call(agent_id, call).await;
            match result.outcome {
                Ok(value) => format!("ok: {value}"),
                Err(error) => format!("error: {error}"),
            }
        };

        let mut locked = agent.lock().await;
        locked
            .message_history
            .push(system_message(&format!("[TOOL_RESULT {}] {summary}", call.name)));
    }

    /// The `send_message` effect: deliver into the target agent's
    /// history and schedule its next cycle. Never touches `agent`'s own
    /// lock — the caller already holds nothing here, and this only
    /// locks the *target*, so a cycle can message any other agent
    /// (including its own supervisor) without risking self-deadlock.
    async fn send_message_effect(&self, sender_id: &AgentId, call: &ParsedToolCall) -> String {
        let Some(target_raw) = call.args.get("target_agent_id") else {
            return "error: missing target_agent_id".to_string();
        };
        let message = call.args.get("message").cloned().unwrap_or_default();
        let target_id = AgentId::new(target_raw.clone());
        let manager = self.manager();

        let Some(handle) = manager.get_agent(&target_id).await else {
            return format!("error: unknown target agent {target_id}");
        };

        {
            let mut target = handle.lock().await;
            target
                .message_history
                .push(user_message_from(sender_id, &message));
        }

        if let Err(error) = manager.schedule_cycle(&target_id).await {
            tracing::warn!(target = %target_id, %error, "failed to schedule cycle after send_message");
            return format!("delivered, but failed to schedule recipient's next cycle: {error}");
        }

        "delivered".to_string()
    }

    /// Spin up a new worker agent for a `<create_worker_request>`,
    /// hand it its task, and get it moving.
    pub(crate) async fn handle_create_worker_request(
        &self,
        agent: &Arc<Mutex<Agent>>,
        agent_id: &AgentId,
        request: &HashMap<String, String>,
    ) -> Result<(), CycleError> {
        let task_id = request.get("task_id").cloned().unwrap_or_default();
        let specialty = request
            .get("specialty")
            .cloned()
            .unwrap_or_else(|| "general".to_string());

        let manager = self.manager();
        let worker_id = manager.create_agent(AgentRole::Worker, &[]).await?;

        if let Some(handle) = manager.get_agent(&worker_id).await {
            let mut worker = handle.lock().await;
            worker.message_history.push(user_message(&format!(
                "You have been assigned task {task_id} ({specialty})."
            )));
        }

        WorkflowManager::new(&manager)
            .change_agent_state(&worker_id, AgentState::Work, Some("New task assigned"))
            .await?;
        manager.schedule_cycle(&worker_id).await?;

        {
            let mut locked = agent.lock().await;
            locked.message_history.push(system_message(&format!(
                "[SYSTEM] Worker agent {worker_id} created for task {task_id}."
            )));
        }

        tracing::info!(agent = %agent_id, worker = %worker_id, task = %task_id, "spawned worker for task");
        Ok(())
    }

    /// Apply a `<state_change>` request the agent made of itself.
    /// Unknown state names or transitions the state machine rejects are
    /// reported back into the agent's own history rather than treated
    /// as a cycle failure — a confused model should see the correction,
    /// not crash the cycle.
    pub(crate) async fn dispatch_state_change(
        &self,
        agent: &Arc<Mutex<Agent>>,
        agent_id: &AgentId,
        raw_state: &str,
    ) -> Result<(), CycleError> {
        let Some(new_state) = parse_agent_state(raw_state) else {
            let mut locked = agent.lock().await;
            locked.message_history.push(system_message(&format!(
                "[SYSTEM] Unknown state requested: {raw_state}"
            )));
            tracing::warn!(agent = %agent_id, %raw_state, "unknown state requested");
            return Ok(());
        };

        let manager = self.manager();
        if let Err(error) = WorkflowManager::new(&manager)
            .change_agent_state(agent_id, new_state, None)
            .await
        {
            let mut locked = agent.lock().await;
            locked.message_history.push(system_message(&format!(
                "[SYSTEM] State change to {raw_state} rejected: {error}"
            )));
            tracing::warn!(agent = %agent_id, %raw_state, %error, "state change rejected");
        }

        Ok(())
    }
}

fn user_message_from(sender_id: &AgentId, message: &str) -> conclave_provider::ProviderMessage {
    user_message(&format!("[From @{sender_id}]: {message}"))
}

fn parse_agent_state(raw: &str) -> Option<AgentState> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_lowercase())).ok()
}
