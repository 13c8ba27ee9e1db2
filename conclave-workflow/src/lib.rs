#![deny(missing_docs)]
//! Multi-step project workflows: agent state transitions, plan
//! hand-off to a new project-manager agent, and task-list hand-off
//! from a project manager to its team.
//!
//! Every agent creation and cycle scheduling in this crate goes
//! through an injected [`AgentManager`], never a direct reference held
//! by the agent being acted on — that keeps this crate the only place
//! that knows how a project moves from a plan to running workers.

use conclave_agent::{Agent, AgentError, AgentManager, AgentManagerError, AgentRole, AgentState};
use conclave_parser::Plan;
use conclave_prompt::PromptAssembler;
use conclave_protocol::id::AgentId;
use conclave_provider::{ContentPart, ProviderMessage, Role};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while running a workflow step.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The named agent isn't registered with the agent manager.
    #[error("agent not found: {0}")]
    AgentNotFound(String),

    /// The agent roster rejected an operation.
    #[error(transparent)]
    Manager(#[from] AgentManagerError),

    /// The agent's own state machine rejected the requested transition.
    #[error(transparent)]
    Transition(#[from] AgentError),
}

/// Orchestrates agent state transitions and the project-creation /
/// task-breakdown workflows built on top of them.
pub struct WorkflowManager<'a> {
    agent_manager: &'a AgentManager,
    assembler: PromptAssembler,
}

impl<'a> WorkflowManager<'a> {
    /// Create a workflow manager over the given agent roster.
    pub fn new(agent_manager: &'a AgentManager) -> Self {
        Self {
            agent_manager,
            assembler: PromptAssembler::new(),
        }
    }

    /// Transition an agent to a new state, validating against its state
    /// machine and recording a transition-guidance message in its
    /// history.
    pub async fn change_agent_state(
        &self,
        agent_id: &AgentId,
        new_state: AgentState,
        context: Option<&str>,
    ) -> Result<(), WorkflowError> {
        let handle = self
            .agent_manager
            .get_agent(agent_id)
            .await
            .ok_or_else(|| WorkflowError::AgentNotFound(agent_id.to_string()))?;

        let mut agent = handle.lock().await;
        let from = agent.current_state;
        agent.transition(new_state)?;

        let transition_message = self.assembler.state_transition_message(new_state, context);
        agent.message_history.push(transition_message);

        tracing::info!(agent = %agent_id, ?from, to = ?new_state, "workflow state transition");
        Ok(())
    }

    /// Hand a freshly drafted plan off to a new project-manager agent:
    /// create the PM, seed its history with the plan, transition it to
    /// [`AgentState::Startup`], schedule its first cycle, and notify
    /// the admin agent that kicked off the plan.
    pub async fn process_plan_creation(
        &self,
        admin_id: &AgentId,
        plan: &Plan,
    ) -> Result<AgentId, WorkflowError> {
        let project_name = plan
            .fields
            .get("project_name")
            .map(String::as_str)
            .unwrap_or("Unnamed Project");
        let description = plan
            .fields
            .get("description")
            .map(String::as_str)
            .unwrap_or("No description");

        tracing::info!(project = %project_name, "starting project creation workflow");

        let pm_id = self.agent_manager.create_agent(AgentRole::Pm, &[]).await?;

        let objectives = bullet_list(&plan.objectives);
        let deliverables = bullet_list(&plan.deliverables);
        let plan_text = format!(
            "You have been assigned a new project:\n\nProject: {project_name}\n\nDescription: {description}\n\nObjectives:\n{objectives}\n\nDeliverables:\n{deliverables}"
        );

        {
            let handle = self
                .agent_manager
                .get_agent(&pm_id)
                .await
                .ok_or_else(|| WorkflowError::AgentNotFound(pm_id.to_string()))?;
            let mut pm_agent = handle.lock().await;
            pm_agent.message_history.push(user_message(&plan_text));
        }

        self.change_agent_state(
            &pm_id,
            AgentState::Startup,
            Some("Break down this project into actionable tasks"),
        )
        .await?;

        self.agent_manager.schedule_cycle(&pm_id).await?;

        if let Some(handle) = self.agent_manager.get_agent(admin_id).await {
            let mut admin_agent = handle.lock().await;
            admin_agent.message_history.push(system_message(&format!(
                "[SYSTEM] Project Manager agent {pm_id} has been created and assigned your plan. They will break it down into tasks."
            )));
        }

        tracing::info!(pm = %pm_id, "project creation workflow complete");
        Ok(pm_id)
    }

    /// Hand a project manager's task breakdown to the next stage: store
    /// the tasks in its working memory, transition it to
    /// [`AgentState::BuildTeamTasks`], and schedule its next cycle.
    pub async fn process_task_list_creation(
        &self,
        pm_id: &AgentId,
        tasks: &[HashMap<String, String>],
    ) -> Result<(), WorkflowError> {
        tracing::info!(pm = %pm_id, count = tasks.len(), "project manager created task list");

        {
            let handle = self
                .agent_manager
                .get_agent(pm_id)
                .await
                .ok_or_else(|| WorkflowError::AgentNotFound(pm_id.to_string()))?;
            let mut pm_agent = handle.lock().await;
            store_tasks(&mut pm_agent, tasks);
        }

        self.change_agent_state(
            pm_id,
            AgentState::BuildTeamTasks,
            Some(&format!(
                "You have defined {} tasks. Now create worker agents for these tasks.",
                tasks.len()
            )),
        )
        .await?;

        self.agent_manager.schedule_cycle(pm_id).await?;

        Ok(())
    }
}

fn store_tasks(agent: &mut Agent, tasks: &[HashMap<String, String>]) {
    let written_at = agent.uptime_ms();
    let value = serde_json::to_value(tasks).unwrap_or(serde_json::Value::Null);
    agent.memory.short_term.insert(
        "tasks".to_string(),
        conclave_agent::ShortTermEntry { value, written_at },
    );
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn user_message(text: &str) -> ProviderMessage {
    ProviderMessage {
        role: Role::User,
        content: vec![ContentPart::Text {
            text: text.to_string(),
        }],
    }
}

fn system_message(text: &str) -> ProviderMessage {
    ProviderMessage {
        role: Role::System,
        content: vec![ContentPart::Text {
            text: text.to_string(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    struct NoopRunner;

    #[async_trait]
    impl conclave_agent::CycleRunner for NoopRunner {
        async fn run_cycle(&self, _agent: Arc<Mutex<Agent>>) {}
    }

    fn manager() -> AgentManager {
        AgentManager::new(Arc::new(NoopRunner), 10)
    }

    #[tokio::test]
    async fn change_agent_state_records_transition() {
        let manager = manager();
        let id = manager.create_agent(AgentRole::Admin, &[]).await.unwrap();
        let workflow = WorkflowManager::new(&manager);

        workflow
            .change_agent_state(&id, AgentState::Planning, Some("go"))
            .await
            .unwrap();

        let handle = manager.get_agent(&id).await.unwrap();
        let agent = handle.lock().await;
        assert_eq!(agent.current_state, AgentState::Planning);
        assert_eq!(agent.message_history.len(), 1);
    }

    #[tokio::test]
    async fn process_plan_creation_spins_up_pm() {
        let manager = manager();
        let admin_id = manager.create_agent(AgentRole::Admin, &[]).await.unwrap();
        let workflow = WorkflowManager::new(&manager);

        let mut plan = Plan::default();
        plan.fields.insert("project_name".into(), "Garden Bot".into());
        plan.objectives.push("Plant seeds".into());

        let pm_id = workflow.process_plan_creation(&admin_id, &plan).await.unwrap();

        let pm_handle = manager.get_agent(&pm_id).await.unwrap();
        let pm_agent = pm_handle.lock().await;
        assert_eq!(pm_agent.current_state, AgentState::Startup);
        assert_eq!(pm_agent.message_history.len(), 2);

        let admin_handle = manager.get_agent(&admin_id).await.unwrap();
        let admin_agent = admin_handle.lock().await;
        assert_eq!(admin_agent.message_history.len(), 1);
    }

    #[tokio::test]
    async fn process_task_list_creation_stores_tasks_and_transitions() {
        let manager = manager();
        let pm_id = manager.create_agent(AgentRole::Pm, &[]).await.unwrap();
        {
            let handle = manager.get_agent(&pm_id).await.unwrap();
            handle.lock().await.transition(AgentState::Startup).unwrap();
        }
        let workflow = WorkflowManager::new(&manager);

        let mut task = HashMap::new();
        task.insert("name".to_string(), "Write docs".to_string());
        workflow
            .process_task_list_creation(&pm_id, &[task])
            .await
            .unwrap();

        let handle = manager.get_agent(&pm_id).await.unwrap();
        let agent = handle.lock().await;
        assert_eq!(agent.current_state, AgentState::BuildTeamTasks);
        assert!(agent.memory.short_term.contains_key("tasks"));
    }
}
