//! Assembles the message list sent to a provider for an agent's cycle.

use crate::defaults;
use conclave_agent::{Agent, AgentRole, AgentState};
use conclave_provider::{ContentPart, ProviderMessage, Role};

/// Assembles system prompts and dynamic context for agent cycles.
///
/// Prompts are role/state lookups against compiled-in defaults. A
/// deployment that wants prompts sourced from config would wrap or
/// replace this, not fork it.
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptAssembler;

impl PromptAssembler {
    /// Create a new assembler.
    pub fn new() -> Self {
        Self
    }

    /// Build the full message list for a provider call: system prompt,
    /// the agent's accumulated history, then dynamic context appended
    /// as a trailing system message.
    pub fn prepare_llm_call_data(&self, agent: &Agent) -> Vec<ProviderMessage> {
        let mut messages = Vec::with_capacity(agent.message_history.len() + 2);

        let system_prompt = self.system_prompt(agent);
        if !system_prompt.is_empty() {
            messages.push(system_message(system_prompt));
        }

        messages.extend(agent.message_history.iter().cloned());

        let dynamic_context = self.dynamic_context(agent);
        if !dynamic_context.is_empty() {
            messages.push(system_message(&dynamic_context));
        }

        messages
    }

    /// The system prompt for an agent's current role and state.
    ///
    /// Admin and Worker agents fall back to their primary working
    /// prompt (conversation, work) when idle, since idle has no
    /// prompt of its own for those roles.
    pub fn system_prompt(&self, agent: &Agent) -> &'static str {
        let prompt = match agent.role {
            AgentRole::Admin => match agent.current_state {
                AgentState::Idle => defaults::ADMIN_CONVERSATION,
                AgentState::Conversation => defaults::ADMIN_CONVERSATION,
                AgentState::Planning => defaults::ADMIN_PLANNING,
                _ => "",
            },
            AgentRole::Pm => match agent.current_state {
                AgentState::Startup => defaults::PM_STARTUP,
                AgentState::BuildTeamTasks => defaults::PM_BUILD_TEAM_TASKS,
                AgentState::ActivateWorkers => defaults::PM_ACTIVATE_WORKERS,
                AgentState::Manage => defaults::PM_MANAGE,
                AgentState::Standby => defaults::PM_STANDBY,
                _ => "",
            },
            AgentRole::Worker => match agent.current_state {
                AgentState::Idle => defaults::WORKER_WORK,
                AgentState::Work => defaults::WORKER_WORK,
                AgentState::Wait => defaults::WORKER_WAIT,
                _ => "",
            },
            AgentRole::Guardian => match agent.current_state {
                AgentState::Idle => defaults::GUARDIAN_IDLE,
                _ => "",
            },
        };

        tracing::debug!(
            agent = %agent.id,
            role = ?agent.role,
            state = ?agent.current_state,
            prompt_len = prompt.len(),
            "resolved system prompt"
        );

        prompt
    }

    /// Context injected alongside the system prompt: wall-clock time
    /// for Admin agents, and a description of available tools.
    pub fn dynamic_context(&self, agent: &Agent) -> String {
        let mut parts = Vec::new();

        if agent.role == AgentRole::Admin {
            let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S");
            parts.push(format!("Current time: {now}"));
        }

        parts.push(format!("Available tools:\n{}", defaults::TOOLS_DESCRIPTION));

        parts.join("\n\n")
    }

    /// A system message announcing a state transition, for insertion
    /// into an agent's message history immediately after the
    /// transition is applied.
    pub fn state_transition_message(
        &self,
        new_state: AgentState,
        context: Option<&str>,
    ) -> ProviderMessage {
        let guidance = state_guidance(new_state);

        let mut content = format!("[SYSTEM] State transition to: {new_state:?}");
        if let Some(guidance) = guidance {
            content.push('\n');
            content.push_str(guidance);
        }
        if let Some(context) = context {
            content.push_str("\nContext: ");
            content.push_str(context);
        }

        system_message(&content)
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

fn state_guidance(state: AgentState) -> Option<&'static str> {
    use AgentState::*;
    match state {
        Planning => Some("You are now in planning mode. Create a detailed plan for the user's request."),
        Conversation => Some("You are now in conversation mode. Continue engaging with the user."),
        Startup => Some("You are now starting up a new project. Break down the plan into tasks."),
        BuildTeamTasks => Some("Build your team by creating worker agents for the tasks."),
        ActivateWorkers => Some("Assign tasks to your worker agents."),
        Manage => Some("Monitor and coordinate your team's progress."),
        Work => Some("Execute your assigned task."),
        Wait => Some("Task complete. Wait for further instructions."),
        Standby => Some("Project complete. Standing by for new assignments."),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conclave_protocol::id::AgentId;

    #[test]
    fn admin_idle_falls_back_to_conversation_prompt() {
        let agent = Agent::new(AgentId::new("a1"), AgentRole::Admin);
        let assembler = PromptAssembler::new();
        assert_eq!(assembler.system_prompt(&agent), defaults::ADMIN_CONVERSATION);
    }

    #[test]
    fn worker_idle_falls_back_to_work_prompt() {
        let agent = Agent::new(AgentId::new("w1"), AgentRole::Worker);
        let assembler = PromptAssembler::new();
        assert_eq!(assembler.system_prompt(&agent), defaults::WORKER_WORK);
    }

    #[test]
    fn pm_standby_has_no_fallback() {
        let mut agent = Agent::new(AgentId::new("pm1"), AgentRole::Pm);
        agent.current_state = AgentState::Idle;
        let assembler = PromptAssembler::new();
        assert_eq!(assembler.system_prompt(&agent), "");
    }

    #[test]
    fn dynamic_context_includes_time_for_admin_only() {
        let admin = Agent::new(AgentId::new("a1"), AgentRole::Admin);
        let worker = Agent::new(AgentId::new("w1"), AgentRole::Worker);
        let assembler = PromptAssembler::new();
        assert!(assembler.dynamic_context(&admin).contains("Current time"));
        assert!(!assembler.dynamic_context(&worker).contains("Current time"));
    }

    #[test]
    fn prepare_llm_call_data_includes_system_and_history() {
        let mut agent = Agent::new(AgentId::new("a1"), AgentRole::Admin);
        agent.message_history.push(ProviderMessage {
            role: Role::User,
            content: vec![ContentPart::Text {
                text: "hello".into(),
            }],
        });
        let assembler = PromptAssembler::new();
        let messages = assembler.prepare_llm_call_data(&agent);
        assert_eq!(messages.first().unwrap().role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages.last().unwrap().role, Role::System);
    }

    #[test]
    fn state_transition_message_includes_guidance() {
        let assembler = PromptAssembler::new();
        let message = assembler.state_transition_message(AgentState::Work, None);
        let ContentPart::Text { text } = &message.content[0] else {
            panic!("expected text content");
        };
        assert!(text.contains("Execute your assigned task"));
    }
}
