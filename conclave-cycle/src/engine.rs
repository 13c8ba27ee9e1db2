//! The cycle engine: the concrete [`CycleRunner`] that drives one
//! agent cycle from prompt assembly through to a landed state.

use crate::error::CycleError;
use async_trait::async_trait;
use conclave_agent::{Agent, AgentManager, AgentState, CycleRunner};
use conclave_guardian::Guardian;
use conclave_prompt::PromptAssembler;
use conclave_protocol::id::AgentId;
use conclave_provider::{
    ContentPart, ContextStrategy, NoCompaction, Provider, ProviderRequest, Role, ToolSchema,
};
use conclave_tool::ToolRegistry;
use conclave_workflow::WorkflowManager;
use std::sync::{Arc, Weak};
use std::time::Instant;
use tokio::sync::Mutex;

/// Tool names the engine intercepts before they reach the generic
/// [`ToolRegistry`], because acting on them needs direct access to the
/// agent roster rather than a stateless [`conclave_tool::ToolDyn`]
/// handler.
///
/// `send_message` delivers into another agent's history and schedules
/// its next cycle — a [`conclave_tool::ToolDyn`] has no way to reach
/// the roster, so it's handled here instead of through the registry.
pub const EFFECT_TOOL_NAMES: &[&str] = &["send_message"];

const DEFAULT_MAX_TURNS_PER_CYCLE: u32 = 6;
const DEFAULT_MAX_TOKENS: u32 = 4096;
const DEFAULT_CONTEXT_TOKEN_LIMIT: usize = 8000;

/// Drives a single cycle for one agent: prompt assembly, a model call,
/// parsing the response, dispatching whatever it asked for, and
/// landing the agent back in a stable state.
///
/// Implements [`CycleRunner`] so an [`AgentManager`] can schedule
/// cycles through it without knowing any of these details.
///
/// Holds the agent manager it was built for as a [`Weak`] reference,
/// not a strong [`Arc`]: the manager owns this engine as its
/// `Arc<dyn CycleRunner>`, so a strong back-reference would form a
/// cycle neither side ever frees. Wire the two together with
/// [`Arc::new_cyclic`].
pub struct CycleEngine<P: Provider> {
    pub(crate) provider: P,
    pub(crate) tools: ToolRegistry,
    pub(crate) agent_manager: Weak<AgentManager>,
    pub(crate) guardian: Arc<Mutex<Guardian>>,
    pub(crate) assembler: PromptAssembler,
    pub(crate) max_turns_per_cycle: u32,
    pub(crate) context_strategy: Arc<dyn ContextStrategy>,
    pub(crate) context_token_limit: usize,
}

impl<P: Provider> CycleEngine<P> {
    /// Build a cycle engine over the given provider and tool registry,
    /// for the agent roster behind `agent_manager`, sharing a
    /// compliance guardian across every cycle it runs.
    ///
    /// `agent_manager` is typically a [`Weak`] produced inside the
    /// closure passed to `Arc::new_cyclic` when constructing the
    /// `AgentManager` itself, since the manager needs this engine (as
    /// its `Arc<dyn CycleRunner>`) before it exists.
    pub fn new(
        provider: P,
        tools: ToolRegistry,
        agent_manager: Weak<AgentManager>,
        guardian: Arc<Mutex<Guardian>>,
    ) -> Self {
        Self {
            provider,
            tools,
            agent_manager,
            guardian,
            assembler: PromptAssembler::new(),
            max_turns_per_cycle: DEFAULT_MAX_TURNS_PER_CYCLE,
            context_strategy: Arc::new(NoCompaction),
            context_token_limit: DEFAULT_CONTEXT_TOKEN_LIMIT,
        }
    }

    /// Override the per-cycle turn budget (default 6).
    pub fn with_max_turns_per_cycle(mut self, max_turns: u32) -> Self {
        self.max_turns_per_cycle = max_turns;
        self
    }

    /// Use a different context-compaction strategy and token budget
    /// (default: [`NoCompaction`] with an 8000-token limit).
    pub fn with_context_strategy(
        mut self,
        strategy: Arc<dyn ContextStrategy>,
        token_limit: usize,
    ) -> Self {
        self.context_strategy = strategy;
        self.context_token_limit = token_limit;
        self
    }

    /// The agent manager this engine runs cycles for.
    ///
    /// Panics if the manager has already been dropped — that would
    /// mean the runtime tore down the roster while a cycle was still
    /// in flight, which never happens in normal shutdown (cycles are
    /// awaited before the manager is dropped).
    pub(crate) fn manager(&self) -> Arc<AgentManager> {
        self.agent_manager
            .upgrade()
            .expect("agent manager dropped while a cycle was still running")
    }

    fn build_request(&self, agent: &Agent) -> ProviderRequest {
        let messages = self.assembler.prepare_llm_call_data(agent);
        let messages = if self
            .context_strategy
            .should_compact(&messages, self.context_token_limit)
        {
            self.context_strategy.compact(messages)
        } else {
            messages
        };

        let mut tools: Vec<ToolSchema> = self
            .tools
            .iter()
            .map(|tool| ToolSchema {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.input_schema(),
            })
            .collect();
        tools.push(send_message_schema());

        ProviderRequest {
            model: None,
            messages,
            tools,
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            temperature: None,
            system: None,
            extra: serde_json::Value::Null,
        }
    }

    /// Run the cycle's inner loop: call the model, run its raw text
    /// through the extraction-priority chain, and dispatch the first
    /// actionable directive found, looping back after a tool call so
    /// the model can see the result. Only a turn that resolves to none
    /// of the structural directives — a `final_response` — ever reaches
    /// the Guardian or lands in the agent's own history as an
    /// assistant-role message.
    ///
    /// Holds the agent's lock only for short, bounded steps (reading
    /// state to build a request, appending a message) and always
    /// releases it before calling into the workflow manager, the agent
    /// manager, or the guardian — those may need to lock this same
    /// agent (e.g. a notification pushed back to an admin) or another
    /// one, and `tokio::sync::Mutex` is not reentrant.
    async fn drive(&self, agent: &Arc<Mutex<Agent>>, agent_id: &AgentId) -> Result<(), CycleError> {
        for _ in 0..self.max_turns_per_cycle {
            let request = {
                let locked = agent.lock().await;
                self.build_request(&locked)
            };

            let response = self
                .provider
                .complete(request)
                .await
                .map_err(|error| CycleError::Provider(error.to_string()))?;
            let text = response_text(&response.content);

            let tool_parse = conclave_parser::parse_tool_calls(&text);
            if tool_parse.success {
                for call in &tool_parse.tool_calls {
                    self.dispatch_tool_call(agent, agent_id, call).await;
                }
                continue;
            }

            if let Some(request) = conclave_parser::extract_create_worker_request(&text) {
                self.handle_create_worker_request(agent, agent_id, &request).await?;
                return Ok(());
            }

            if let Some(plan) = conclave_parser::extract_plan(&text) {
                let manager = self.manager();
                WorkflowManager::new(&manager)
                    .process_plan_creation(agent_id, &plan)
                    .await?;
                return Ok(());
            }

            if let Some(tasks) = conclave_parser::extract_task_list(&text) {
                let manager = self.manager();
                WorkflowManager::new(&manager)
                    .process_task_list_creation(agent_id, &tasks)
                    .await?;
                return Ok(());
            }

            if let Some(raw_state) = conclave_parser::extract_state_change_request(&text) {
                self.dispatch_state_change(agent, agent_id, &raw_state).await?;
                return Ok(());
            }

            // Nothing structural matched: this is a final_response, the
            // one case the Guardian gates before it reaches the agent's
            // own history.
            let verdict = {
                let mut guardian = self.guardian.lock().await;
                guardian.review_output(Some(agent_id.as_str()), &text)
            };

            let mut locked = agent.lock().await;
            if verdict.compliant {
                locked.message_history.push(assistant_message(&text));
                locked.metrics.tasks_completed += 1;
            } else {
                locked.metrics.constitutional_violations += 1;
                locked.message_history.push(system_message(&format!(
                    "[SYSTEM] Output blocked: {}",
                    verdict.reason.as_deref().unwrap_or("constitutional violation")
                )));
                tracing::warn!(agent = %agent_id, violation = ?verdict.violation_id, "cycle output blocked by guardian");
            }
            return Ok(());
        }

        tracing::warn!(agent = %agent_id, turns = self.max_turns_per_cycle, "cycle exhausted its turn budget without a terminal response");
        Ok(())
    }
}

#[async_trait]
impl<P> CycleRunner for CycleEngine<P>
where
    P: Provider + Send + Sync + 'static,
{
    async fn run_cycle(&self, agent: Arc<Mutex<Agent>>) {
        let agent_id = agent.lock().await.id.clone();
        let started = Instant::now();

        {
            let mut locked = agent.lock().await;
            if let Err(error) = locked.transition(AgentState::Processing) {
                tracing::warn!(agent = %agent_id, %error, "cycle not started: could not enter processing");
                return;
            }
        }

        let outcome = self.drive(&agent, &agent_id).await;

        {
            let mut locked = agent.lock().await;
            locked.record_response_time(started.elapsed().as_secs_f64());
            if outcome.is_err() {
                locked.metrics.tasks_failed += 1;
            }
        }

        // Land the cycle: only through the workflow manager, never by
        // transitioning the agent directly, so these terminal moves get
        // the same state_transition_message every other transition
        // gets. If drive() already moved the agent on to a state of its
        // own choosing (a state change, a plan/task hand-off), it's left
        // alone here.
        let still_processing = agent.lock().await.current_state == AgentState::Processing;
        if still_processing {
            let manager = self.manager();
            let workflow = WorkflowManager::new(&manager);
            let target = if outcome.is_err() { AgentState::Error } else { AgentState::Idle };
            if let Err(error) = workflow.change_agent_state(&agent_id, target, None).await {
                tracing::warn!(agent = %agent_id, ?target, %error, "failed to land cycle");
            }
        }

        if let Err(error) = &outcome {
            tracing::error!(agent = %agent_id, %error, "cycle failed");
        }

        let mut locked = agent.lock().await;
        locked.update_health_score();
        locked.cleanup_memory();
    }
}

fn send_message_schema() -> ToolSchema {
    ToolSchema {
        name: "send_message".to_string(),
        description: "Send a message to another agent, identified by its agent ID.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "target_agent_id": { "type": "string" },
                "message": { "type": "string" }
            },
            "required": ["target_agent_id", "message"]
        }),
    }
}

pub(crate) fn response_text(parts: &[ContentPart]) -> String {
    parts
        .iter()
        .filter_map(|part| match part {
            ContentPart::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn assistant_message(text: &str) -> conclave_provider::ProviderMessage {
    conclave_provider::ProviderMessage {
        role: Role::Assistant,
        content: vec![ContentPart::Text { text: text.to_string() }],
    }
}

pub(crate) fn system_message(text: &str) -> conclave_provider::ProviderMessage {
    conclave_provider::ProviderMessage {
        role: Role::System,
        content: vec![ContentPart::Text { text: text.to_string() }],
    }
}

pub(crate) fn user_message(text: &str) -> conclave_provider::ProviderMessage {
    conclave_provider::ProviderMessage {
        role: Role::User,
        content: vec![ContentPart::Text { text: text.to_string() }],
    }
}
