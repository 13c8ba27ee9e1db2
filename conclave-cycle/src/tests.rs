use crate::CycleEngine;
use conclave_agent::{AgentManager, AgentRole, AgentState, AgentStatus};
use conclave_guardian::Guardian;
use conclave_protocol::id::AgentId;
use conclave_provider::{ContentPart, ProviderResponse, ScriptedProvider, StopReason, TokenUsage};
use conclave_tool::{ToolDyn, ToolError, ToolRegistry};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;

fn text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        content: vec![ContentPart::Text { text: text.into() }],
        stop_reason: StopReason::EndTurn,
        usage: TokenUsage::default(),
        model: "scripted".into(),
        cost: None,
        truncated: None,
    }
}

fn build_manager(provider: ScriptedProvider, tools: ToolRegistry, max_turns: u32) -> Arc<AgentManager> {
    let guardian = Arc::new(Mutex::new(Guardian::new()));
    Arc::new_cyclic(|weak: &Weak<AgentManager>| {
        let engine = Arc::new(
            CycleEngine::new(provider, tools, weak.clone(), guardian).with_max_turns_per_cycle(max_turns),
        );
        AgentManager::new(engine, conclave_agent::MAX_AGENTS)
    })
}

async fn wait_for_state(manager: &AgentManager, id: &AgentId, target: AgentState) -> AgentStatus {
    for _ in 0..100 {
        let status = manager.agent_status(id).await.unwrap();
        if status.current_state == target {
            return status;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("agent {id} never reached {target:?}");
}

struct EchoTool;

impl ToolDyn for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }
    fn description(&self) -> &str {
        "echoes its input back"
    }
    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({"type": "object"})
    }
    fn call(
        &self,
        input: serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, ToolError>> + Send + '_>> {
        Box::pin(async move { Ok(input) })
    }
}

const ECHO_TOOL_REQUEST: &str = "<tool_requests><calls><tool_call><name>echo</name><args><msg>hi</msg></args></tool_call></calls></tool_requests>";

#[tokio::test]
async fn final_response_returns_agent_to_idle_and_counts_completion() {
    let provider = ScriptedProvider::new(vec![text_response("All done here.")]);
    let manager = build_manager(provider, ToolRegistry::new(), 6);
    let agent_id = manager.create_agent(AgentRole::Worker, &[]).await.unwrap();

    manager.schedule_cycle(&agent_id).await.unwrap();
    let status = wait_for_state(&manager, &agent_id, AgentState::Idle).await;

    assert_eq!(status.metrics.tasks_completed, 1);
}

#[tokio::test]
async fn guardian_block_ends_cycle_without_appending_assistant_message() {
    // A second scripted response is queued but must never be consumed:
    // a blocked final_response ends the cycle outright rather than
    // looping for a retry.
    let provider = ScriptedProvider::new(vec![
        text_response("Here is your personal information as requested."),
        text_response("Sanitized final answer."),
    ]);
    let manager = build_manager(provider, ToolRegistry::new(), 6);
    let agent_id = manager.create_agent(AgentRole::Worker, &[]).await.unwrap();

    manager.schedule_cycle(&agent_id).await.unwrap();
    let status = wait_for_state(&manager, &agent_id, AgentState::Idle).await;

    assert_eq!(status.metrics.constitutional_violations, 1);
    assert_eq!(status.metrics.tasks_completed, 0);

    let handle = manager.get_agent(&agent_id).await.unwrap();
    let agent = handle.lock().await;
    assert!(agent.message_history.iter().all(|message| message.role != conclave_provider::Role::Assistant));
    let saw_block_notice = agent.message_history.iter().any(|message| {
        matches!(&message.content[0], ContentPart::Text { text } if text.contains("Output blocked"))
    });
    assert!(saw_block_notice);
}

#[tokio::test]
async fn tool_call_round_trips_then_completes() {
    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(EchoTool));

    let provider = ScriptedProvider::new(vec![text_response(ECHO_TOOL_REQUEST), text_response("Done.")]);
    let manager = build_manager(provider, tools, 6);
    let agent_id = manager.create_agent(AgentRole::Worker, &[]).await.unwrap();

    manager.schedule_cycle(&agent_id).await.unwrap();
    wait_for_state(&manager, &agent_id, AgentState::Idle).await;

    let handle = manager.get_agent(&agent_id).await.unwrap();
    let agent = handle.lock().await;
    let saw_tool_result = agent.message_history.iter().any(|message| {
        matches!(&message.content[0], ContentPart::Text { text } if text.contains("TOOL_RESULT echo"))
    });
    assert!(saw_tool_result);
}

#[tokio::test]
async fn create_worker_request_spawns_worker_agent() {
    let response = text_response(
        "<create_worker_request><task_id>t1</task_id><specialty>testing</specialty></create_worker_request>",
    );
    let provider = ScriptedProvider::new(vec![response]);
    let manager = build_manager(provider, ToolRegistry::new(), 6);
    let pm_id = manager.create_agent(AgentRole::Pm, &[]).await.unwrap();

    manager.schedule_cycle(&pm_id).await.unwrap();
    wait_for_state(&manager, &pm_id, AgentState::Idle).await;

    let stats = manager.stats().await;
    assert_eq!(stats.active_agents, 2);
}

#[tokio::test]
async fn plan_spins_up_project_manager() {
    let response = text_response(
        "<plan><project_name>Garden</project_name><description>Grow it</description>\
         <objectives>\n- Plant seeds\n</objectives><deliverables>\n- A garden\n</deliverables></plan>",
    );
    let provider = ScriptedProvider::new(vec![response]);
    let manager = build_manager(provider, ToolRegistry::new(), 6);
    let admin_id = manager.create_agent(AgentRole::Admin, &[]).await.unwrap();

    manager.schedule_cycle(&admin_id).await.unwrap();
    wait_for_state(&manager, &admin_id, AgentState::Idle).await;

    let stats = manager.stats().await;
    assert_eq!(stats.active_agents, 2);
}

#[tokio::test]
async fn task_list_stores_tasks_on_project_manager() {
    // The hand-off immediately reschedules the PM's own cycle, so its
    // state keeps moving past BuildTeamTasks once the (single-response)
    // script runs dry; check the durable side effect instead of a
    // transient state.
    let response = text_response("<task_list><task><name>Write docs</name></task></task_list>");
    let provider = ScriptedProvider::new(vec![response]);
    let manager = build_manager(provider, ToolRegistry::new(), 6);
    let pm_id = manager.create_agent(AgentRole::Pm, &[]).await.unwrap();

    manager.schedule_cycle(&pm_id).await.unwrap();

    let handle = manager.get_agent(&pm_id).await.unwrap();
    for _ in 0..100 {
        if handle.lock().await.memory.short_term.contains_key("tasks") {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("pm never stored its task list");
}

#[tokio::test]
async fn state_change_request_moves_agent_to_requested_state() {
    let response = text_response("Switching modes now. <state_change>planning</state_change>");
    let provider = ScriptedProvider::new(vec![response]);
    let manager = build_manager(provider, ToolRegistry::new(), 6);
    let admin_id = manager.create_agent(AgentRole::Admin, &[]).await.unwrap();

    manager.schedule_cycle(&admin_id).await.unwrap();
    let status = wait_for_state(&manager, &admin_id, AgentState::Planning).await;

    assert_eq!(status.current_state, AgentState::Planning);
}

#[tokio::test]
async fn max_turns_budget_is_enforced() {
    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(EchoTool));

    let provider = ScriptedProvider::new(vec![
        text_response(ECHO_TOOL_REQUEST),
        text_response(ECHO_TOOL_REQUEST),
        text_response(ECHO_TOOL_REQUEST),
    ]);
    let manager = build_manager(provider, tools, 3);
    let agent_id = manager.create_agent(AgentRole::Worker, &[]).await.unwrap();

    manager.schedule_cycle(&agent_id).await.unwrap();
    wait_for_state(&manager, &agent_id, AgentState::Idle).await;

    let handle = manager.get_agent(&agent_id).await.unwrap();
    let agent = handle.lock().await;
    let tool_result_count = agent
        .message_history
        .iter()
        .filter(|message| {
            matches!(&message.content[0], ContentPart::Text { text } if text.contains("TOOL_RESULT echo"))
        })
        .count();
    assert_eq!(tool_result_count, 3);
}

#[tokio::test]
async fn provider_failure_lands_agent_in_error_state() {
    let provider = ScriptedProvider::new(vec![]);
    let manager = build_manager(provider, ToolRegistry::new(), 6);
    let agent_id = manager.create_agent(AgentRole::Worker, &[]).await.unwrap();

    manager.schedule_cycle(&agent_id).await.unwrap();
    let status = wait_for_state(&manager, &agent_id, AgentState::Error).await;

    assert_eq!(status.metrics.tasks_failed, 1);
}

#[tokio::test]
async fn send_message_delivers_into_target_history_and_schedules_its_cycle() {
    let provider = Arc::new(ScriptedProvider::new(vec![]));
    let manager = build_manager(Arc::clone(&provider), ToolRegistry::new(), 6);

    let target_id = manager.create_agent(AgentRole::Worker, &[]).await.unwrap();

    let sender_request = text_response(&format!(
        "<tool_requests><calls><tool_call><name>send_message</name><args>\
         <target_agent_id>{target_id}</target_agent_id><message>hello there</message>\
         </args></tool_call></calls></tool_requests>"
    ));
    provider.push(sender_request);
    provider.push(text_response("Sent it."));
    provider.push(text_response("Got it, thanks."));

    let sender_id = manager.create_agent(AgentRole::Admin, &[]).await.unwrap();

    manager.schedule_cycle(&sender_id).await.unwrap();
    wait_for_state(&manager, &sender_id, AgentState::Idle).await;
    wait_for_state(&manager, &target_id, AgentState::Idle).await;

    let handle = manager.get_agent(&target_id).await.unwrap();
    let target = handle.lock().await;
    let saw_message = target.message_history.iter().any(|message| {
        matches!(&message.content[0], ContentPart::Text { text } if text.contains("hello there"))
    });
    assert!(saw_message);
}
