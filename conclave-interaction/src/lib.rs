#![deny(missing_docs)]
//! Mediates tool execution requests parsed from agent output.
//!
//! Converts a [`ParsedToolCall`] into a call against a
//! [`ToolRegistry`], and narrows what gets logged for audit: argument
//! *names* only, never values, since tool arguments routinely carry
//! user content that doesn't belong in logs.

use conclave_parser::ParsedToolCall;
use conclave_protocol::id::AgentId;
use conclave_tool::{ToolError, ToolRegistry};
use serde_json::Value;

/// Result of mediating a single tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallResult {
    /// The tool that was invoked.
    pub tool_name: String,
    /// `Ok` payload from the tool, or an error description.
    pub outcome: Result<Value, String>,
}

/// Mediates tool execution for agents against a shared [`ToolRegistry`].
pub struct InteractionHandler<'a> {
    registry: &'a ToolRegistry,
}

impl<'a> InteractionHandler<'a> {
    /// Create a handler over the given registry.
    pub fn new(registry: &'a ToolRegistry) -> Self {
        Self { registry }
    }

    /// Execute a single tool call requested by an agent.
    pub async fn execute_tool_call(
        &self,
        agent_id: &AgentId,
        call: &ParsedToolCall,
    ) -> ToolCallResult {
        let arg_names: Vec<&str> = call.args.keys().map(String::as_str).collect();
        tracing::info!(
            agent = %agent_id,
            tool = %call.name,
            args = ?arg_names,
            "agent invoking tool"
        );

        let Some(tool) = self.registry.get(&call.name) else {
            let error = ToolError::NotFound(call.name.clone()).to_string();
            tracing::warn!(agent = %agent_id, tool = %call.name, "tool not found");
            return ToolCallResult {
                tool_name: call.name.clone(),
                outcome: Err(error),
            };
        };

        let input = serde_json::to_value(&call.args).unwrap_or(Value::Null);
        let outcome = tool.call(input).await.map_err(|e| e.to_string());

        if let Err(ref error) = outcome {
            tracing::warn!(agent = %agent_id, tool = %call.name, %error, "tool execution failed");
        }

        ToolCallResult {
            tool_name: call.name.clone(),
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Arc;

    struct EchoTool;

    impl conclave_tool::ToolDyn for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "echoes input"
        }
        fn input_schema(&self) -> Value {
            serde_json::json!({"type": "object"})
        }
        fn call(
            &self,
            input: Value,
        ) -> Pin<Box<dyn Future<Output = Result<Value, ToolError>> + Send + '_>> {
            Box::pin(async move { Ok(input) })
        }
    }

    #[tokio::test]
    async fn executes_registered_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));
        let handler = InteractionHandler::new(&registry);

        let mut args = HashMap::new();
        args.insert("msg".to_string(), "hi".to_string());
        let call = ParsedToolCall {
            name: "echo".into(),
            args,
        };

        let result = handler
            .execute_tool_call(&AgentId::new("a1"), &call)
            .await;
        assert_eq!(result.tool_name, "echo");
        assert!(result.outcome.is_ok());
    }

    #[tokio::test]
    async fn missing_tool_reports_not_found() {
        let registry = ToolRegistry::new();
        let handler = InteractionHandler::new(&registry);

        let call = ParsedToolCall {
            name: "missing".into(),
            args: HashMap::new(),
        };

        let result = handler
            .execute_tool_call(&AgentId::new("a1"), &call)
            .await;
        assert!(result.outcome.is_err());
    }
}
