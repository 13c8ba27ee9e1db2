#![deny(missing_docs)]
//! Parses structured directives out of free-form agent model output.
//!
//! Agent responses are plain text that may embed small XML fragments:
//! a `<tool_requests>` block requesting tool calls, a `<plan>` from a
//! planning agent, a `<task_list>` from a project-manager agent, or a
//! `<create_worker_request>` asking the runtime to spin up a new agent.
//!
//! Parsing degrades gracefully: a malformed `<tool_requests>` block
//! falls back to a naive substring extraction rather than discarding
//! the model's intent outright. Callers can check
//! [`ToolCallParse::fallback`] to see whether the degraded path was used.

mod xmltree;

use std::collections::HashMap;
use xmltree::{XmlElement, parse_fragment};

/// A single requested tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedToolCall {
    /// The tool's name.
    pub name: String,
    /// Arguments as flat string key/value pairs (the wire format doesn't
    /// carry types — tool implementations coerce as needed).
    pub args: HashMap<String, String>,
}

/// Outcome of parsing a `<tool_requests>` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolCallParse {
    /// Whether at least one tool call was recovered.
    pub success: bool,
    /// The recovered tool calls, if any.
    pub tool_calls: Vec<ParsedToolCall>,
    /// Why parsing failed, if it did.
    pub error: Option<String>,
    /// Whether the result came from the degraded fallback parser
    /// rather than a full XML parse.
    pub fallback: bool,
}

fn slice_between<'a>(text: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let start = text.find(open)?;
    let end_tag_pos = text.find(close)?;
    let end = end_tag_pos + close.len();
    if end <= start {
        return None;
    }
    Some(&text[start..end])
}

/// Parse tool calls out of agent output text.
///
/// Looks for a `<tool_requests><calls><tool_call>...` block. On XML
/// parse failure, falls back to [`fallback_parse`].
pub fn parse_tool_calls(text: &str) -> ToolCallParse {
    let Some(xml_block) = slice_between(text, "<tool_requests>", "</tool_requests>") else {
        return ToolCallParse {
            success: false,
            error: Some("no tool_requests block found".into()),
            ..Default::default()
        };
    };

    let root = match parse_fragment(xml_block) {
        Ok(root) => root,
        Err(error) => {
            tracing::debug!(%error, "tool_requests xml parse failed, attempting fallback");
            return fallback_parse(text);
        }
    };

    let Some(calls_elem) = root.find("calls") else {
        return ToolCallParse {
            success: false,
            error: Some("no <calls> element found".into()),
            ..Default::default()
        };
    };

    let tool_calls: Vec<ParsedToolCall> = calls_elem
        .find_all("tool_call")
        .filter_map(parse_single_tool_call)
        .collect();

    if tool_calls.is_empty() {
        return ToolCallParse {
            success: false,
            error: Some("no valid tool calls found".into()),
            ..Default::default()
        };
    }

    ToolCallParse {
        success: true,
        tool_calls,
        error: None,
        fallback: false,
    }
}

fn parse_single_tool_call(elem: &XmlElement) -> Option<ParsedToolCall> {
    let name = elem.find("name")?.text.clone()?;
    let name = name.trim().to_string();
    if name.is_empty() {
        tracing::debug!("tool call missing <name> element");
        return None;
    }

    let Some(args_elem) = elem.find("args") else {
        tracing::debug!(tool = %name, "tool call has no <args> element, using empty args");
        return Some(ParsedToolCall {
            name,
            args: HashMap::new(),
        });
    };

    let args = args_elem
        .children
        .iter()
        .map(|child| (child.tag.clone(), child.text.clone().unwrap_or_default()))
        .collect();

    Some(ParsedToolCall { name, args })
}

/// Degraded parser used when the `<tool_requests>` block fails to
/// parse as XML. Extracts a single tool call by naive substring
/// slicing, recognizing only the `target_agent_id` and `message`
/// arguments (the common inter-agent messaging shape).
pub fn fallback_parse(text: &str) -> ToolCallParse {
    let Some(name) = slice_between(text, "<name>", "</name>")
        .and_then(|block| block.strip_prefix("<name>"))
        .and_then(|block| block.strip_suffix("</name>"))
        .map(|s| s.trim().to_string())
    else {
        return ToolCallParse {
            success: false,
            error: Some("both xml and fallback parsing failed: no <name> found".into()),
            ..Default::default()
        };
    };

    let mut args = HashMap::new();
    if let Some(v) = extract_tag_value(text, "target_agent_id") {
        args.insert("target_agent_id".to_string(), v);
    }
    if let Some(v) = extract_tag_value(text, "message") {
        args.insert("message".to_string(), v);
    }

    tracing::debug!(tool = %name, "using fallback parser, result may be incomplete");

    ToolCallParse {
        success: true,
        tool_calls: vec![ParsedToolCall { name, args }],
        error: None,
        fallback: true,
    }
}

fn extract_tag_value(text: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = text.find(&open)? + open.len();
    let end = text[start..].find(&close)? + start;
    Some(text[start..end].trim().to_string())
}

/// A plan extracted from a `<plan>` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    /// Free-form fields keyed by tag name (e.g. `summary`, `approach`).
    pub fields: HashMap<String, String>,
    /// The `<objectives>` list, if present.
    pub objectives: Vec<String>,
    /// The `<deliverables>` list, if present.
    pub deliverables: Vec<String>,
}

fn dash_list_items(text: &str) -> Vec<String> {
    text.trim()
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('-'))
        .map(|line| line[1..].trim().to_string())
        .collect()
}

/// Extract a `<plan>` block from agent output, if present.
pub fn extract_plan(text: &str) -> Option<Plan> {
    let xml_block = slice_between(text, "<plan>", "</plan>")?;
    let root = parse_fragment(xml_block)
        .inspect_err(|error| tracing::error!(%error, "error extracting plan"))
        .ok()?;

    let mut plan = Plan::default();
    for child in &root.children {
        let Some(text) = &child.text else { continue };
        match child.tag.as_str() {
            "objectives" => plan.objectives = dash_list_items(text),
            "deliverables" => plan.deliverables = dash_list_items(text),
            _ => {
                plan.fields.insert(child.tag.clone(), text.trim().to_string());
            }
        }
    }
    Some(plan)
}

/// Extract a `<task_list>` block (from a project-manager agent) as a
/// list of flat field maps, one per `<task>`.
pub fn extract_task_list(text: &str) -> Option<Vec<HashMap<String, String>>> {
    let xml_block = slice_between(text, "<task_list>", "</task_list>")?;
    let root = parse_fragment(xml_block)
        .inspect_err(|error| tracing::error!(%error, "error extracting task list"))
        .ok()?;

    let tasks: Vec<HashMap<String, String>> = root
        .find_all("task")
        .map(|task_elem| {
            task_elem
                .children
                .iter()
                .filter_map(|c| c.text.clone().map(|t| (c.tag.clone(), t.trim().to_string())))
                .collect()
        })
        .filter(|task: &HashMap<String, String>| !task.is_empty())
        .collect();

    if tasks.is_empty() { None } else { Some(tasks) }
}

/// Extract a `<state_change>` directive: an agent's own request to move
/// to a new named state, independent of a tool call or plan/task
/// hand-off. Returns the raw state name as written by the model — the
/// caller (which knows the concrete state enum) parses it further.
pub fn extract_state_change_request(text: &str) -> Option<String> {
    extract_tag_value(text, "state_change").filter(|s| !s.is_empty())
}

/// Extract a `<create_worker_request>` block. Returns `None` unless the
/// result includes a `task_id` field, which is mandatory for a worker
/// creation request to be actionable.
pub fn extract_create_worker_request(text: &str) -> Option<HashMap<String, String>> {
    let xml_block = slice_between(text, "<create_worker_request>", "</create_worker_request>")?;
    let root = parse_fragment(xml_block)
        .inspect_err(|error| tracing::error!(%error, "error extracting create_worker_request"))
        .ok()?;

    let request: HashMap<String, String> = root
        .children
        .iter()
        .filter_map(|c| c.text.clone().map(|t| (c.tag.clone(), t.trim().to_string())))
        .collect();

    request.contains_key("task_id").then_some(request)
}
