//! Property-based tests: the extraction functions never panic on
//! arbitrary input, and a well-formed tag round-trips through
//! extraction with its argument value preserved.

use conclave_parser::{extract_state_change_request, extract_task_list, parse_tool_calls};
use proptest::prelude::*;

proptest! {
    #[test]
    fn parse_tool_calls_never_panics(text in ".*") {
        let _ = parse_tool_calls(&text);
    }

    #[test]
    fn extract_task_list_never_panics(text in ".*") {
        let _ = extract_task_list(&text);
    }

    #[test]
    fn state_change_round_trips_through_extraction(state in "[a-zA-Z_]{1,32}") {
        let text = format!("<state_change>{state}</state_change>");
        prop_assert_eq!(extract_state_change_request(&text), Some(state));
    }

    #[test]
    fn single_tool_call_round_trips_through_parsing(
        name in "[a-zA-Z_]{1,16}",
        arg_value in "[a-zA-Z0-9 ]{0,32}",
    ) {
        let text = format!(
            "<tool_requests><calls><tool_call><name>{name}</name><args><value>{arg_value}</value></args></tool_call></calls></tool_requests>"
        );
        let result = parse_tool_calls(&text);
        prop_assert!(result.success);
        prop_assert_eq!(result.tool_calls.len(), 1);
        prop_assert_eq!(&result.tool_calls[0].name, &name);
        prop_assert_eq!(result.tool_calls[0].args.get("value"), Some(&arg_value));
    }
}
