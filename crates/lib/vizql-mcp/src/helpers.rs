use rmcp::ErrorData;
use rmcp::model::{CallToolResult, Content};
use serde_json::Value;
use vizql_core::error::ToolError;

/// Folds a bridge outcome into one tool result shape.
///
/// Failures become error results carrying the tagged JSON object, never
/// protocol-level errors, so callers always have data to branch on.
pub(crate) fn tool_outcome(result: Result<Value, ToolError>) -> Result<CallToolResult, ErrorData> {
    match result {
        Ok(value) => Ok(CallToolResult::success(vec![Content::json(value)?])),
        Err(error) => Ok(CallToolResult::error(vec![Content::json(error.to_value())?])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_outcomes_are_not_flagged() {
        let result = tool_outcome(Ok(json!({ "data": [] }))).unwrap();
        assert_eq!(result.is_error, Some(false));
    }

    #[test]
    fn failures_are_flagged_but_still_results() {
        let result = tool_outcome(Err(ToolError::config("no token"))).unwrap();
        assert_eq!(result.is_error, Some(true));
    }
}
