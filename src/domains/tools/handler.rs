//! Tool handler abstraction.
//!
//! Every tool implements `ToolHandler`; the registry stores handlers as
//! trait objects and both transports dispatch through them.

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ToolError;

/// A named, remotely invocable tool.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Tool metadata: name, description and input schema.
    fn tool(&self) -> Tool;

    /// Execute the tool with the caller-supplied arguments.
    async fn call(&self, arguments: JsonObject) -> Result<CallToolResult, ToolError>;
}

/// Deserialize tool arguments into a typed parameter struct.
pub fn parse_arguments<P: DeserializeOwned>(arguments: JsonObject) -> Result<P, ToolError> {
    serde_json::from_value(serde_json::Value::Object(arguments))
        .map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

/// Successful result with a text rendering plus structured content.
pub fn structured_result<T: Serialize>(
    text: impl Into<String>,
    data: &T,
) -> Result<CallToolResult, ToolError> {
    let structured =
        serde_json::to_value(data).map_err(|e| ToolError::execution_failed(e.to_string()))?;

    Ok(CallToolResult {
        content: vec![Content::text(text.into())],
        structured_content: Some(structured),
        is_error: Some(false),
        meta: None,
    })
}

/// Error result for a tool that ran and failed.
pub fn error_result(error: &ToolError) -> CallToolResult {
    CallToolResult {
        content: vec![Content::text(error.to_string())],
        structured_content: Some(serde_json::json!({ "error": error.to_json() })),
        is_error: Some(true),
        meta: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Params {
        name: String,
        #[serde(default)]
        count: u32,
    }

    fn object(value: serde_json::Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_parse_arguments() {
        let params: Params = parse_arguments(object(serde_json::json!({ "name": "x" }))).unwrap();
        assert_eq!(params.name, "x");
        assert_eq!(params.count, 0);
    }

    #[test]
    fn test_parse_arguments_rejects_bad_input() {
        let result: Result<Params, _> = parse_arguments(object(serde_json::json!({ "count": 1 })));
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[test]
    fn test_error_result_is_structured() {
        let result = error_result(&ToolError::execution_failed("boom"));
        assert_eq!(result.is_error, Some(true));

        let structured = result.structured_content.unwrap();
        assert_eq!(structured["error"]["kind"], "tool_execution");
        assert_eq!(structured["error"]["message"], "Execution failed: boom");
    }
}
