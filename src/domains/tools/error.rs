//! Tool-specific error types.

use rmcp::ErrorData as McpError;
use thiserror::Error;

use crate::domains::generation::GenerationError;

/// Errors that can occur while registering or dispatching tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A tool with the same name is already registered.
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    /// No tool is registered under the requested name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Invalid arguments were provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The tool execution failed.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// The text generation backend failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl ToolError {
    /// Create a new "duplicate tool" error.
    pub fn duplicate_tool(name: impl Into<String>) -> Self {
        Self::DuplicateTool(name.into())
    }

    /// Create a new "unknown tool" error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "execution failed" error.
    pub fn execution_failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }

    /// Machine-readable error kind, sent to clients alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateTool(_) => "duplicate_tool",
            Self::UnknownTool(_) => "unknown_tool",
            Self::InvalidArguments(_) => "invalid_arguments",
            Self::ExecutionFailed(_) => "tool_execution",
            Self::Generation(e) => e.kind(),
        }
    }

    /// Whether the tool ran and failed, as opposed to never being run.
    ///
    /// Execution failures are reported inside a tool result with
    /// `isError: true`; the others become protocol errors.
    pub fn is_execution_failure(&self) -> bool {
        matches!(self, Self::ExecutionFailed(_) | Self::Generation(_))
    }

    /// Structured error payload: `{ "kind": ..., "message": ... }`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        })
    }
}

impl From<ToolError> for McpError {
    fn from(error: ToolError) -> Self {
        let data = Some(serde_json::json!({ "kind": error.kind() }));
        match error {
            ToolError::UnknownTool(_) | ToolError::InvalidArguments(_) => {
                McpError::invalid_params(error.to_string(), data)
            }
            _ => McpError::internal_error(error.to_string(), data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(ToolError::unknown_tool("x").kind(), "unknown_tool");
        assert_eq!(ToolError::duplicate_tool("x").kind(), "duplicate_tool");
        assert_eq!(ToolError::execution_failed("x").kind(), "tool_execution");
        assert_eq!(
            ToolError::from(GenerationError::MissingCredential("GEMINI_API_KEY")).kind(),
            "missing_credential"
        );
    }

    #[test]
    fn test_execution_failures() {
        assert!(ToolError::execution_failed("boom").is_execution_failure());
        assert!(ToolError::from(GenerationError::upstream("503")).is_execution_failure());
        assert!(!ToolError::unknown_tool("x").is_execution_failure());
        assert!(!ToolError::invalid_arguments("x").is_execution_failure());
    }

    #[test]
    fn test_unknown_tool_maps_to_invalid_params() {
        let error: McpError = ToolError::unknown_tool("nope").into();
        assert_eq!(error.code.0, -32602);
        assert!(error.message.contains("nope"));
    }
}
