//! Error types and handling for the MCP server.
//!
//! This module defines a unified error type that can represent errors from
//! all domains, so startup code can propagate any of them with `?`.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the tools domain.
    #[error("Tool error: {0}")]
    Tool(#[from] crate::domains::tools::ToolError),

    /// Error originating from the resources domain.
    #[error("Resource error: {0}")]
    Resource(#[from] crate::domains::resources::ResourceError),

    /// Error originating from the prompts domain.
    #[error("Prompt error: {0}")]
    Prompt(#[from] crate::domains::prompts::PromptError),

    /// Invalid catalog data.
    #[error("Market data error: {0}")]
    MarketData(#[from] crate::domains::market::MarketDataError),

    /// Transport failure (bind, serve).
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::market::MarketDataError;
    use crate::domains::tools::ToolError;

    #[test]
    fn test_domain_errors_convert() {
        let err: Error = ToolError::duplicate_tool("noticias_financieras").into();
        assert!(matches!(err, Error::Tool(ToolError::DuplicateTool(_))));

        let err: Error = MarketDataError::DuplicateNewsId(3).into();
        assert!(err.to_string().starts_with("Market data error"));
    }
}
