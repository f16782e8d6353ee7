//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are executable functions that can be called by MCP clients.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `handler.rs` - `ToolHandler` trait and result helpers
//! - `registry.rs` - Name → handler table, dispatch, and startup wiring
//! - `router.rs` - rmcp ToolRouter built from the registry (STDIO transport)
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Define params and implement `ToolHandler`
//! 3. Export in `definitions/mod.rs`
//! 4. Register it in `build_tool_registry()`
//!
//! Both transports pick the tool up from the registry.

pub mod definitions;
mod error;
mod handler;
mod registry;
pub mod router;

pub use error::ToolError;
pub use handler::{ToolHandler, error_result, parse_arguments, structured_result};
pub use registry::{ToolRegistry, build_tool_registry};
pub use router::build_tool_router;
