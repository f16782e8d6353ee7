//! Resources domain module.
//!
//! Resources represent read-only data that MCP clients can fetch by URI:
//! server information, the news catalog and individual strategies.
//!
//! ## Architecture
//!
//! - `definitions/` - Static resource definitions (one file per resource)
//! - `handlers.rs` - Handlers for parameterized URIs (`estrategia://item/{id}`)
//! - `registry.rs` - Central resource and template registration
//! - `service.rs` - Resource service for listing and reading
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file in `definitions/` (e.g., `my_resource.rs`)
//! 2. Implement the `ResourceDefinition` trait
//! 3. Export in `definitions/mod.rs`
//! 4. Register in `registry.rs`

pub mod definitions;
mod error;
mod handlers;
mod registry;
mod service;

pub use definitions::ResourceDefinition;
pub use error::ResourceError;
pub use handlers::{ResourceHandler, ResourceMetadata, ResourceReadResult, StrategyItemHandler};
pub use registry::{get_all_resource_templates, get_all_resources};
pub use service::{ResourceContent, ResourceEntry, ResourceService};
