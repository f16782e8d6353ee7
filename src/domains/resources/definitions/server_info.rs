//! Server info resource definition.

use super::ResourceDefinition;
use crate::domains::resources::service::ResourceContent;

/// Server information resource (dynamic).
///
/// Resolved at read time from the running configuration: server name,
/// version and active transport.
pub struct ServerInfoResource;

impl ResourceDefinition for ServerInfoResource {
    const URI: &'static str = "mcp://server/info";
    const NAME: &'static str = "Server Information";
    const DESCRIPTION: &'static str = "Information about this MCP server";
    const MIME_TYPE: &'static str = "application/json";

    fn content() -> ResourceContent {
        ResourceContent::ServerInfo
    }
}
