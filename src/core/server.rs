//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to domain-specific services.
//!
//! Tools live in an explicit `ToolRegistry` built once in `new`. The HTTP
//! transport dispatches through the registry directly; the STDIO transport
//! goes through the rmcp `ToolRouter` derived from the same registry.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, handler::server::tool::ToolRouter, model::*,
    service::RequestContext, tool_handler,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use crate::domains::{
    market::{NewsCatalog, StrategyCatalog},
    prompts::{PromptError, PromptService},
    resources::{ResourceError, ResourceService},
    tools::{ToolError, ToolRegistry, build_tool_registry, build_tool_router},
};

/// Instructions sent to clients on `initialize`.
pub const INSTRUCTIONS: &str = "Servidor MCP de noticias financieras y estrategias FX. \
     Usa `noticias_financieras` para obtener las noticias con monedas afectadas e impacto, \
     `estrategias_disponibles` para el catálogo de estrategias de cobertura y el prompt \
     `plan_fx_acciones` para generar un plan de acciones sobre un par de divisas.";

/// The main MCP server handler.
///
/// Cheap to clone: all state is shared and read-only after construction.
#[derive(Clone)]
pub struct McpServer {
    config: Arc<Config>,

    /// Name → handler table used for every tool call.
    tools: Arc<ToolRegistry>,

    resource_service: Arc<ResourceService>,

    prompt_service: Arc<PromptService>,

    /// rmcp view of `tools`, required by `#[tool_handler]`.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server serving the given catalogs.
    ///
    /// Fails if tool registration fails (duplicate names).
    pub fn new(
        config: Config,
        news: Arc<NewsCatalog>,
        strategies: Arc<StrategyCatalog>,
    ) -> crate::Result<Self> {
        let config = Arc::new(config);

        let tools = Arc::new(build_tool_registry(
            &config,
            news.clone(),
            strategies.clone(),
        )?);
        let resource_service = Arc::new(ResourceService::new(config.clone(), news, strategies));
        let prompt_service = Arc::new(PromptService::new());

        info!(
            "Server ready with {} tools: {}",
            tools.len(),
            tools.tool_names().join(", ")
        );

        Ok(Self {
            tool_router: build_tool_router::<Self>(&tools),
            tools,
            config,
            resource_service,
            prompt_service,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// The tool registry.
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.list_tools()
    }

    /// Call a tool by name.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: JsonObject,
    ) -> Result<CallToolResult, ToolError> {
        self.tools.call_tool(name, arguments).await
    }

    /// List all available resources.
    pub async fn list_resources(&self) -> Vec<Resource> {
        self.resource_service.list_resources().await
    }

    /// Read a resource by URI.
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        self.resource_service.read_resource(uri).await
    }

    /// List all available resource templates.
    pub async fn list_resource_templates(&self) -> Vec<ResourceTemplate> {
        self.resource_service.list_resource_templates().await
    }

    /// List all available prompts.
    pub async fn list_prompts(&self) -> Vec<Prompt> {
        self.prompt_service.list_prompts().await
    }

    /// Get a prompt by name. Non-string argument values are ignored.
    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<GetPromptResult, PromptError> {
        self.prompt_service
            .get_prompt(name, arguments.map(string_arguments))
            .await
    }
}

fn string_arguments(map: JsonObject) -> HashMap<String, String> {
    map.into_iter()
        .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
        .collect()
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: self.name().to_string(),
                version: self.version().to_string(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        let resources = self.resource_service.list_resources().await;
        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        info!("Listing resource templates");
        let templates = self.resource_service.list_resource_templates().await;
        Ok(ListResourceTemplatesResult {
            resource_templates: templates,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        info!("Reading resource: {}", request.uri);
        self.resource_service
            .read_resource(&request.uri)
            .await
            .map_err(McpError::from)
    }

    #[instrument(skip(self, _context))]
    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        info!("Listing prompts");
        let prompts = self.prompt_service.list_prompts().await;
        Ok(ListPromptsResult {
            prompts,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        info!("Getting prompt: {}", request.name);
        self.prompt_service
            .get_prompt(&request.name, request.arguments.map(string_arguments))
            .await
            .map_err(McpError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn server(config: Config) -> McpServer {
        McpServer::new(
            config,
            Arc::new(NewsCatalog::builtin().unwrap()),
            Arc::new(StrategyCatalog::builtin().unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn test_default_tools() {
        let server = server(Config::default());
        let names: Vec<_> = server
            .list_tools()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        assert_eq!(names, vec!["estrategias_disponibles", "noticias_financieras"]);
        assert_eq!(server.tool_router.list_all().len(), 2);
    }

    #[test]
    fn test_get_info() {
        let info = server(Config::default()).get_info();
        assert_eq!(info.server_info.name, "fx-news-mcp");
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.prompts.is_some());
        assert!(info.instructions.unwrap().contains("noticias_financieras"));
    }

    #[tokio::test]
    async fn test_call_news_tool() {
        let server = server(Config::default());
        let result = assert_ok!(server.call_tool("noticias_financieras", JsonObject::new()).await);
        let data = result.structured_content.unwrap();
        assert_eq!(data.as_object().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_error() {
        let server = server(Config::default());
        let err = assert_err!(server.call_tool("precio_bitcoin", JsonObject::new()).await);
        assert!(matches!(err, ToolError::UnknownTool(name) if name == "precio_bitcoin"));
    }

    #[tokio::test]
    async fn test_gemini_without_key_reports_missing_credential() {
        let mut config = Config::default();
        config.generation.enabled = true;
        config.credentials.gemini_api_key = None;
        let server = server(config);

        let mut args = JsonObject::new();
        args.insert("prompt".into(), "hola".into());
        let result = assert_ok!(server.call_tool("ask_gemini", args).await);

        assert_eq!(result.is_error, Some(true));
        let error = &result.structured_content.unwrap()["error"];
        assert_eq!(error["kind"], "missing_credential");
    }

    #[tokio::test]
    async fn test_prompt_ignores_non_string_arguments() {
        let server = server(Config::default());
        let mut args = JsonObject::new();
        args.insert("par".into(), "USD/MXN".into());
        args.insert("horizonte".into(), 3.into());
        args.insert("cobertura".into(), "no".into());

        let err = assert_err!(server.get_prompt("plan_fx_acciones", Some(args)).await);
        assert!(matches!(err, PromptError::MissingArgument(name) if name == "horizonte"));
    }
}
