//! Tool Registry - central registration and dispatch for all tools.
//!
//! The registry is an explicit name → handler table, filled once at startup
//! by `build_tool_registry` and read-only afterwards. Both transports go
//! through it: HTTP calls `ToolRegistry::call_tool` directly, STDIO uses the
//! rmcp `ToolRouter` built from it in `router.rs`.

use futures::FutureExt;
use rmcp::model::{CallToolResult, JsonObject, Tool};
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::definitions::{AskGeminiTool, FinancialNewsTool, NewsAnalysisTool, StrategiesTool};
use super::error::ToolError;
use super::handler::{ToolHandler, error_result};
use crate::core::config::Config;
use crate::domains::generation::{GeminiClient, TextGenerationService};
use crate::domains::market::{NewsCatalog, StrategyCatalog};

/// A registered tool: its metadata and the handler that runs it.
#[derive(Clone)]
struct RegisteredTool {
    tool: Tool,
    handler: Arc<dyn ToolHandler>,
}

/// Tool registry - maps tool names to handlers.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, RegisteredTool>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its tool name.
    ///
    /// Fails with `ToolError::DuplicateTool` if the name is already taken;
    /// the existing registration is kept.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) -> Result<(), ToolError> {
        let tool = handler.tool();
        let name = tool.name.to_string();

        if self.tools.contains_key(&name) {
            return Err(ToolError::duplicate_tool(name));
        }

        info!("Registering tool: {}", name);
        self.tools.insert(name, RegisteredTool { tool, handler });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get all tool names, sorted.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Get all tools as Tool models (metadata).
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.values().map(|t| t.tool.clone()).collect()
    }

    /// Registered tools and their handlers, sorted by name.
    pub(super) fn entries(&self) -> impl Iterator<Item = (&Tool, &Arc<dyn ToolHandler>)> {
        self.tools.values().map(|t| (&t.tool, &t.handler))
    }

    /// Dispatch a tool call by name.
    ///
    /// Returns `UnknownTool` or `InvalidArguments` as errors. A handler that
    /// fails while running (or panics) yields `Ok` with an error result so the
    /// caller gets a structured `{kind, message}` payload.
    #[instrument(skip(self, arguments))]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: JsonObject,
    ) -> Result<CallToolResult, ToolError> {
        let Some(entry) = self.tools.get(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::unknown_tool(name));
        };

        invoke(entry.handler.clone(), arguments).await
    }
}

/// Run a handler and contain its failures at the dispatch boundary.
pub(super) async fn invoke(
    handler: Arc<dyn ToolHandler>,
    arguments: JsonObject,
) -> Result<CallToolResult, ToolError> {
    match AssertUnwindSafe(handler.call(arguments)).catch_unwind().await {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(error)) if error.is_execution_failure() => {
            warn!("Tool execution failed: {}", error);
            Ok(error_result(&error))
        }
        Ok(Err(error)) => Err(error),
        Err(panic) => {
            let error = ToolError::execution_failed(format!(
                "tool panicked: {}",
                panic_message(panic.as_ref())
            ));
            warn!("{}", error);
            Ok(error_result(&error))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Build the registry with every tool this server exposes.
///
/// `ask_gemini` and `analisis_noticias` share one Gemini client and are only
/// registered when `config.generation.enabled` is set.
pub fn build_tool_registry(
    config: &Config,
    news: Arc<NewsCatalog>,
    strategies: Arc<StrategyCatalog>,
) -> Result<ToolRegistry, ToolError> {
    let mut registry = ToolRegistry::new();

    registry.register(Arc::new(FinancialNewsTool::new(news.clone())))?;
    registry.register(Arc::new(StrategiesTool::new(strategies)))?;

    if config.generation.enabled {
        let client: Arc<dyn TextGenerationService> = Arc::new(GeminiClient::new(
            &config.generation,
            config.credentials.gemini_api_key.clone(),
        )?);
        let model = config.generation.default_model;
        registry.register(Arc::new(AskGeminiTool::new(client.clone(), model)))?;
        registry.register(Arc::new(NewsAnalysisTool::new(news, client, model)))?;
    }

    info!("Tool registry ready: {:?}", registry.tool_names());
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rmcp::model::Content;
    use std::borrow::Cow;
    use tokio_test::{assert_err, assert_ok};

    fn catalogs() -> (Arc<NewsCatalog>, Arc<StrategyCatalog>) {
        (
            Arc::new(NewsCatalog::builtin().unwrap()),
            Arc::new(StrategyCatalog::builtin().unwrap()),
        )
    }

    fn registry() -> ToolRegistry {
        let (news, strategies) = catalogs();
        build_tool_registry(&Config::default(), news, strategies).unwrap()
    }

    /// Test double whose behaviour is picked by name.
    struct StubTool {
        name: &'static str,
    }

    #[async_trait]
    impl ToolHandler for StubTool {
        fn tool(&self) -> Tool {
            Tool {
                name: Cow::Borrowed(self.name),
                title: None,
                description: Some("stub".into()),
                input_schema: Arc::new(JsonObject::new()),
                output_schema: None,
                annotations: None,
                icons: None,
                meta: None,
            }
        }

        async fn call(&self, _arguments: JsonObject) -> Result<CallToolResult, ToolError> {
            match self.name {
                "fails" => Err(ToolError::execution_failed("backend down")),
                "panics" => panic!("handler exploded"),
                "rejects" => Err(ToolError::invalid_arguments("bad input")),
                _ => Ok(CallToolResult::success(vec![Content::text("ok")])),
            }
        }
    }

    #[test]
    fn test_default_registry_tool_names() {
        let registry = registry();
        assert_eq!(
            registry.tool_names(),
            vec!["estrategias_disponibles", "noticias_financieras"]
        );
    }

    #[test]
    fn test_gemini_tool_registered_when_enabled() {
        let (news, strategies) = catalogs();
        let mut config = Config::default();
        config.generation.enabled = true;

        let registry = build_tool_registry(&config, news, strategies).unwrap();
        assert!(registry.contains("ask_gemini"));
        assert!(registry.contains("analisis_noticias"));
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = ToolRegistry::new();
        assert_ok!(registry.register(Arc::new(StubTool { name: "echo" })));

        let err = registry
            .register(Arc::new(StubTool { name: "echo" }))
            .unwrap_err();
        assert!(matches!(err, ToolError::DuplicateTool(ref n) if n == "echo"));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let registry = registry();
        let result = registry.call_tool("unknown", JsonObject::new()).await;
        assert!(matches!(result, Err(ToolError::UnknownTool(ref n)) if n == "unknown"));
    }

    #[tokio::test]
    async fn test_call_news_tool() {
        let registry = registry();
        let result = assert_ok!(
            registry
                .call_tool("noticias_financieras", JsonObject::new())
                .await
        );
        assert_eq!(result.is_error, Some(false));
    }

    #[tokio::test]
    async fn test_execution_failure_becomes_error_result() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(StubTool { name: "fails" })).unwrap();

        let result = assert_ok!(registry.call_tool("fails", JsonObject::new()).await);
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result.structured_content.unwrap()["error"]["kind"],
            "tool_execution"
        );
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(StubTool { name: "panics" })).unwrap();
        registry.register(Arc::new(StubTool { name: "echo" })).unwrap();

        let result = assert_ok!(registry.call_tool("panics", JsonObject::new()).await);
        assert_eq!(result.is_error, Some(true));
        let message = result.structured_content.unwrap()["error"]["message"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(message.contains("handler exploded"));

        // The registry keeps serving after a failed call.
        let next = assert_ok!(registry.call_tool("echo", JsonObject::new()).await);
        assert_ne!(next.is_error, Some(true));
    }

    #[tokio::test]
    async fn test_invalid_arguments_propagate() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(StubTool { name: "rejects" })).unwrap();

        let result = registry.call_tool("rejects", JsonObject::new()).await;
        assert_err!(&result);
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }
}
