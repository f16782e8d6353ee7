//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! The STDIO transport is driven by rmcp, which dispatches through a
//! `ToolRouter`. Each registered handler becomes one dynamic route, so the
//! router and the registry always expose the same tools.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    model::Tool,
};
use std::sync::Arc;

use super::handler::ToolHandler;
use super::registry::{ToolRegistry, invoke};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(registry: &ToolRegistry) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    registry
        .entries()
        .fold(ToolRouter::new(), |router, (tool, handler)| {
            router.with_route(create_route(tool.clone(), handler.clone()))
        })
}

fn create_route<S>(tool: Tool, handler: Arc<dyn ToolHandler>) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    ToolRoute::new_dyn(tool, move |ctx: ToolCallContext<'_, S>| {
        let args = ctx.arguments.clone().unwrap_or_default();
        let handler = handler.clone();
        async move { invoke(handler, args).await.map_err(McpError::from) }.boxed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::domains::market::{NewsCatalog, StrategyCatalog};
    use crate::domains::tools::build_tool_registry;

    struct TestServer {}

    fn registry(config: &Config) -> ToolRegistry {
        build_tool_registry(
            config,
            Arc::new(NewsCatalog::builtin().unwrap()),
            Arc::new(StrategyCatalog::builtin().unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(&registry(&Config::default()));
        let tools = router.list_all();
        assert_eq!(tools.len(), 2);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"noticias_financieras"));
        assert!(names.contains(&"estrategias_disponibles"));
    }

    #[test]
    fn test_registry_matches_router() {
        let mut config = Config::default();
        config.generation.enabled = true;
        let registry = registry(&config);

        let router: ToolRouter<TestServer> = build_tool_router(&registry);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry.len(), router_names.len());
        for name in registry.tool_names() {
            assert!(router_names.contains(&name));
        }
    }
}
