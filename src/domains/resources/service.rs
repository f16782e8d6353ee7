//! Resource service implementation.
//!
//! The ResourceService manages resource discovery and access. Static
//! resources come from `registry.rs`; parameterized URIs are delegated to
//! the registered `ResourceHandler`s.

use rmcp::model::{
    AnnotateAble, RawResource, ReadResourceResult, Resource, ResourceContents, ResourceTemplate,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::error::ResourceError;
use super::handlers::{ResourceHandler, ResourceReadResult, StrategyItemHandler};
use super::registry::{get_all_resource_templates, get_all_resources};
use crate::core::config::Config;
use crate::domains::market::{NewsCatalog, StrategyCatalog};

/// Service for managing and accessing resources.
pub struct ResourceService {
    config: Arc<Config>,

    news: Arc<NewsCatalog>,

    /// Static resources keyed by URI.
    resources: BTreeMap<String, ResourceEntry>,

    /// Resource templates for parameterized resources.
    templates: Vec<ResourceTemplate>,

    /// Handlers for parameterized URIs, tried in order.
    handlers: Vec<Arc<dyn ResourceHandler>>,
}

/// An entry in the resource registry.
#[derive(Debug, Clone)]
pub struct ResourceEntry {
    /// The resource metadata.
    pub resource: Resource,

    /// The content provider for this resource.
    pub content: ResourceContent,
}

/// Content of a static resource, computed at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceContent {
    /// Server name, version and transport.
    ServerInfo,

    /// The complete news mapping.
    NewsCatalog,
}

impl ResourceService {
    pub fn new(
        config: Arc<Config>,
        news: Arc<NewsCatalog>,
        strategies: Arc<StrategyCatalog>,
    ) -> Self {
        info!("Initializing ResourceService");

        let mut service = Self {
            config,
            news,
            resources: BTreeMap::new(),
            templates: get_all_resource_templates(),
            handlers: Vec::new(),
        };

        for entry in get_all_resources() {
            service.register_resource(entry);
        }
        service.register_handler(Arc::new(StrategyItemHandler::new(strategies)));

        service
    }

    /// Register a resource.
    pub fn register_resource(&mut self, entry: ResourceEntry) {
        debug!("Registering resource: {}", entry.resource.raw.uri);
        self.resources
            .insert(entry.resource.raw.uri.to_string(), entry);
    }

    /// Register a handler for parameterized URIs.
    pub fn register_handler(&mut self, handler: Arc<dyn ResourceHandler>) {
        debug!("Registering resource handler: {}", handler.uri_pattern());
        self.handlers.push(handler);
    }

    /// List all available resources, static ones first.
    pub async fn list_resources(&self) -> Vec<Resource> {
        let mut resources: Vec<Resource> = self
            .resources
            .values()
            .map(|entry| entry.resource.clone())
            .collect();

        for handler in &self.handlers {
            for meta in handler.list().await {
                let mut raw = RawResource::new(meta.uri, meta.name);
                raw.description = meta.description;
                raw.mime_type = meta.mime_type;
                resources.push(raw.no_annotation());
            }
        }

        resources
    }

    /// List all available resource templates.
    pub async fn list_resource_templates(&self) -> Vec<ResourceTemplate> {
        self.templates.clone()
    }

    /// Read a resource by URI.
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let content = if let Some(entry) = self.resources.get(uri) {
            let mime_type = entry.resource.raw.mime_type.clone();
            text_contents(uri, self.resolve(entry.content)?, mime_type)
        } else {
            let handler = self
                .handlers
                .iter()
                .find(|h| h.matches(uri))
                .ok_or_else(|| ResourceError::not_found(uri))?;
            let ResourceReadResult { content, mime_type } = handler.read(uri).await?;
            text_contents(uri, content, mime_type)
        };

        Ok(ReadResourceResult {
            contents: vec![content],
        })
    }

    fn resolve(&self, content: ResourceContent) -> Result<String, ResourceError> {
        let value = match content {
            ResourceContent::ServerInfo => serde_json::json!({
                "server": self.config.server.name,
                "version": self.config.server.version,
                "transport": self.config.transport.description(),
                "news_items": self.news.len(),
            }),
            ResourceContent::NewsCatalog => serde_json::to_value(self.news.records())?,
        };
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

fn text_contents(uri: &str, text: String, mime_type: Option<String>) -> ResourceContents {
    ResourceContents::TextResourceContents {
        uri: uri.to_string(),
        mime_type,
        text,
        meta: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> ResourceService {
        ResourceService::new(
            Arc::new(Config::default()),
            Arc::new(NewsCatalog::builtin().unwrap()),
            Arc::new(StrategyCatalog::builtin().unwrap()),
        )
    }

    fn text_of(result: &ReadResourceResult) -> &str {
        match &result.contents[0] {
            ResourceContents::TextResourceContents { text, .. } => text,
            _ => panic!("Expected text contents"),
        }
    }

    #[tokio::test]
    async fn test_list_includes_static_and_strategy_items() {
        let resources = service().list_resources().await;
        let uris: Vec<_> = resources.iter().map(|r| r.raw.uri.as_str()).collect();
        assert_eq!(
            uris,
            vec![
                "mcp://server/info",
                "noticias://catalogo",
                "estrategia://item/carry-trade",
                "estrategia://item/hedge-forward",
                "estrategia://item/butterfly",
            ]
        );
    }

    #[tokio::test]
    async fn test_read_server_info() {
        let result = service().read_resource("mcp://server/info").await.unwrap();
        let info: serde_json::Value = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(info["server"], "fx-news-mcp");
        assert_eq!(info["news_items"], 5);
    }

    #[tokio::test]
    async fn test_read_news_catalog() {
        let result = service().read_resource("noticias://catalogo").await.unwrap();
        let catalog: serde_json::Value = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(catalog.as_object().unwrap().len(), 5);
        assert_eq!(catalog["2"]["monedas_afectadas"], serde_json::json!(["USD"]));
    }

    #[tokio::test]
    async fn test_read_strategy_template() {
        let result = service()
            .read_resource("estrategia://item/hedge-forward")
            .await
            .unwrap();
        assert!(text_of(&result).contains("Hedge con forward"));
    }

    #[tokio::test]
    async fn test_every_static_resource_is_readable() {
        let service = service();
        for entry in get_all_resources() {
            let uri = entry.resource.raw.uri.as_str();
            let result = service.read_resource(uri).await.unwrap();
            let text = text_of(&result);
            assert!(serde_json::from_str::<serde_json::Value>(text).is_ok(), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_read_nonexistent_resource() {
        let result = service().read_resource("mcp://server/nonexistent").await;
        assert!(matches!(result, Err(ResourceError::NotFound(_))));
    }
}
