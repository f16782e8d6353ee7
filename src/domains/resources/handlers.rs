//! Resource handlers module.
//!
//! Handlers serve parameterized URIs (the ones advertised as resource
//! templates) whose content is computed from injected data.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::ResourceError;
use crate::domains::market::StrategyCatalog;

/// Metadata about a resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceMetadata {
    /// The URI of the resource.
    pub uri: String,

    /// The name of the resource.
    pub name: String,

    /// A description of the resource.
    pub description: Option<String>,

    /// The MIME type of the resource content.
    pub mime_type: Option<String>,
}

/// The result of reading a resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceReadResult {
    pub content: String,
    pub mime_type: Option<String>,
}

impl ResourceReadResult {
    pub fn text(content: impl Into<String>, mime_type: &str) -> Self {
        Self {
            content: content.into(),
            mime_type: Some(mime_type.to_string()),
        }
    }
}

/// Trait for implementing custom resource handlers.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    /// Get the URI pattern this handler matches.
    ///
    /// This can be an exact URI or a prefix pattern (e.g., "estrategia://item/*").
    fn uri_pattern(&self) -> &str;

    /// Check if this handler can handle the given URI.
    fn matches(&self, uri: &str) -> bool {
        let pattern = self.uri_pattern();
        match pattern.strip_suffix('*') {
            Some(prefix) => uri.starts_with(prefix),
            None => uri == pattern,
        }
    }

    /// List concrete resources reachable through this handler.
    async fn list(&self) -> Vec<ResourceMetadata>;

    /// Read the content of a resource.
    async fn read(&self, uri: &str) -> Result<ResourceReadResult, ResourceError>;
}

// ============================================================================
// Strategy item handler
// ============================================================================

/// Serves `estrategia://item/{id}` from the strategy catalog.
pub struct StrategyItemHandler {
    catalog: Arc<StrategyCatalog>,
}

impl StrategyItemHandler {
    pub const PREFIX: &'static str = "estrategia://item/";
    pub const PATTERN: &'static str = "estrategia://item/*";
    pub const URI_TEMPLATE: &'static str = "estrategia://item/{id}";

    pub fn new(catalog: Arc<StrategyCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ResourceHandler for StrategyItemHandler {
    fn uri_pattern(&self) -> &str {
        Self::PATTERN
    }

    async fn list(&self) -> Vec<ResourceMetadata> {
        self.catalog
            .all()
            .iter()
            .map(|s| ResourceMetadata {
                uri: format!("{}{}", Self::PREFIX, s.id),
                name: s.titulo.clone(),
                description: Some(format!("Riesgo {}, horizonte {}", s.riesgo, s.horizonte)),
                mime_type: Some("application/json".to_string()),
            })
            .collect()
    }

    /// An unknown id is not an error: the client gets a hint listing the
    /// valid ids instead.
    async fn read(&self, uri: &str) -> Result<ResourceReadResult, ResourceError> {
        let id = uri
            .strip_prefix(Self::PREFIX)
            .filter(|id| !id.is_empty() && !id.contains('/'))
            .ok_or_else(|| ResourceError::invalid_uri(uri))?;

        match self.catalog.get(id) {
            Some(strategy) => Ok(ResourceReadResult::text(
                serde_json::to_string_pretty(strategy)?,
                "application/json",
            )),
            None => Ok(ResourceReadResult::text(
                format!(
                    "No encontrada: {}. Usa uno de: {}",
                    id,
                    self.catalog.ids().join(", ")
                ),
                "text/plain",
            )),
        }
    }
}
