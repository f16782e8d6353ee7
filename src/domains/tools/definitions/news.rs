//! Financial news tool definition.
//!
//! `noticias_financieras` returns the static news catalog keyed by id.
//! Called without arguments it always returns the complete catalog; the
//! optional filters narrow it down by affected currency.

use async_trait::async_trait;
use rmcp::{
    handler::server::tool::schema_for_type,
    model::{CallToolResult, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::domains::market::{MatchMode, NewsCatalog, NewsItem, NewsQuery};
use crate::domains::tools::{ToolError, ToolHandler, parse_arguments, structured_result};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the financial news tool. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct FinancialNewsParams {
    /// Only return news affecting these currency codes (e.g. ["USD", "EUR"]).
    #[serde(default)]
    pub currencies: Option<Vec<String>>,

    /// "any": the item affects at least one currency; "all": every currency.
    #[serde(default)]
    pub mode: MatchMode,

    /// Maximum number of items to return (1-10). Omit to return every match.
    #[serde(default)]
    pub limit: Option<usize>,
}

// ============================================================================
// Output Structure
// ============================================================================

/// Text rendering: the selection plus the filter that produced it.
#[derive(Debug, Serialize)]
struct NewsEnvelope<'a> {
    params: EchoedParams<'a>,
    count_total: usize,
    count_filtradas: usize,
    count_devueltas: usize,
    noticias: &'a BTreeMap<u32, &'a NewsItem>,
}

#[derive(Debug, Serialize)]
struct EchoedParams<'a> {
    currencies: Option<&'a [String]>,
    mode: MatchMode,
    limit: Option<usize>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Financial news tool - serves the injected news catalog.
pub struct FinancialNewsTool {
    catalog: Arc<NewsCatalog>,
}

impl FinancialNewsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "noticias_financieras";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Devuelve las noticias financieras disponibles indexadas por id, \
         con las monedas afectadas y la calificación de impacto de cada una. \
         Filtros opcionales: currencies, mode (any/all) y limit (1-10).";

    pub fn new(catalog: Arc<NewsCatalog>) -> Self {
        Self { catalog }
    }

    /// Execute the tool logic.
    ///
    /// `structuredContent` is the id → record mapping; the text content is a
    /// pretty-printed envelope with counts.
    #[instrument(skip_all, fields(mode = ?params.mode, limit = ?params.limit))]
    pub fn execute(&self, params: &FinancialNewsParams) -> Result<CallToolResult, ToolError> {
        let query = NewsQuery::new(params.currencies.clone(), params.mode, params.limit)
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;

        let selection = self.catalog.select(&query);
        info!(
            "News tool returning {} of {} items ({} matched)",
            selection.items.len(),
            selection.total,
            selection.matched
        );

        let envelope = NewsEnvelope {
            params: EchoedParams {
                currencies: (!query.currencies().is_empty()).then(|| query.currencies()),
                mode: query.mode(),
                limit: query.limit(),
            },
            count_total: selection.total,
            count_filtradas: selection.matched,
            count_devueltas: selection.items.len(),
            noticias: &selection.items,
        };

        let text = serde_json::to_string_pretty(&envelope)
            .map_err(|e| ToolError::execution_failed(e.to_string()))?;

        structured_result(text, &selection.items)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<FinancialNewsParams>().into(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: Some("Noticias financieras".into()),
        }
    }
}

#[async_trait]
impl ToolHandler for FinancialNewsTool {
    fn tool(&self) -> Tool {
        Self::to_tool()
    }

    async fn call(&self, arguments: JsonObject) -> Result<CallToolResult, ToolError> {
        let params: FinancialNewsParams = parse_arguments(arguments)?;
        self.execute(&params)
    }
}

// ============================================================================
// Tests
// ============================================================================
