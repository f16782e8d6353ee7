//! News analysis tool definition.
//!
//! `analisis_noticias` selects news with the same filters as
//! `noticias_financieras` and asks the generation backend to turn them into
//! a dashboard: per news item, the affected currencies with a direction and
//! an impact score. When the backend fails or answers with something that
//! is not a valid dashboard, the dashboard is built locally from the
//! catalog ratings instead.

use async_trait::async_trait;
use rmcp::{
    handler::server::tool::schema_for_type,
    model::{CallToolResult, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::domains::generation::{GeminiModel, TextGenerationService};
use crate::domains::market::{MatchMode, NewsCatalog, NewsItem, NewsQuery, NewsRecord};
use crate::domains::tools::{ToolError, ToolHandler, parse_arguments, structured_result};

const PROMPT_HEADER: &str = r#"Eres analista FX. Recibes un arreglo de noticias JSON con campos {id, titulo, descripcion, monedas_afectadas, calificacion_impacto}.
Devuelve EXCLUSIVAMENTE un JSON con este schema:
{
  "items": [
    {
      "newsId":"string",
      "newsTitle":"string",
      "impactPairs":[
        {"pair":"string","direction":"up|down","score":"X/10"}
      ]
    }
  ]
}
Reglas:
- "items" debe tener la MISMA cantidad y orden que las noticias de entrada.
- "newsId" = id; "newsTitle" = titulo.
- Por cada moneda en "monedas_afectadas", agrega una entrada en "impactPairs".
- "pair": puedes usar solo el código ("USD") o un par ("USD/EUR") si aplica.
- "direction": "up" si la noticia tendería a fortalecer la moneda, "down" si tendería a debilitarla.
- "score": usa "calificacion_impacto" alineada si es posible; si faltan, estima un valor similar.
- No agregues explicaciones ni backticks; SOLO el JSON.

Noticias:
"#;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the news analysis tool. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NewsAnalysisParams {
    /// Only analyse news affecting these currency codes.
    #[serde(default)]
    pub currencies: Option<Vec<String>>,

    /// "any": the item affects at least one currency; "all": every currency.
    #[serde(default)]
    pub mode: MatchMode,

    /// Maximum number of items to analyse (1-10). Omit to analyse every match.
    #[serde(default)]
    pub limit: Option<usize>,

    /// Model to use. Defaults to the server's configured model.
    #[serde(default)]
    pub model: Option<GeminiModel>,
}

// ============================================================================
// Dashboard
// ============================================================================

/// Expected move of a currency after the news.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImpactPair {
    /// Currency code ("USD") or pair ("USD/EUR").
    pub pair: String,
    pub direction: Direction,
    /// Impact score, "N/10".
    pub score: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardItem {
    pub news_id: String,
    pub news_title: String,
    pub impact_pairs: Vec<ImpactPair>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct Dashboard {
    items: Vec<DashboardItem>,
}

/// Where the dashboard came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DashboardSource {
    Gemini,
    Fallback,
}

#[derive(Debug, Serialize, JsonSchema)]
struct NewsAnalysisOutput {
    /// `gemini` when the model answered with a valid dashboard.
    fuente: DashboardSource,
    items: Vec<DashboardItem>,
}

/// A selected news item as sent to the model.
#[derive(Debug, Serialize)]
struct PromptNews {
    id: String,
    #[serde(flatten)]
    record: NewsRecord,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// News analysis tool - dashboard of currency impacts per news item.
pub struct NewsAnalysisTool {
    catalog: Arc<NewsCatalog>,
    service: Arc<dyn TextGenerationService>,
    default_model: GeminiModel,
}

impl NewsAnalysisTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "analisis_noticias";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Analiza las noticias seleccionadas con Gemini y devuelve, \
         por noticia, los pares afectados con dirección (up/down) y calificación de impacto. \
         Filtros opcionales: currencies, mode (any/all), limit (1-10) y model.";

    pub fn new(
        catalog: Arc<NewsCatalog>,
        service: Arc<dyn TextGenerationService>,
        default_model: GeminiModel,
    ) -> Self {
        Self {
            catalog,
            service,
            default_model,
        }
    }

    #[instrument(skip_all, fields(mode = ?params.mode, limit = ?params.limit))]
    pub async fn execute(&self, params: NewsAnalysisParams) -> Result<CallToolResult, ToolError> {
        let query = NewsQuery::new(params.currencies, params.mode, params.limit)
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;

        let selected: Vec<&NewsItem> = self.catalog.select(&query).items.into_values().collect();
        let model = params.model.unwrap_or(self.default_model);

        let output = match self.ask_model(&selected, model).await {
            Ok(items) => NewsAnalysisOutput {
                fuente: DashboardSource::Gemini,
                items,
            },
            Err(reason) => {
                warn!("Falling back to catalog ratings: {}", reason);
                NewsAnalysisOutput {
                    fuente: DashboardSource::Fallback,
                    items: fallback_dashboard(&selected),
                }
            }
        };
        info!(
            "Analysis of {} items from {:?}",
            output.items.len(),
            output.fuente
        );

        let text = serde_json::to_string_pretty(&output)
            .map_err(|e| ToolError::execution_failed(e.to_string()))?;
        structured_result(text, &output)
    }

    /// Ask the model for a dashboard. The error is a log message only.
    async fn ask_model(
        &self,
        selected: &[&NewsItem],
        model: GeminiModel,
    ) -> Result<Vec<DashboardItem>, String> {
        let prompt = build_prompt(selected).map_err(|e| e.to_string())?;
        let raw = self
            .service
            .generate(&prompt, model.as_str())
            .await
            .map_err(|e| e.to_string())?;

        let dashboard = parse_dashboard(&raw)?;
        if dashboard.items.len() != selected.len() {
            return Err(format!(
                "expected {} items, model returned {}",
                selected.len(),
                dashboard.items.len()
            ));
        }
        Ok(dashboard.items)
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<NewsAnalysisParams>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<NewsAnalysisOutput>().into()),
            icons: None,
            meta: None,
            title: Some("Análisis de noticias".into()),
        }
    }
}

fn build_prompt(selected: &[&NewsItem]) -> serde_json::Result<String> {
    let news: Vec<PromptNews> = selected
        .iter()
        .map(|item| PromptNews {
            id: item.id().to_string(),
            record: item.to_record(),
        })
        .collect();
    Ok(format!("{}{}", PROMPT_HEADER, serde_json::to_string_pretty(&news)?))
}

/// Parse a model answer, tolerating Markdown code fences around the JSON.
fn parse_dashboard(raw: &str) -> Result<Dashboard, String> {
    let cleaned = raw.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err("empty response".to_string());
    }
    serde_json::from_str(cleaned).map_err(|e| format!("invalid dashboard JSON: {}", e))
}

/// Dashboard from the catalog alone: every affected currency, direction up,
/// score from the item's own rating.
fn fallback_dashboard(selected: &[&NewsItem]) -> Vec<DashboardItem> {
    selected
        .iter()
        .map(|item| DashboardItem {
            news_id: item.id().to_string(),
            news_title: item.title().to_string(),
            impact_pairs: item
                .impacts()
                .iter()
                .map(|impact| ImpactPair {
                    pair: impact.currency.to_string(),
                    direction: Direction::Up,
                    score: impact.rating.to_string(),
                })
                .collect(),
        })
        .collect()
}

#[async_trait]
impl ToolHandler for NewsAnalysisTool {
    fn tool(&self) -> Tool {
        Self::to_tool()
    }

    async fn call(&self, arguments: JsonObject) -> Result<CallToolResult, ToolError> {
        let params: NewsAnalysisParams = parse_arguments(arguments)?;
        self.execute(params).await
    }
}

// ============================================================================
// Tests
// ============================================================================
