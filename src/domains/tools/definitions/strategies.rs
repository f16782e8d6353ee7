//! Strategy listing tool definition.

use async_trait::async_trait;
use rmcp::{
    handler::server::tool::schema_for_type,
    model::{CallToolResult, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::domains::market::{Strategy, StrategyCatalog};
use crate::domains::tools::{ToolError, ToolHandler, parse_arguments, structured_result};

/// The tool takes no parameters.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct StrategiesParams {}

#[derive(Debug, Serialize, JsonSchema)]
struct StrategiesOutput {
    /// Available strategies.
    estrategias: Vec<Strategy>,
}

/// Lists the available FX hedging strategies.
pub struct StrategiesTool {
    catalog: Arc<StrategyCatalog>,
}

impl StrategiesTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "estrategias_disponibles";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Lista estrategias de cobertura/FX disponibles";

    pub fn new(catalog: Arc<StrategyCatalog>) -> Self {
        Self { catalog }
    }

    pub fn execute(&self) -> Result<CallToolResult, ToolError> {
        let output = StrategiesOutput {
            estrategias: self.catalog.all().to_vec(),
        };
        info!("Listing {} strategies", output.estrategias.len());

        let text = serde_json::to_string_pretty(&output)
            .map_err(|e| ToolError::execution_failed(e.to_string()))?;
        structured_result(text, &output)
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<StrategiesParams>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<StrategiesOutput>().into()),
            icons: None,
            meta: None,
            title: None,
        }
    }
}

#[async_trait]
impl ToolHandler for StrategiesTool {
    fn tool(&self) -> Tool {
        Self::to_tool()
    }

    async fn call(&self, arguments: JsonObject) -> Result<CallToolResult, ToolError> {
        let _: StrategiesParams = parse_arguments(arguments)?;
        self.execute()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lists_strategies() {
        let tool = StrategiesTool::new(Arc::new(StrategyCatalog::builtin().unwrap()));
        let result = tool.call(JsonObject::new()).await.unwrap();

        let structured = result.structured_content.unwrap();
        let ids: Vec<_> = structured["estrategias"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["carry-trade", "hedge-forward", "butterfly"]);
    }

    #[test]
    fn test_tool_metadata() {
        let tool = StrategiesTool::to_tool();
        assert_eq!(tool.name, "estrategias_disponibles");
        assert!(tool.output_schema.is_some());
    }
}
