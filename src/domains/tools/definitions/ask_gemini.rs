//! Gemini bridge tool definition.
//!
//! Forwards a prompt to a `TextGenerationService` and returns the trimmed
//! answer. Only registered when the generation adapter is enabled in the
//! configuration.

use async_trait::async_trait;
use rmcp::{
    handler::server::tool::schema_for_type,
    model::{CallToolResult, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::domains::generation::{GeminiModel, TextGenerationService};
use crate::domains::tools::{ToolError, ToolHandler, parse_arguments, structured_result};

/// Parameters for the Gemini tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AskGeminiParams {
    /// Prompt sent to the model. Must not be empty.
    pub prompt: String,

    /// Model to use. Defaults to the server's configured model.
    #[serde(default)]
    pub model: Option<GeminiModel>,
}

#[derive(Debug, Serialize, JsonSchema)]
struct AskGeminiOutput {
    /// The prompt that was sent.
    prompt: String,
    /// The model that answered.
    model: GeminiModel,
    /// Model response, trimmed.
    text: String,
}

/// Gemini tool - queries a text generation backend.
pub struct AskGeminiTool {
    service: Arc<dyn TextGenerationService>,
    default_model: GeminiModel,
}

impl AskGeminiTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "ask_gemini";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Consulta a Gemini con un prompt y modelo opcional";

    pub fn new(service: Arc<dyn TextGenerationService>, default_model: GeminiModel) -> Self {
        Self {
            service,
            default_model,
        }
    }

    #[instrument(skip_all, fields(model))]
    pub async fn execute(&self, params: AskGeminiParams) -> Result<CallToolResult, ToolError> {
        if params.prompt.trim().is_empty() {
            return Err(ToolError::invalid_arguments("prompt must not be empty"));
        }

        let model = params.model.unwrap_or(self.default_model);
        tracing::Span::current().record("model", model.as_str());
        info!("Forwarding prompt ({} chars) to {}", params.prompt.len(), model);

        let text = self.service.generate(&params.prompt, model.as_str()).await?;

        let output = AskGeminiOutput {
            prompt: params.prompt,
            model,
            text,
        };
        structured_result(output.text.clone(), &output)
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<AskGeminiParams>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<AskGeminiOutput>().into()),
            icons: None,
            meta: None,
            title: None,
        }
    }
}

#[async_trait]
impl ToolHandler for AskGeminiTool {
    fn tool(&self) -> Tool {
        Self::to_tool()
    }

    async fn call(&self, arguments: JsonObject) -> Result<CallToolResult, ToolError> {
        let params: AskGeminiParams = parse_arguments(arguments)?;
        self.execute(params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::generation::GenerationError;
    use std::sync::Mutex;

    /// Records the model it was asked for and echoes the prompt.
    #[derive(Default)]
    struct EchoService {
        seen_model: Mutex<Option<String>>,
    }

    #[async_trait]
    impl TextGenerationService for EchoService {
        async fn generate(&self, prompt: &str, model: &str) -> Result<String, GenerationError> {
            *self.seen_model.lock().unwrap() = Some(model.to_string());
            Ok(format!("eco: {}", prompt.trim()))
        }
    }

    struct NoKeyService;

    #[async_trait]
    impl TextGenerationService for NoKeyService {
        async fn generate(&self, _prompt: &str, _model: &str) -> Result<String, GenerationError> {
            Err(GenerationError::MissingCredential("GEMINI_API_KEY"))
        }
    }

    fn args(value: serde_json::Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_uses_default_model() {
        let service = Arc::new(EchoService::default());
        let tool = AskGeminiTool::new(service.clone(), GeminiModel::Gemini25Flash);

        let result = tool
            .call(args(serde_json::json!({ "prompt": "hola" })))
            .await
            .unwrap();

        let structured = result.structured_content.unwrap();
        assert_eq!(structured["text"], "eco: hola");
        assert_eq!(structured["model"], "gemini-2.5-flash");
        assert_eq!(
            service.seen_model.lock().unwrap().as_deref(),
            Some("gemini-2.5-flash")
        );
    }

    #[tokio::test]
    async fn test_explicit_model() {
        let service = Arc::new(EchoService::default());
        let tool = AskGeminiTool::new(service.clone(), GeminiModel::Gemini25Flash);

        tool.call(args(serde_json::json!({ "prompt": "hola", "model": "gemini-1.5-pro" })))
            .await
            .unwrap();
        assert_eq!(
            service.seen_model.lock().unwrap().as_deref(),
            Some("gemini-1.5-pro")
        );
    }

    #[tokio::test]
    async fn test_rejects_unknown_model() {
        let tool = AskGeminiTool::new(Arc::new(EchoService::default()), GeminiModel::default());
        let result = tool
            .call(args(serde_json::json!({ "prompt": "hola", "model": "gpt-4" })))
            .await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[tokio::test]
    async fn test_rejects_empty_prompt() {
        let tool = AskGeminiTool::new(Arc::new(EchoService::default()), GeminiModel::default());
        let result = tool.call(args(serde_json::json!({ "prompt": "  " }))).await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[tokio::test]
    async fn test_missing_credential_is_execution_failure() {
        let tool = AskGeminiTool::new(Arc::new(NoKeyService), GeminiModel::default());
        let err = tool
            .call(args(serde_json::json!({ "prompt": "hola" })))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "missing_credential");
        assert!(err.is_execution_failure());
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
