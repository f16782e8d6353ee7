//! Text generation service abstraction.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::GenerationError;

/// Something that turns a prompt into text.
#[async_trait]
pub trait TextGenerationService: Send + Sync {
    /// Generate a response for `prompt` with the given model identifier.
    ///
    /// Implementations return the response text with surrounding whitespace
    /// removed.
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, GenerationError>;
}

/// Gemini models accepted by the `ask_gemini` tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum GeminiModel {
    #[default]
    #[serde(rename = "gemini-2.5-flash")]
    Gemini25Flash,
    #[serde(rename = "gemini-2.5-pro")]
    Gemini25Pro,
    #[serde(rename = "gemini-1.5-pro")]
    Gemini15Pro,
}

impl GeminiModel {
    pub const ALL: [GeminiModel; 3] = [
        GeminiModel::Gemini25Flash,
        GeminiModel::Gemini25Pro,
        GeminiModel::Gemini15Pro,
    ];

    /// Model identifier as used by the API.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gemini25Flash => "gemini-2.5-flash",
            Self::Gemini25Pro => "gemini-2.5-pro",
            Self::Gemini15Pro => "gemini-1.5-pro",
        }
    }

    /// Look up a model by its API identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name.trim())
    }
}

impl fmt::Display for GeminiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_wire_names() {
        for model in GeminiModel::ALL {
            let value = serde_json::to_value(model).unwrap();
            assert_eq!(value, model.as_str());
            assert_eq!(GeminiModel::from_name(model.as_str()), Some(model));
        }
    }

    #[test]
    fn test_unknown_model() {
        assert_eq!(GeminiModel::from_name("gpt-4"), None);
        assert_eq!(GeminiModel::default(), GeminiModel::Gemini25Flash);
    }
}
