//! Generation-specific error types.

use thiserror::Error;

/// Errors that can occur while generating text.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// No API key is configured.
    #[error("Missing credential: set {0} in the environment")]
    MissingCredential(&'static str),

    /// The prompt is empty.
    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),

    /// The upstream service failed, timed out or answered with garbage.
    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl GenerationError {
    /// Create a new "upstream" error.
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    /// Machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential(_) => "missing_credential",
            Self::InvalidPrompt(_) => "invalid_prompt",
            Self::Upstream(_) => "upstream",
        }
    }
}
