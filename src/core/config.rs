//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables or defaults.

use super::transport::TransportConfig;
use crate::domains::generation::GeminiModel;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Environment variable holding the Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default Gemini REST endpoint.
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// External API credentials configuration.
    pub credentials: CredentialsConfig,

    /// Generative-text adapter configuration.
    pub generation: GenerationConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for external API credentials.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Google Generative Language API key.
    pub gemini_api_key: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Configuration for the `ask_gemini` tool and its HTTP client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Register the `ask_gemini` tool. Off unless explicitly enabled.
    pub enabled: bool,

    /// Model used when the caller does not pick one.
    pub default_model: GeminiModel,

    /// Base URL of the Generative Language API.
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            default_model: GeminiModel::default(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "fx-news-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            credentials: CredentialsConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix (e.g. `MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`). The Gemini key is read from `GEMINI_API_KEY`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        config.credentials.gemini_api_key = std::env::var(GEMINI_API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty());

        config.generation = GenerationConfig::from_env();

        if config.generation.enabled {
            if config.credentials.gemini_api_key.is_some() {
                info!("Gemini API key loaded from environment");
            } else {
                warn!(
                    "MCP_ENABLE_GEMINI is set but {} is missing; \
                     ask_gemini calls will fail until it is configured",
                    GEMINI_API_KEY_ENV
                );
            }
        }

        config
    }
}

impl GenerationConfig {
    /// Load generation settings from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(enabled) = std::env::var("MCP_ENABLE_GEMINI") {
            config.enabled = matches!(enabled.to_lowercase().as_str(), "true" | "1" | "yes");
        }

        if let Ok(model) = std::env::var("MCP_GEMINI_MODEL") {
            match GeminiModel::from_name(&model) {
                Some(model) => config.default_model = model,
                None => warn!(
                    "Unknown MCP_GEMINI_MODEL '{}', using {}",
                    model, config.default_model
                ),
            }
        }

        if let Ok(timeout) = std::env::var("MCP_GEMINI_TIMEOUT_SECS") {
            config.timeout_secs = parse_timeout_secs(&timeout, config.timeout_secs);
        }

        if let Ok(base_url) = std::env::var("MCP_GEMINI_BASE_URL") {
            config.base_url = base_url;
        }

        config
    }
}

/// Parse a positive number of seconds, keeping `default` (with a warning)
/// for anything else. A zero timeout would fail every request.
fn parse_timeout_secs(raw: &str, default: u64) -> u64 {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => secs,
        _ => {
            warn!(
                "Invalid MCP_GEMINI_TIMEOUT_SECS '{}', using {}s",
                raw, default
            );
            default
        }
    }
}
