//! FX news MCP server library.
//!
//! Serves a static collection of financial news items (affected currencies
//! and impact ratings) and a catalog of FX hedging strategies to Model
//! Context Protocol clients, over JSON-RPC on HTTP or over stdio.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the `McpServer` handler and transports
//! - **domains**: business logic organized by bounded contexts
//!   - **market**: news items, currencies, impact ratings, strategies
//!   - **generation**: text generation backends (Gemini)
//!   - **tools**: `noticias_financieras`, `estrategias_disponibles`, `ask_gemini`,
//!     `analisis_noticias`
//!   - **resources**: server info, news catalog, `estrategia://item/{id}`
//!   - **prompts**: `plan_fx_acciones`
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fx_news_mcp_server::core::{Config, McpServer, TransportService};
//! use fx_news_mcp_server::domains::market::{NewsCatalog, StrategyCatalog};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let transport = config.transport.clone();
//!     let server = McpServer::new(
//!         config,
//!         Arc::new(NewsCatalog::builtin()?),
//!         Arc::new(StrategyCatalog::builtin()?),
//!     )?;
//!     TransportService::new(transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
