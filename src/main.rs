//! MCP Server Entry Point
//!
//! Initializes logging, loads configuration, builds the catalogs and serves
//! them with the configured transport. Any startup failure (invalid catalog,
//! duplicate tool, address in use) exits with a non-zero status.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use fx_news_mcp_server::core::{Config, McpServer, TransportService};
use fx_news_mcp_server::domains::market::{NewsCatalog, StrategyCatalog};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);

    let news = Arc::new(NewsCatalog::builtin().context("invalid news catalog")?);
    let strategies = Arc::new(StrategyCatalog::builtin().context("invalid strategy catalog")?);
    info!(
        "Loaded {} news items and {} strategies",
        news.len(),
        strategies.all().len()
    );

    let transport = TransportService::new(config.transport.clone());
    let server = McpServer::new(config, news, strategies)?;

    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Configures tracing with the specified log level and format.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
