//! mcp-spider server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use anyhow::{Context, Result};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use spindle_client::{SpiderClient, SpiderConfig};
use spindle_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    config.require_api_key()?;
    let client = SpiderClient::new(SpiderConfig::from_app_config(&config)?)?;

    tracing::info!(base_url = %config.base_url, stream = config.stream, "Starting mcp-spider server on stdio transport");

    let handler = handler::McpSpiderServer::new(client, config);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
