//! Daemon entry point for the VizQL MCP bridge.
//!
//! Loads configuration from the environment, assembles the relay bridge,
//! and serves the MCP protocol over stdio and/or streamable HTTP.

mod config;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;
use vizql_core::bridge::VizqlBridge;
use vizql_mcp::server::{self, McpHttpServerConfig};

use crate::config::McpdConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing();

    let config = McpdConfig::from_args()?;
    let bridge = Arc::new(VizqlBridge::new(config.vizql()));
    let luid = &config.datasource_luid;
    let url = &config.vizql_url;
    info!("vizql-mcpd relaying datasource {luid} via {url}");

    match (config.enable_stdio, config.serve_http) {
        (true, false) => server::serve_stdio(bridge).await?,
        (false, true) => {
            let http_config = McpHttpServerConfig::new(config.mcp_http_addr);
            server::serve_streamable_http(bridge, http_config).await?;
        }
        (true, true) => {
            let http_config = McpHttpServerConfig::new(config.mcp_http_addr);
            let http_bridge = bridge.clone();
            tokio::select! {
                result = server::serve_stdio(bridge) => result?,
                result = server::serve_streamable_http(http_bridge, http_config) => result?,
            }
        }
        (false, false) => {
            return Err("no MCP transport enabled; pass --stdio or --http".into());
        }
    }
    Ok(())
}

/// Routes logs to stderr so stdout stays clean for the MCP protocol.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
