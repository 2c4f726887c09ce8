use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use dotenv::dotenv;
use runtime::logging::{Logging, LoggingLayerBuilder};
use thegraph_mcp_server::server::Server;
use thegraph_mcp_server::service::SubgraphService;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

mod runtime;

/// MCP server for querying subgraphs on The Graph Network
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to a YAML config file. Environment variables override its values.
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();

    let config = runtime::read_config(args.config.as_deref())?;

    let (logging_layer, _guard) = LoggingLayerBuilder::new().build(&config.logging)?;
    tracing_subscriber::registry()
        .with(logging_layer)
        .with(Logging::env_filter(&config.logging)?)
        .try_init()?;

    info!("TheGraph MCP Server v{}", env!("CARGO_PKG_VERSION"));

    if config.api_key.is_none() {
        warn!("THEGRAPH_API_KEY is not set, tools that call the gateway will report an error");
    }

    let gateway_url = config.gateway_url().context("invalid gateway_url")?;
    info!(%gateway_url, timeout = ?config.timeout, "Using gateway");

    let service = SubgraphService::builder()
        .gateway_url(gateway_url)
        .maybe_api_key(config.api_key)
        .timeout(config.timeout)
        .network_subgraph_id(config.network_subgraph_id)
        .build()?;

    Server::new(service, config.server_info).start().await?;
    Ok(())
}
