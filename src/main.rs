use agent_mcp_server::config::AppConfig;
use agent_mcp_server::model::OpenAiClient;
use agent_mcp_server::server::{self, ServerState};
use clap::Parser;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(
    name = "agent-mcp-server",
    version,
    about = "MCP server exposing a bounded ReAct agent executor"
)]
struct Cli {
    /// Bind address (overrides HOST/PORT from the environment)
    #[arg(long)]
    addr: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    init_tracing(config.verbose);
    info!("Starting agent MCP server");
    debug!(model = %config.model, max_iterations = config.max_iterations, "Configuration loaded");

    let addr = cli.addr.unwrap_or(config.bind);
    let provider = OpenAiClient::new(
        config.base_url.clone(),
        config.model.clone(),
        config.api_key.clone(),
    );
    let has_credentials = config.api_key.is_some();
    let state = Arc::new(ServerState::new(config, provider));

    // Pre-warm the agent when credentials are present; otherwise defer
    // construction to the first request.
    if has_credentials {
        match state.agent().await {
            Ok(_) => info!("Agent ready"),
            Err(error) => warn!(%error, "Agent pre-initialization failed; will retry on first request"),
        }
    } else {
        warn!("OPENAI_API_KEY not set; agent will initialize on first request");
    }

    info!(%addr, "Starting MCP server");
    server::serve(state, addr).await?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .init();
}
