use anyhow::Context;
use clap::Parser;
use nittany_core::{AnthropicClient, RelayConfig};
use nittany_relay::config::{ServerConfig, DEFAULT_ENDPOINT};
use nittany_relay::http_server;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "nittany-relay", about = "HTTP relay between the chat client and the LLM provider")]
struct Args {
    /// Path to a TOML config file with provider settings
    #[arg(short, long, env = "NITTANY_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP server address
    #[arg(long, env = "NITTANY_HTTP_ADDR", default_value = "127.0.0.1:3000")]
    http_addr: SocketAddr,

    /// Path the chat endpoint is served on
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Provider model to use
    #[arg(short = 'o', long)]
    model: Option<String>,

    /// Name of the environment variable holding the provider API key
    #[arg(long)]
    api_key_env: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Starting nittany relay");

    let args = Args::parse();

    let mut provider_config = match RelayConfig::load(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return Err(anyhow::anyhow!("Configuration error: {}", e));
        }
    };

    if let Some(model) = args.model {
        provider_config.model_name = model;
    }
    if let Some(api_key_env) = args.api_key_env {
        provider_config.api_key_env = api_key_env;
    }

    // Only a warning: the key is read per request and may be supplied later.
    if provider_config.api_key_from_env().is_none() {
        warn!(
            api_key_env = %provider_config.api_key_env,
            "API key not set; chat requests will fail until it is"
        );
    }

    let client = AnthropicClient::new(&provider_config)
        .context("Failed to initialize provider client")?;

    let server_config = ServerConfig::new(args.http_addr, args.endpoint, provider_config);
    if let Err(e) = http_server::run_server(server_config, Arc::new(client)).await {
        error!(error = %e, "HTTP server failed");
        return Err(e);
    }

    info!("nittany relay shutting down");
    Ok(())
}
