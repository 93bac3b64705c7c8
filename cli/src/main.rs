use clap::Parser;
use colored::*;
use std::error::Error;
use std::sync::Arc;

use nittany_cli::cli::Args;
use nittany_cli::config::ClientConfig;
use nittany_cli::controller::ChatController;
use nittany_cli::logging::{self, log_error, log_info};
use nittany_cli::relay_client::RelayClient;
use nittany_cli::render::{print_usage_instructions, Suggestions};

/// Main function - sends questions to the relay and renders the replies
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load .env before clap reads NITTANY_RELAY_URL
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config_path = match args.config.clone() {
        Some(path) => path,
        None => ClientConfig::default_path()?,
    };
    let config = match ClientConfig::load_from_file(&config_path) {
        Ok(config) => config,
        Err(e) => {
            log_error(&format!("Failed to load config: {:#}", e));
            return Err(e.into());
        }
    };

    logging::init(logging::level_from(args.verbose, config.log_level.as_deref()));

    let relay_url = args.relay_url.clone().unwrap_or_else(|| config.relay_url.clone());
    log_info(&format!("Using relay at {}", relay_url));

    let transport = Arc::new(RelayClient::new(relay_url));
    let controller = ChatController::new(transport, Suggestions::new(config.suggestions.clone()));

    if args.interactive {
        if let Err(e) = nittany_cli::app::run_interactive_chat(&controller).await {
            log_error(&format!("Error in interactive chat: {}", e));
            eprintln!("{}", format!("Interactive chat failed: {}", e).red());
        }
    } else if let Some(prompt) = args.prompt {
        if let Err(e) = nittany_cli::app::run_single_query(prompt, &controller).await {
            log_error(&format!("Error processing prompt: {}", e));
            return Err(e.into());
        }
    } else {
        // No prompt and not interactive, show usage
        print_usage_instructions();
    }

    Ok(())
}
