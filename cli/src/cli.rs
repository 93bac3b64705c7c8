use clap::Parser;
use std::path::PathBuf;

/// Terminal chat client for the nittany relay
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The question to send
    #[arg(index = 1)] // Positional argument
    pub prompt: Option<String>,

    /// Enter interactive chat mode
    #[arg(short, long, default_value_t = false)]
    pub interactive: bool,

    /// Relay endpoint URL
    #[arg(long, env = "NITTANY_RELAY_URL")]
    pub relay_url: Option<String>,

    /// Path to the client config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
