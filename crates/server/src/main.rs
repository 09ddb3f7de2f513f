// ABOUTME: Server binary: loads configuration and starts the scrape API.
// ABOUTME: Runs with built-in defaults when no config file is given.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use prensa_server::config::ServerConfig;
use prensa_server::{start_server, ServerError};

#[derive(Parser, Debug)]
#[command(name = "prensa-server")]
#[command(about = "HTTP API for the Prensa news-article extractor")]
struct Args {
    /// Path to a TOML configuration file (defaults apply when omitted)
    #[arg(long = "config")]
    config: Option<PathBuf>,
}

async fn run(args: &Args) -> Result<(), ServerError> {
    let config = match &args.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    let config = config.apply_env();

    start_server(config).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(1)
        }
    }
}
