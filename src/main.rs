use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use overhead::commands::{handle_scan, handle_watch};

#[derive(Parser, Debug)]
#[command(
    name = "overhead",
    about = "Watch a tar1090 aircraft feed and alert on aircraft approaching a reference point"
)]
struct Cli {
    /// Path to the TOML config file
    #[arg(long = "config", short = 'c', default_value = "overhead.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll the feed continuously, logging observations and sending alerts
    Watch,
    /// Fetch the feed once and print distance/bearing for every aircraft
    Scan,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables (Pushover credentials) from .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Watch => handle_watch(&cli.config).await,
        Command::Scan => handle_scan(&cli.config).await,
    }
}
