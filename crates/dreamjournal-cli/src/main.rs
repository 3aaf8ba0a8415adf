mod commands;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use dreamjournal_client::{ClientConfig, SessionManager};
use dreamjournal_store::Database;

use commands::Command;

/// Dream journal client
#[derive(Parser, Debug)]
#[command(name = "dreamjournal", version, about)]
struct Args {
    /// Server origin (overrides DREAMJOURNAL_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    // Init logging
    let default_filter = if args.debug {
        "dreamjournal=debug,dreamjournal_client=debug,dreamjournal_store=debug"
    } else {
        "dreamjournal=info,dreamjournal_client=info,dreamjournal_store=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Config
    let mut config = ClientConfig::from_env();
    if let Some(api_url) = args.api_url {
        config = ClientConfig::new(api_url, config.storage_path);
    }

    // Local session storage
    let db = Database::open(&config.storage_path)?;
    let session = SessionManager::new(&config.api_url, Arc::new(db));

    match session.start().await {
        Some(s) => info!("Resumed session for {}", s.username()),
        None => info!("No active session"),
    }

    commands::run(&session, args.command).await
}
