//! Trader API - application entry point.
//!
//! CLI-based entry point that dispatches to the serve, migrate and check
//! commands. This is the only place a database handle is opened and closed.

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use common::ServiceConfig;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing (verbose mode sets debug level)
    init_tracing(cli.verbose);

    // Execute command
    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args).await,
        Commands::Migrate(args) => commands::migrate::execute(args).await,
        Commands::Check => commands::check::execute().await,
    };

    // Handle errors
    if let Err(e) = result {
        tracing::error!("Command failed: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing subscriber
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| ServiceConfig::from_env().log_level)
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
