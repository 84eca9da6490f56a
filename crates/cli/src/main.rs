//! Heartwood CLI - Configuration checks and diagnostics.
//!
//! # Usage
//!
//! ```bash
//! # Validate storefront and admin configuration
//! hw-cli config check
//!
//! # Probe the Heartwood API health endpoint
//! hw-cli ping
//! ```
//!
//! # Commands
//!
//! - `config check` - Load and validate configuration from the environment
//! - `ping` - Probe the Heartwood API

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hw-cli")]
#[command(author, version, about = "Heartwood CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Probe the Heartwood API health endpoint
    Ping,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Load and validate storefront and admin configuration
    Check,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Check => commands::config::check()?,
        },
        Commands::Ping => commands::ping::ping().await?,
    }
    Ok(())
}
