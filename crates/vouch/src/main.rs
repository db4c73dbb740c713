// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vouch - a human-in-the-loop approval gateway.
//!
//! This is the binary entry point for the Vouch service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;
mod shutdown;

use clap::{Parser, Subcommand};

/// Vouch - a human-in-the-loop approval gateway.
#[derive(Parser, Debug)]
#[command(name = "vouch", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the gateway, Telegram dispatcher, and expiry sweeper.
    Serve,
    /// Print the effective configuration and exit.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match vouch_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            vouch_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("vouch serve failed: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            match toml::to_string_pretty(&config) {
                Ok(rendered) => println!("{rendered}"),
                Err(e) => {
                    eprintln!("failed to render config: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => {
            println!("vouch: use --help for available commands");
        }
    }
}
