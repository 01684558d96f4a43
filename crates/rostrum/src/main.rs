// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rostrum - persona-debate generation coordination service.
//!
//! This is the binary entry point for the Rostrum server.

use clap::{Parser, Subcommand};

mod engine;
mod serve;

/// Rostrum - persona-debate generation coordination service.
#[derive(Parser, Debug)]
#[command(name = "rostrum", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Rostrum HTTP server.
    Serve,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match rostrum_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            for err in &errors {
                eprintln!("rostrum: {err}");
            }
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("rostrum serve: {e}");
                std::process::exit(1);
            }
        }
        None => {
            println!("rostrum: use --help for available commands");
        }
    }
}
