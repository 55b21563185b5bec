//! # mirror-cli
//!
//! CLI tool for replaying recorded relay sessions into a local mirror.
//!
//! A recording holds one JSON message per line, exactly as pushed by the
//! remote. It is fed through the mock transport, so no network is needed.
//!
//! ## Commands
//!
//! - `replay`: Apply a recording and print the mirrored buffers
//! - `input`: Apply a recording, then relay text typed in one buffer
//!
//! ## Example
//!
//! ```bash
//! # Show what a session mirrors
//! mirror-cli --config mirror.toml replay session.jsonl
//!
//! # Print the request sent for input in remote buffer 2
//! mirror-cli input session.jsonl --buffer 2 "/join #rust"
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{input, replay};
use config::Config;

/// CLI tool for replaying relay sessions into a local mirror.
#[derive(Parser, Debug)]
#[command(name = "mirror-cli")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Override the remote name
    #[arg(long, global = true)]
    remote: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply a recording and print the mirrored buffers
    Replay {
        /// Recording file (one JSON message per line)
        file: PathBuf,
    },

    /// Apply a recording, then relay input typed in one buffer
    Input {
        /// Recording file (one JSON message per line)
        file: PathBuf,

        /// Remote id of the buffer the text is typed in
        #[arg(long, short)]
        buffer: i64,

        /// Text to relay, sent verbatim
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config =
        Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(name) = cli.remote {
        config.remote.name = name;
    }

    match cli.command {
        Commands::Replay { file } => {
            replay::run(&file, &config).await?;
        }
        Commands::Input { file, buffer, text } => {
            input::run(&file, &config, buffer, &text).await?;
        }
    }

    Ok(())
}
