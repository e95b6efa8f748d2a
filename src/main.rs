//! castplay - CLI entry point

mod commands;

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use castplay::cli::{Cli, Commands};
use castplay::Config;

use commands::play::PlayArgs;

/// Environment variable holding a tracing filter directive
const LOG_ENV: &str = "CASTPLAY_LOG";

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    match cli.command {
        Commands::Play {
            file,
            speed,
            start_at,
            loop_playback,
            paused,
        } => commands::play::handle(
            &file,
            PlayArgs {
                speed,
                start_at,
                loop_playback,
                paused,
            },
        ),
        Commands::Info { file } => commands::info::handle(&file),
        Commands::Completions { shell } => commands::completions::handle::<Cli>(shell),
    }
}

/// Send tracing output to a file. The terminal belongs to the player.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))?;
    let filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => {
            let config = Config::load()?;
            EnvFilter::try_new(&config.logging.filter)
                .with_context(|| format!("Invalid log filter: {}", config.logging.filter))?
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
