//! CLI definitions for castplay
//!
//! This module contains the clap CLI structure definitions, separated from main.rs
//! so they can be accessed by xtask for documentation generation (man pages).

use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand};
use clap_complete::Shell as CompletionShell;

/// Build clap styles.
///
/// - Green: headers, usage, command names (accent color)
/// - White: descriptions, placeholders (renders as light gray on dark terminals)
pub fn build_cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::White.on_default())
        .valid(AnsiColor::White.on_default())
        .invalid(AnsiColor::Red.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}

#[derive(Parser)]
#[command(name = "castplay")]
#[command(about = "[ castplay ] - play asciicast terminal recordings right in your terminal")]
#[command(
    long_about = "castplay - play asciicast terminal recordings right in your terminal.

Supports the legacy screen-diff format (version 0), the fixed-size stdout
format (version 1), and asciicast v2/v3 streams. Playback runs on a drift-free
virtual clock with seeking, speed control, and a progress bar with markers.

QUICK START:
    castplay play demo.cast                Play a recording
    castplay play demo.cast --speed 2      Play at double speed
    castplay info demo.cast                Show recording details

CONFIGURATION:
    Defaults are read from ~/.config/castplay/config.toml
    (override the location with CASTPLAY_CONFIG)."
)]
#[command(version)]
#[command(styles = build_cli_styles())]
pub struct Cli {
    /// Write diagnostic logs to this file (filter with CASTPLAY_LOG)
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play an asciicast recording
    #[command(long_about = "Play an asciicast recording in the terminal.

PLAYER CONTROLS:
    Space        Pause/resume
    ← / ,        Rewind 5 seconds
    → / .        Fast-forward 5 seconds
    + / -        Double / halve playback speed
    0-9          Jump to 0%, 10%, ... 90%
    Home         Jump to the start
    q / Esc      Quit

EXAMPLES:
    castplay play demo.cast
    castplay play demo.cast --speed 2 --start-at 30
    castplay play demo.cast --loop
    castplay play demo.cast --paused")]
    Play {
        /// Path to the recording
        #[arg(help = "Path to the recording file")]
        file: PathBuf,
        /// Playback speed multiplier
        #[arg(long, short, help = "Playback speed multiplier (e.g. 0.5, 2)")]
        speed: Option<f64>,
        /// Start position in seconds
        #[arg(long, value_name = "SECONDS", help = "Start position in seconds")]
        start_at: Option<f64>,
        /// Restart when playback finishes
        #[arg(long = "loop", help = "Restart from the beginning when playback finishes")]
        loop_playback: bool,
        /// Wait for space before playing
        #[arg(long, help = "Load paused; press space to start")]
        paused: bool,
    },

    /// Show recording details
    #[command(long_about = "Show details about a recording without playing it.

Prints the format version, terminal size, duration, frame count, and markers.

EXAMPLE:
    castplay info demo.cast")]
    Info {
        /// Path to the recording
        #[arg(help = "Path to the recording file")]
        file: PathBuf,
    },

    /// Generate shell completions
    #[command(long_about = "Generate a shell completion script on stdout.

EXAMPLES:
    castplay completions bash > ~/.local/share/bash-completion/completions/castplay
    castplay completions zsh > ~/.zfunc/_castplay")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}
