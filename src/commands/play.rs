//! Play command handler

use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::cursor::{Hide, Show};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use tokio::sync::mpsc;
use tracing::info;

use castplay::input::{map_event, Action, InputReader};
use castplay::options::PlayerOptions;
use castplay::player::{FileSource, Player};
use castplay::{render, Config};

use super::ensure_file_exists;

/// How often the input thread checks whether the player has exited
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Command-line overrides for the configured player defaults.
#[derive(Debug, Clone, Default)]
pub struct PlayArgs {
    pub speed: Option<f64>,
    pub start_at: Option<f64>,
    pub loop_playback: bool,
    pub paused: bool,
}

/// Merge config defaults with command-line overrides and validate.
pub fn build_options(config: &Config, args: &PlayArgs) -> Result<PlayerOptions> {
    let mut options = config.player.to_options();
    if let Some(speed) = args.speed {
        options.speed = speed;
    }
    if let Some(start_at) = args.start_at {
        options.start_at = start_at;
    }
    options.loop_playback |= args.loop_playback;
    if args.paused {
        options.auto_play = false;
    }
    options.validate()?;
    Ok(options)
}

/// Play a recording in the terminal until the user quits.
#[cfg(not(tarpaulin_include))]
pub fn handle(file: &Path, args: PlayArgs) -> Result<()> {
    ensure_file_exists(file)?;
    let config = Config::load()?;
    let options = build_options(&config, &args)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(run(file.to_path_buf(), options))
}

#[cfg(not(tarpaulin_include))]
async fn run(path: PathBuf, options: PlayerOptions) -> Result<()> {
    info!(path = %path.display(), "Starting player");
    let player = Player::create(Arc::new(FileSource::new(path)), options)?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide, EnableMouseCapture)?;

    let result = event_loop(&player, &mut stdout).await;

    execute!(stdout, DisableMouseCapture, Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    player.shutdown().await;
    result
}

#[cfg(not(tarpaulin_include))]
async fn event_loop(player: &Player, stdout: &mut Stdout) -> Result<()> {
    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    let _reader = InputReader::spawn(input_tx, INPUT_POLL);
    let activity = player.activity();
    let mut views = player.subscribe();

    let (mut cols, mut rows) = terminal::size()?;
    let mut view = views.borrow_and_update().clone();
    render::render(stdout, &view, cols, rows)?;

    loop {
        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                view = views.borrow_and_update().clone();
                render::render(stdout, &view, cols, rows)?;
            }
            input = input_rx.recv() => {
                let Some(input) = input else {
                    break;
                };
                activity.poke();
                match map_event(&input) {
                    Some(Action::Quit) => break,
                    Some(Action::Post(event)) => {
                        player.post(event);
                    }
                    Some(Action::Redraw) => {
                        (cols, rows) = terminal::size()?;
                        render::render(stdout, &view, cols, rows)?;
                    }
                    Some(Action::Activity) | None => {}
                }
            }
        }
    }
    Ok(())
}
