//! User activity derivation.
//!
//! Raw input pokes (mouse movement, key presses) go through a channel with
//! room for one pending signal; extra pokes while one is queued are dropped.
//! The monitor reports `true` on the first poke after a quiet period and
//! `false` once no poke has arrived for the quiet duration.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::trace;

/// Cloneable input side of the activity monitor.
#[derive(Debug, Clone)]
pub struct ActivityInput {
    tx: mpsc::Sender<()>,
}

impl ActivityInput {
    pub fn channel() -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        (Self { tx }, rx)
    }

    /// Record raw user input. Never blocks.
    pub fn poke(&self) {
        if self.tx.try_send(()).is_err() {
            trace!("Activity signal already pending");
        }
    }
}

/// Spawn the monitor. `emit` returns `false` to stop it.
pub fn spawn_activity_monitor<F>(input: mpsc::Receiver<()>, quiet: Duration, emit: F) -> JoinHandle<()>
where
    F: FnMut(bool) -> bool + Send + 'static,
{
    tokio::spawn(monitor(input, quiet, emit))
}

async fn monitor<F>(mut input: mpsc::Receiver<()>, quiet: Duration, mut emit: F)
where
    F: FnMut(bool) -> bool,
{
    while input.recv().await.is_some() {
        if !emit(true) {
            return;
        }
        loop {
            tokio::select! {
                poke = input.recv() => {
                    if poke.is_none() {
                        emit(false);
                        return;
                    }
                }
                _ = sleep(quiet) => {
                    if !emit(false) {
                        return;
                    }
                    break;
                }
            }
        }
    }
}
