//! Playback sessions.
//!
//! [`start`] launches one session: the active frames (sliced at the start
//! position and rescaled by speed), a clock tick, and a cursor blink are each
//! driven by the scheduler, and a task multiplexes them into state updates
//! posted to the dispatch loop. Updates are tagged with the session id so the
//! loop can discard anything a replaced session still had in flight.

use std::fmt;
use std::iter;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::debug;

use super::scheduler::schedule;
use crate::error::{PlayerError, Result};
use crate::player::{Event, EventSender, PlayerState};
use crate::screen::ScreenState;
use crate::timeline::{rescale, shared_frames, slice_from, state_at};

/// Seconds between playback position updates.
pub const CLOCK_TICK: f64 = 0.3;
/// Seconds between cursor blink phase flips.
pub const BLINK_PERIOD: f64 = 0.5;

/// Identifies one playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        SessionId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle held in the player state while a session runs.
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<StopInner>);

#[derive(Debug)]
struct StopInner {
    id: SessionId,
    started: Instant,
    speed: f64,
    stop_tx: watch::Sender<bool>,
}

impl StopHandle {
    fn new(speed: f64, stop_tx: watch::Sender<bool>) -> Self {
        Self(Arc::new(StopInner {
            id: SessionId::next(),
            started: Instant::now(),
            speed,
            stop_tx,
        }))
    }

    pub fn id(&self) -> SessionId {
        self.0.id
    }

    /// Virtual seconds played since the session started.
    pub fn elapsed(&self) -> f64 {
        self.0.started.elapsed().as_secs_f64() * self.0.speed
    }

    /// Signal the session to stop and return the virtual time it played.
    pub fn stop(&self) -> f64 {
        if !self.0.stop_tx.send_replace(true) {
            debug!(session = %self.0.id, "Stopping playback session");
        }
        self.elapsed()
    }
}

/// Start playback from the state's start position at its speed.
///
/// Any session already referenced by the state is stopped first. The
/// returned state shows the screen at the start position and holds the new
/// session's [`StopHandle`].
pub fn start(state: &PlayerState) -> Result<PlayerState> {
    let frames = state.frames.clone().ok_or(PlayerError::NotLoaded)?;
    let mut next = state.clone();
    if let Some(previous) = next.stop.take() {
        previous.stop();
    }

    let start_at = next.start_at();
    let speed = next.speed;
    let (stop_tx, stop_rx) = watch::channel(false);
    let handle = StopHandle::new(speed, stop_tx);

    let active = rescale(slice_from(shared_frames(frames.clone()), start_at), speed)
        .map(|frame| (frame.delay, frame.screen));
    let session = Session {
        id: handle.id(),
        events: next.events.clone(),
        started: handle.0.started,
        speed,
        start_at,
        duration: next.duration(),
    };
    debug!(session = %session.id, start_at, speed, "Starting playback session");
    let frame_rx = schedule(active);
    let tick_rx = schedule(iter::repeat((CLOCK_TICK, ())));
    tokio::spawn(session.run(frame_rx, tick_rx, stop_rx));

    next.screen = state_at(frames.iter(), start_at)
        .map(|screen| screen.with_cursor_on())
        .unwrap_or_else(|| next.blank_screen());
    next.set_current_time(start_at);
    next.stop = Some(handle);
    Ok(next)
}

fn blink_schedule() -> mpsc::Receiver<bool> {
    schedule([(BLINK_PERIOD, false), (BLINK_PERIOD, true)].into_iter().cycle())
}

struct Session {
    id: SessionId,
    events: EventSender,
    started: Instant,
    speed: f64,
    start_at: f64,
    duration: f64,
}

impl Session {
    fn position(&self) -> f64 {
        (self.start_at + self.started.elapsed().as_secs_f64() * self.speed).min(self.duration)
    }

    fn update<F>(&self, update: F) -> bool
    where
        F: FnOnce(&mut PlayerState) + Send + 'static,
    {
        self.events.post(Event::session_update(self.id, update))
    }

    async fn run(
        self,
        mut frames: mpsc::Receiver<ScreenState>,
        mut ticks: mpsc::Receiver<()>,
        mut stop_rx: watch::Receiver<bool>,
    ) {
        let mut blink = blink_schedule();
        loop {
            tokio::select! {
                biased;
                _ = stop_rx.wait_for(|stopped| *stopped) => {
                    self.events.post(Event::CursorOn);
                    break;
                }
                frame = frames.recv() => match frame {
                    Some(mut screen) => {
                        screen.cursor.blink_on = true;
                        if !self.update(move |state| state.screen = screen) {
                            break;
                        }
                        blink = blink_schedule();
                    }
                    None => {
                        debug!(session = %self.id, "Playback session reached the end");
                        self.events.post(Event::Finished { session: self.id });
                        break;
                    }
                },
                Some(()) = ticks.recv() => {
                    let time = self.position();
                    if !self.update(move |state| state.set_current_time(time)) {
                        break;
                    }
                }
                Some(on) = blink.recv() => {
                    if !self.update(move |state| state.screen.cursor.blink_on = on) {
                        break;
                    }
                }
            }
        }
    }
}
