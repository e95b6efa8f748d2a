//! Event dispatch loop.
//!
//! A single task owns the [`PlayerState`] and processes events one at a
//! time, in arrival order. Each handler maps the current state to the next
//! one; a handler error is logged and the previous state is kept. After every
//! event the view is republished if it changed.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, trace, warn};

use super::events::{Event, EventSender, StateUpdate};
use super::source::RecordingSource;
use super::state::{PlayerState, PlayerView, MAX_SPEED, MIN_SPEED};
use crate::asciicast::Recording;
use crate::error::{PlayerError, Result};
use crate::playback::{self, SessionId, StopHandle};
use crate::timeline::{self, state_at};

/// Seconds moved by rewind and fast-forward.
pub const SEEK_STEP: f64 = 5.0;

pub(super) async fn run(
    mut state: PlayerState,
    mut rx: mpsc::UnboundedReceiver<Event>,
    view_tx: watch::Sender<PlayerView>,
    source: Arc<dyn RecordingSource>,
) -> PlayerState {
    while let Some(event) = rx.recv().await {
        if let Event::Shutdown = event {
            if let Some(handle) = state.stop.take() {
                handle.stop();
            }
            publish(&view_tx, &state);
            debug!("Dispatch loop shutting down");
            break;
        }

        let name = event.name();
        trace!(event = ?event, "Dispatching event");
        match handle(&state, event, &source) {
            Ok(next) => state = next,
            Err(err) => warn!(event = name, error = %err, "Event handler failed"),
        }
        publish(&view_tx, &state);
    }
    state
}

fn publish(view_tx: &watch::Sender<PlayerView>, state: &PlayerState) {
    let view = state.view();
    view_tx.send_if_modified(|current| {
        if *current == view {
            false
        } else {
            *current = view;
            true
        }
    });
}

fn handle(state: &PlayerState, event: Event, source: &Arc<dyn RecordingSource>) -> Result<PlayerState> {
    match event {
        Event::TogglePlay => toggle_play(state, source),
        Event::Seek(position) => seek(state, position),
        Event::Rewind => seek_to(state, state.position() - SEEK_STEP),
        Event::FastForward => seek_to(state, state.position() + SEEK_STEP),
        Event::SpeedUp => change_speed(state, 2.0),
        Event::SpeedDown => change_speed(state, 0.5),
        Event::Finished { session } => finished(state, session),
        Event::AsciicastResponse(body) => asciicast_response(state, &body),
        Event::BadResponse(message) => Ok(bad_response(state, message)),
        Event::UpdateState { session, update } => Ok(update_state(state, session, update)),
        Event::CursorOn => {
            let mut next = state.clone();
            next.screen.cursor.blink_on = true;
            Ok(next)
        }
        Event::UserActivity(active) => {
            let mut next = state.clone();
            next.user_active = active;
            Ok(next)
        }
        Event::Shutdown => Ok(state.clone()),
    }
}

fn is_current(state: &PlayerState, session: SessionId) -> bool {
    state.stop.as_ref().map(StopHandle::id) == Some(session)
}

fn toggle_play(state: &PlayerState, source: &Arc<dyn RecordingSource>) -> Result<PlayerState> {
    if !state.is_loaded() {
        if state.loading {
            debug!("Recording is already loading");
            return Ok(state.clone());
        }
        spawn_fetch(Arc::clone(source), state.events.clone());
        let mut next = state.clone();
        next.loading = true;
        next.error = None;
        return Ok(next);
    }

    if state.is_playing() {
        Ok(pause(state))
    } else {
        playback::start(state)
    }
}

fn spawn_fetch(source: Arc<dyn RecordingSource>, events: EventSender) {
    info!(source = %source.describe(), "Fetching recording");
    tokio::spawn(async move {
        let event = match source.fetch().await {
            Ok(body) => Event::AsciicastResponse(body),
            Err(err) => Event::BadResponse(err.to_string()),
        };
        events.post(event);
    });
}

/// Stop the running session and fold its elapsed time into the start position.
fn pause(state: &PlayerState) -> PlayerState {
    let mut next = state.clone();
    if let Some(handle) = next.stop.take() {
        let elapsed = handle.stop();
        next.set_start_at(next.start_at() + elapsed);
        next.set_current_time(next.start_at());
    }
    next.screen.cursor.blink_on = true;
    next
}

fn seek(state: &PlayerState, position: f64) -> Result<PlayerState> {
    if !position.is_finite() {
        return Err(PlayerError::InvalidEvent(format!(
            "seek position must be a number, got {}",
            position
        )));
    }
    seek_to(state, position.clamp(0.0, 1.0) * state.duration())
}

/// Move to an absolute time, restarting playback if it was running.
fn seek_to(state: &PlayerState, time: f64) -> Result<PlayerState> {
    let Some(frames) = state.frames.clone() else {
        debug!("Ignoring seek before the recording is loaded");
        return Ok(state.clone());
    };

    let was_playing = state.is_playing();
    let mut next = state.clone();
    if let Some(handle) = next.stop.take() {
        handle.stop();
    }
    next.set_start_at(time);
    next.set_current_time(next.start_at());
    next.screen = state_at(frames.iter(), next.start_at())
        .map(|screen| screen.with_cursor_on())
        .unwrap_or_else(|| next.blank_screen());
    debug!(time = next.start_at(), was_playing, "Seek");

    if was_playing {
        playback::start(&next)
    } else {
        Ok(next)
    }
}

fn change_speed(state: &PlayerState, factor: f64) -> Result<PlayerState> {
    let was_playing = state.is_playing();
    let mut next = pause(state);
    next.speed = (next.speed * factor).clamp(MIN_SPEED, MAX_SPEED);
    debug!(speed = next.speed, "Speed changed");

    if was_playing {
        playback::start(&next)
    } else {
        Ok(next)
    }
}

fn finished(state: &PlayerState, session: SessionId) -> Result<PlayerState> {
    if !is_current(state, session) {
        debug!(session = %session, "Ignoring finish from a replaced session");
        return Ok(state.clone());
    }

    let mut next = state.clone();
    next.stop = None;
    next.set_start_at(0.0);
    next.set_current_time(next.duration());
    next.screen.cursor.blink_on = true;
    info!(looping = next.options.loop_playback, "Playback finished");

    if next.options.loop_playback {
        next.events.post(Event::TogglePlay);
    }
    Ok(next)
}

fn asciicast_response(state: &PlayerState, body: &str) -> Result<PlayerState> {
    if state.is_loaded() {
        debug!("Ignoring duplicate recording response");
        return Ok(state.clone());
    }

    let mut next = state.clone();
    next.loading = false;
    let recording = match Recording::parse_str(body) {
        Ok(recording) => recording,
        Err(err) => {
            error!(error = %err, "Failed to load recording");
            next.error = Some(err.to_string());
            return Ok(next);
        }
    };

    let version = recording.version();
    next.markers = recording.markers();
    next.size = recording.size();
    next.title = recording.title().map(str::to_string);
    let frames = timeline::build(recording).materialize();
    next.set_frames(frames);
    next.error = None;
    info!(
        version = version.number(),
        duration = next.duration(),
        frames = next.frames.as_ref().map_or(0, |f| f.len()),
        "Recording loaded"
    );

    playback::start(&next)
}

fn bad_response(state: &PlayerState, message: String) -> PlayerState {
    error!(error = %message, "Failed to fetch recording");
    let mut next = state.clone();
    next.loading = false;
    next.error = Some(message);
    next
}

fn update_state(state: &PlayerState, session: Option<SessionId>, update: StateUpdate) -> PlayerState {
    if let Some(session) = session {
        if !is_current(state, session) {
            trace!(session = %session, "Dropping update from a replaced session");
            return state.clone();
        }
    }
    let mut next = state.clone();
    update(&mut next);
    next
}
