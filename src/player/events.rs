//! Player events and the queue handle used to post them.

use std::fmt;

use tokio::sync::mpsc;
use tracing::trace;

use super::state::PlayerState;
use crate::error::{PlayerError, Result};
use crate::playback::SessionId;

/// Deferred mutation applied to the state by the dispatch loop.
pub type StateUpdate = Box<dyn FnOnce(&mut PlayerState) + Send>;

/// Everything the dispatch loop reacts to.
pub enum Event {
    /// Load on first use, otherwise pause or resume.
    TogglePlay,
    /// Jump to a fraction of the duration, in `[0, 1]`.
    Seek(f64),
    /// Jump back by the seek step.
    Rewind,
    /// Jump forward by the seek step.
    FastForward,
    SpeedUp,
    SpeedDown,
    /// The frame sequence of a playback session ran out.
    Finished { session: SessionId },
    /// Recording body fetched successfully.
    AsciicastResponse(String),
    /// Recording fetch failed.
    BadResponse(String),
    /// Apply `update` to the state. Tagged updates are dropped when their
    /// session is no longer the running one.
    UpdateState {
        session: Option<SessionId>,
        update: StateUpdate,
    },
    /// Force the cursor blink phase on.
    CursorOn,
    UserActivity(bool),
    /// Stop playback and exit the dispatch loop.
    Shutdown,
}

impl Event {
    /// Untagged state update.
    pub fn update<F>(update: F) -> Self
    where
        F: FnOnce(&mut PlayerState) + Send + 'static,
    {
        Event::UpdateState {
            session: None,
            update: Box::new(update),
        }
    }

    /// State update that only applies while `session` is running.
    pub fn session_update<F>(session: SessionId, update: F) -> Self
    where
        F: FnOnce(&mut PlayerState) + Send + 'static,
    {
        Event::UpdateState {
            session: Some(session),
            update: Box::new(update),
        }
    }

    /// Stable name, used for logging and for [`Event::from_name`].
    pub fn name(&self) -> &'static str {
        match self {
            Event::TogglePlay => "toggle-play",
            Event::Seek(_) => "seek",
            Event::Rewind => "rewind",
            Event::FastForward => "fast-forward",
            Event::SpeedUp => "speed-up",
            Event::SpeedDown => "speed-down",
            Event::Finished { .. } => "finished",
            Event::AsciicastResponse(_) => "asciicast-response",
            Event::BadResponse(_) => "bad-response",
            Event::UpdateState { .. } => "update-state",
            Event::CursorOn => "cursor-on",
            Event::UserActivity(_) => "user-activity",
            Event::Shutdown => "shutdown",
        }
    }

    /// Build a user-facing event from its name.
    ///
    /// Only events that make sense from outside the player are accepted.
    /// `seek` takes the target position as its first argument.
    pub fn from_name(name: &str, args: &[f64]) -> Result<Self> {
        match name {
            "toggle-play" => Ok(Event::TogglePlay),
            "seek" => args
                .first()
                .copied()
                .map(Event::Seek)
                .ok_or_else(|| PlayerError::InvalidEvent("seek requires a position".to_string())),
            "rewind" => Ok(Event::Rewind),
            "fast-forward" => Ok(Event::FastForward),
            "speed-up" => Ok(Event::SpeedUp),
            "speed-down" => Ok(Event::SpeedDown),
            other => Err(PlayerError::UnknownEvent(other.to_string())),
        }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Seek(pos) => write!(f, "Seek({})", pos),
            Event::Finished { session } => write!(f, "Finished({})", session),
            Event::AsciicastResponse(body) => write!(f, "AsciicastResponse({} bytes)", body.len()),
            Event::BadResponse(msg) => write!(f, "BadResponse({:?})", msg),
            Event::UpdateState { session, .. } => write!(f, "UpdateState({:?})", session),
            Event::UserActivity(active) => write!(f, "UserActivity({})", active),
            other => f.write_str(other.name()),
        }
    }
}

/// Cloneable handle to the player's event queue.
#[derive(Debug, Clone)]
pub struct EventSender(mpsc::UnboundedSender<Event>);

impl EventSender {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self(tx), rx)
    }

    /// Enqueue an event. Returns `false` once the dispatch loop is gone.
    pub fn post(&self, event: Event) -> bool {
        match self.0.send(event) {
            Ok(()) => true,
            Err(err) => {
                trace!(event = err.0.name(), "Dispatch loop closed, dropping event");
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }
}
