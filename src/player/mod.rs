//! Player engine.
//!
//! A [`Player`] owns one dispatch task that holds all mutable state. Callers
//! interact with it only by posting [`Event`]s and by watching the published
//! [`PlayerView`].
//!
//! - `events` - Event enum and queue handle
//! - `state` - Player state and its renderer projection
//! - `dispatch` - The event loop and its handlers
//! - `activity` - Idle/active detection from raw input
//! - `source` - Recording providers
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use castplay::options::PlayerOptions;
//! use castplay::player::{Event, FileSource, Player};
//!
//! # async fn demo() -> castplay::error::Result<()> {
//! let player = Player::create(Arc::new(FileSource::new("demo.cast")), PlayerOptions::default())?;
//! player.post(Event::TogglePlay);
//! let mut views = player.subscribe();
//! while views.changed().await.is_ok() {
//!     let view = views.borrow().clone();
//!     if view.is_finished() {
//!         break;
//!     }
//! }
//! player.shutdown().await;
//! # Ok(())
//! # }
//! ```

mod activity;
mod dispatch;
mod events;
mod source;
mod state;

pub use activity::{spawn_activity_monitor, ActivityInput};
pub use dispatch::SEEK_STEP;
pub use events::{Event, EventSender, StateUpdate};
pub use source::{FileSource, InlineSource, RecordingSource};
pub use state::{PlayerState, PlayerView, MAX_SPEED, MIN_SPEED};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::Result;
use crate::options::PlayerOptions;

/// Handle to a running player.
///
/// Must be created inside a Tokio runtime.
pub struct Player {
    events: EventSender,
    activity: ActivityInput,
    view_rx: watch::Receiver<PlayerView>,
    dispatch: JoinHandle<PlayerState>,
    monitor: JoinHandle<()>,
}

impl Player {
    /// Validate options and start the dispatch loop and activity monitor.
    ///
    /// With `auto_play` set, loading and playback begin immediately.
    pub fn create(source: Arc<dyn RecordingSource>, options: PlayerOptions) -> Result<Self> {
        options.validate()?;
        info!(source = %source.describe(), speed = options.speed, "Creating player");

        let (events, rx) = EventSender::channel();
        let quiet = Duration::from_secs_f64(options.idle_quiet);
        let auto_play = options.auto_play;
        let state = PlayerState::new(options, events.clone());
        let (view_tx, view_rx) = watch::channel(state.view());
        let dispatch = tokio::spawn(dispatch::run(state, rx, view_tx, source));

        let (activity, activity_rx) = ActivityInput::channel();
        let activity_events = events.clone();
        let monitor = spawn_activity_monitor(activity_rx, quiet, move |active| {
            activity_events.post(Event::UserActivity(active))
        });

        if auto_play {
            events.post(Event::TogglePlay);
        }

        Ok(Self {
            events,
            activity,
            view_rx,
            dispatch,
            monitor,
        })
    }

    /// Enqueue an event for the dispatch loop.
    pub fn post(&self, event: Event) -> bool {
        self.events.post(event)
    }

    /// Post a user-facing event by name. Unknown names are logged and dropped.
    pub fn post_named(&self, name: &str, args: &[f64]) -> bool {
        match Event::from_name(name, args) {
            Ok(event) => self.post(event),
            Err(err) => {
                warn!(event = name, error = %err, "Dropping event");
                false
            }
        }
    }

    pub fn events(&self) -> EventSender {
        self.events.clone()
    }

    /// Input side for raw user activity.
    pub fn activity(&self) -> ActivityInput {
        self.activity.clone()
    }

    /// Receiver that is notified whenever the view changes.
    pub fn subscribe(&self) -> watch::Receiver<PlayerView> {
        self.view_rx.clone()
    }

    /// Latest published view.
    pub fn view(&self) -> PlayerView {
        self.view_rx.borrow().clone()
    }

    /// Stop playback, end the dispatch loop, and return the final state.
    pub async fn shutdown(self) -> Option<PlayerState> {
        self.events.post(Event::Shutdown);
        self.monitor.abort();
        match self.dispatch.await {
            Ok(state) => Some(state),
            Err(err) => {
                warn!(error = %err, "Dispatch loop ended abnormally");
                None
            }
        }
    }
}
