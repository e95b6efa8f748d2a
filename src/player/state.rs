//! Player state.
//!
//! `PlayerState` is owned by the dispatch loop and replaced wholesale by
//! every handler. `PlayerView` is the read-only projection published to
//! renderers after each event.

use std::sync::Arc;

use super::events::EventSender;
use crate::asciicast::Marker;
use crate::options::PlayerOptions;
use crate::playback::StopHandle;
use crate::screen::{Cursor, ScreenState};
use crate::timeline::{total_duration, Frame};

/// Slowest allowed playback speed.
pub const MIN_SPEED: f64 = 1.0 / 16.0;
/// Fastest allowed playback speed.
pub const MAX_SPEED: f64 = 16.0;

/// Complete player state.
///
/// Time fields are private with clamping setters so that positions always
/// stay within `[0, duration]` once a recording is loaded.
#[derive(Debug, Clone)]
pub struct PlayerState {
    // === Recording ===
    /// Materialized frames, `None` until loaded
    pub frames: Option<Arc<[Frame]>>,
    duration: f64,
    pub markers: Vec<Marker>,
    /// Terminal size declared by the recording
    pub size: Option<(usize, usize)>,
    pub title: Option<String>,

    // === Playback timing (guarded) ===
    start_at: f64,
    current_time: f64,

    // === Playback ===
    pub speed: f64,
    /// Present exactly while a session is running
    pub stop: Option<StopHandle>,
    pub screen: ScreenState,

    // === Status ===
    pub loading: bool,
    pub error: Option<String>,
    pub user_active: bool,

    // === Wiring ===
    pub events: EventSender,
    pub options: PlayerOptions,
}

impl PlayerState {
    pub fn new(options: PlayerOptions, events: EventSender) -> Self {
        let mut state = Self {
            frames: None,
            duration: 0.0,
            markers: Vec::new(),
            size: None,
            title: None,
            start_at: 0.0,
            current_time: 0.0,
            speed: options.speed,
            stop: None,
            screen: ScreenState::default(),
            loading: false,
            error: None,
            user_active: false,
            events,
            options,
        };
        state.screen = state.blank_screen();
        state.set_start_at(state.options.start_at);
        state.current_time = state.start_at;
        state
    }

    /// Install loaded frames and derive the duration from them.
    pub fn set_frames(&mut self, frames: Arc<[Frame]>) {
        self.duration = total_duration(frames.iter());
        self.frames = Some(frames);
        self.start_at = self.clamp_time(self.start_at);
        self.current_time = self.clamp_time(self.current_time);
    }

    pub fn is_loaded(&self) -> bool {
        self.frames.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.stop.is_some()
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn start_at(&self) -> f64 {
        self.start_at
    }

    pub fn set_start_at(&mut self, time: f64) {
        self.start_at = self.clamp_time(time);
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn set_current_time(&mut self, time: f64) {
        self.current_time = self.clamp_time(time);
    }

    /// Live playback position: derived from the running session when
    /// playing, otherwise the last reported time.
    pub fn position(&self) -> f64 {
        match &self.stop {
            Some(handle) => self.clamp_time(self.start_at + handle.elapsed()),
            None => self.current_time,
        }
    }

    /// Screen shown before anything is played: the configured snapshot.
    pub fn blank_screen(&self) -> ScreenState {
        ScreenState::new(self.options.snapshot.clone(), Cursor::default())
    }

    fn clamp_time(&self, time: f64) -> f64 {
        let time = if time.is_finite() { time.max(0.0) } else { 0.0 };
        if self.frames.is_some() {
            time.min(self.duration)
        } else {
            time
        }
    }

    /// Read-only projection for renderers.
    pub fn view(&self) -> PlayerView {
        let size = match (self.options.width, self.options.height) {
            (Some(width), Some(height)) => Some((width, height)),
            _ => self.size,
        };
        PlayerView {
            screen: self.screen.clone(),
            current_time: self.current_time,
            duration: self.duration,
            speed: self.speed,
            playing: self.is_playing(),
            loading: self.loading,
            loaded: self.is_loaded(),
            error: self.error.clone(),
            user_active: self.user_active,
            size,
            title: self.options.title.clone().or_else(|| self.title.clone()),
            author: self.options.author.clone(),
            markers: self.markers.iter().map(|m| m.time).collect(),
            font_size: self.options.font_size.clone(),
            theme: self.options.theme.clone(),
        }
    }
}

/// Snapshot of everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerView {
    pub screen: ScreenState,
    pub current_time: f64,
    pub duration: f64,
    pub speed: f64,
    pub playing: bool,
    pub loading: bool,
    pub loaded: bool,
    pub error: Option<String>,
    pub user_active: bool,
    pub size: Option<(usize, usize)>,
    pub title: Option<String>,
    pub author: Option<String>,
    /// Marker times in seconds
    pub markers: Vec<f64>,
    pub font_size: String,
    pub theme: String,
}

impl PlayerView {
    /// Position as a fraction of the duration, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Whether playback ran to the end and stopped there.
    pub fn is_finished(&self) -> bool {
        self.loaded && !self.playing && self.duration > 0.0 && self.current_time >= self.duration
    }
}
