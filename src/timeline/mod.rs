//! Frame timeline.
//!
//! A timeline is an ordered sequence of [`Frame`]s, each carrying the delay
//! before its screen becomes current. Frames are produced lazily by the
//! builder and materialized once per recording for the player.
//!
//! - `builder` - Recording to frames
//! - `cursor` - Slicing, rescaling, and point-in-time lookups

mod builder;
mod cursor;

pub use builder::build;
pub use cursor::{rescale, slice_from, state_at, total_duration};

use std::sync::Arc;

use crate::screen::ScreenState;

/// A screen state together with the delay since the previous frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Seconds before this screen becomes current
    pub delay: f64,
    pub screen: ScreenState,
}

impl Frame {
    pub fn new(delay: f64, screen: ScreenState) -> Self {
        Self { delay, screen }
    }
}

/// Lazy frame sequence.
pub type FrameIter = Box<dyn Iterator<Item = Frame> + Send>;

/// Output of the builder: the total duration and the lazy frames.
pub struct Timeline {
    pub duration: f64,
    pub frames: FrameIter,
}

impl Timeline {
    /// Collect all frames into an immutable shared slice.
    pub fn materialize(self) -> Arc<[Frame]> {
        self.frames.collect::<Vec<_>>().into()
    }
}

/// Owned iterator over shared frames, suitable for moving into a task.
pub fn shared_frames(frames: Arc<[Frame]>) -> impl Iterator<Item = Frame> + Send + 'static {
    (0..frames.len()).map(move |idx| frames[idx].clone())
}
