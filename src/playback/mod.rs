//! Real-time playback.
//!
//! - `scheduler` - Emits `(delay, data)` items on a wall clock without drift
//! - `coordinator` - Runs one playback session and reports to the player

mod coordinator;
mod scheduler;

pub use coordinator::{start, SessionId, StopHandle, BLINK_PERIOD, CLOCK_TICK};
pub use scheduler::{schedule, schedule_with};
