//! castplay Library
//!
//! Player engine for asciicast terminal recordings: format parsing, frame
//! timelines, a drift-free virtual-time scheduler, and an event-driven player
//! with seeking, speed control, and idle detection.

pub mod asciicast;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod options;
pub mod playback;
pub mod player;
pub mod render;
pub mod screen;
pub mod terminal;
pub mod timeline;

pub use asciicast::Recording;
pub use config::Config;
pub use error::{PlayerError, Result};
pub use options::PlayerOptions;
pub use player::{Event, Player, PlayerView};
pub use timeline::{Frame, Timeline};
