//! Recording formats.
//!
//! Parses recordings in the legacy diff format (version 0), the fixed-size
//! stdout format (version 1), and the newline-delimited asciicast v2/v3
//! streams into one tagged [`Recording`] value.
//!
//! # Structure
//!
//! - `types` - Recording, version tag, and stream event types
//! - `reader` - Format detection and parsing

mod reader;
mod types;

pub use reader::MAX_LINES;
pub use types::{
    DiffRecording, EventType, Marker, Recording, RecordingVersion, StdoutRecording, StreamEvent,
    StreamRecording,
};
