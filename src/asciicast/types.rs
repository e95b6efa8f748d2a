//! Type definitions for the supported recording formats.
//!
//! Three layouts are understood:
//!
//! - **Format 0**: a JSON array of `[delay, diff]` pairs whose first element
//!   is the full initial screen.
//! - **Format 1**: a single JSON object with the terminal size and a
//!   `stdout` array of `[delay, text]` pairs.
//! - **Stream formats 2 and 3**: newline-delimited JSON, a header object
//!   followed by `[time, code, data]` event arrays. Version 2 times are
//!   absolute, version 3 times are intervals since the previous event.

use serde::Deserialize;

use crate::error::{PlayerError, Result};
use crate::screen::ScreenDiff;

/// Recording layout, resolved from the document's version tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingVersion {
    Diff,
    Stdout,
    StreamV2,
    StreamV3,
}

impl RecordingVersion {
    /// Resolve a version number to a known layout.
    pub fn resolve(version: u64) -> Result<Self> {
        match version {
            0 => Ok(RecordingVersion::Diff),
            1 => Ok(RecordingVersion::Stdout),
            2 => Ok(RecordingVersion::StreamV2),
            3 => Ok(RecordingVersion::StreamV3),
            other => Err(PlayerError::UnsupportedVersion(other)),
        }
    }

    pub fn number(&self) -> u64 {
        match self {
            RecordingVersion::Diff => 0,
            RecordingVersion::Stdout => 1,
            RecordingVersion::StreamV2 => 2,
            RecordingVersion::StreamV3 => 3,
        }
    }
}

/// Format 0: sparse screen diffs.
#[derive(Debug, Clone, Default)]
pub struct DiffRecording {
    pub frames: Vec<(f64, ScreenDiff)>,
}

/// Format 1: raw output chunks for a fixed-size terminal.
#[derive(Debug, Clone, Deserialize)]
pub struct StdoutRecording {
    pub width: usize,
    pub height: usize,
    /// Declared total; the timeline always uses the sum of delays.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub title: Option<String>,
    pub stdout: Vec<(f64, String)>,
}

/// Event type codes in stream recordings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    /// Output (data written to terminal)
    Output, // "o"
    /// Input (data read from terminal)
    Input, // "i"
    /// Marker (annotation)
    Marker, // "m"
    /// Resize (terminal resize)
    Resize, // "r"
    /// Exit (process exit code)
    Exit, // "x"
}

impl EventType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "o" => Some(EventType::Output),
            "i" => Some(EventType::Input),
            "m" => Some(EventType::Marker),
            "r" => Some(EventType::Resize),
            "x" => Some(EventType::Exit),
            _ => None,
        }
    }
}

/// An event in a stream recording, with its delay since the previous event.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamEvent {
    pub delay: f64,
    pub event_type: EventType,
    pub data: String,
}

impl StreamEvent {
    pub fn is_output(&self) -> bool {
        self.event_type == EventType::Output
    }

    pub fn is_marker(&self) -> bool {
        self.event_type == EventType::Marker
    }

    /// Parse resize data ("COLSxROWS") into (cols, rows).
    pub fn parse_resize(&self) -> Option<(usize, usize)> {
        if self.event_type != EventType::Resize {
            return None;
        }
        let (cols, rows) = self.data.split_once('x')?;
        Some((cols.trim().parse().ok()?, rows.trim().parse().ok()?))
    }
}

/// Stream formats 2 and 3, normalized to relative delays.
#[derive(Debug, Clone)]
pub struct StreamRecording {
    pub version: RecordingVersion,
    pub width: usize,
    pub height: usize,
    pub title: Option<String>,
    pub events: Vec<StreamEvent>,
}

/// Marker position for progress display.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Cumulative time when the marker occurs
    pub time: f64,
    pub label: String,
}

/// A parsed recording of any supported format.
#[derive(Debug, Clone)]
pub enum Recording {
    Diff(DiffRecording),
    Stdout(StdoutRecording),
    Stream(StreamRecording),
}

impl Recording {
    pub fn version(&self) -> RecordingVersion {
        match self {
            Recording::Diff(_) => RecordingVersion::Diff,
            Recording::Stdout(_) => RecordingVersion::Stdout,
            Recording::Stream(rec) => rec.version,
        }
    }

    /// Terminal size, when the format declares one.
    pub fn size(&self) -> Option<(usize, usize)> {
        match self {
            Recording::Diff(_) => None,
            Recording::Stdout(rec) => Some((rec.width, rec.height)),
            Recording::Stream(rec) => Some((rec.width, rec.height)),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Recording::Diff(_) => None,
            Recording::Stdout(rec) => rec.title.as_deref(),
            Recording::Stream(rec) => rec.title.as_deref(),
        }
    }

    /// Number of input records (diffs, chunks, or events).
    pub fn record_count(&self) -> usize {
        match self {
            Recording::Diff(rec) => rec.frames.len(),
            Recording::Stdout(rec) => rec.stdout.len(),
            Recording::Stream(rec) => rec.events.len(),
        }
    }

    /// Markers with their cumulative times. Only stream recordings carry them.
    pub fn markers(&self) -> Vec<Marker> {
        let Recording::Stream(rec) = self else {
            return Vec::new();
        };
        let mut cumulative = 0.0f64;
        let mut markers = Vec::new();
        for event in &rec.events {
            cumulative += event.delay;
            if event.is_marker() {
                markers.push(Marker {
                    time: cumulative,
                    label: event.data.clone(),
                });
            }
        }
        markers
    }
}
