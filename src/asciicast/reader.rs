//! Recording parser.
//!
//! Detects the layout from the document shape and its version tag:
//!
//! ```text
//! [[0, {"lines": {...}, "cursor": {...}}], [0.5, {...}]]      <- format 0
//! {"version": 1, "width": 80, "height": 24, "stdout": [...]}  <- format 1
//! {"version": 3, "term": {"cols": 80, "rows": 24}}            <- stream header
//! [0.5, "o", "Hello "]                                        <- stream event
//! ```
//!
//! Malformed JSON is a [`PlayerError::Parse`]; an unknown version is a
//! [`PlayerError::UnsupportedVersion`] and is never silently defaulted.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::types::{
    DiffRecording, EventType, Recording, RecordingVersion, StdoutRecording, StreamEvent,
    StreamRecording,
};
use crate::error::{PlayerError, Result};
use crate::screen::ScreenDiff;

const DEFAULT_WIDTH: usize = 80;
const DEFAULT_HEIGHT: usize = 24;

/// Highest line count a format 0 screen may address.
pub const MAX_LINES: usize = 1000;

#[derive(Debug, Deserialize)]
struct TermInfo {
    #[serde(default)]
    cols: Option<usize>,
    #[serde(default)]
    rows: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct StreamHeader {
    #[serde(default)]
    width: Option<usize>,
    #[serde(default)]
    height: Option<usize>,
    #[serde(default)]
    term: Option<TermInfo>,
    #[serde(default)]
    title: Option<String>,
}

impl StreamEvent {
    /// Parse an event line: `[time, type_code, data]`.
    fn from_json(line: &str, line_num: usize) -> Result<(f64, EventType, String)> {
        let invalid = |msg: &str| PlayerError::InvalidRecording(format!("line {}: {}", line_num, msg));

        let value: Value = serde_json::from_str(line)?;
        let arr = value
            .as_array()
            .ok_or_else(|| invalid("event must be a JSON array"))?;
        if arr.len() < 3 {
            return Err(invalid("event array must have at least 3 elements"));
        }
        let time = arr[0]
            .as_f64()
            .ok_or_else(|| invalid("event time must be a number"))?;
        let code = arr[1]
            .as_str()
            .ok_or_else(|| invalid("event type must be a string"))?;
        let event_type =
            EventType::from_code(code).ok_or_else(|| invalid(&format!("unknown event type: {}", code)))?;
        let data = arr[2]
            .as_str()
            .ok_or_else(|| invalid("event data must be a string"))?
            .to_string();
        Ok((time, event_type, data))
    }
}

impl Recording {
    /// Parse a recording from a filesystem path.
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| PlayerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&content)
    }

    /// Parse a recording document held in memory.
    pub fn parse_str(content: &str) -> Result<Self> {
        let trimmed = content.trim_start();
        if trimmed.is_empty() {
            return Err(PlayerError::InvalidRecording("recording is empty".to_string()));
        }

        if trimmed.starts_with('[') {
            let frames: Vec<(f64, ScreenDiff)> = serde_json::from_str(trimmed)?;
            check_line_indices(&frames)?;
            return Ok(Recording::Diff(DiffRecording { frames }));
        }

        // A whole-document object is format 1 (or a header-only stream);
        // otherwise the first line is a stream header.
        let (header, whole_document) = match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => (value, true),
            Err(_) => {
                let first = trimmed.lines().next().unwrap_or_default();
                (serde_json::from_str::<Value>(first)?, false)
            }
        };

        let version = header
            .get("version")
            .and_then(Value::as_u64)
            .ok_or_else(|| PlayerError::InvalidRecording("missing version field".to_string()))?;

        match RecordingVersion::resolve(version)? {
            RecordingVersion::Diff => Err(PlayerError::InvalidRecording(
                "version 0 recordings must be a JSON array".to_string(),
            )),
            RecordingVersion::Stdout if whole_document => {
                let rec: StdoutRecording = serde_json::from_value(header)?;
                Ok(Recording::Stdout(rec))
            }
            RecordingVersion::Stdout => Err(PlayerError::InvalidRecording(
                "version 1 recordings must be a single JSON document".to_string(),
            )),
            stream => parse_stream(stream, header, trimmed),
        }
    }
}

fn check_line_indices(frames: &[(f64, ScreenDiff)]) -> Result<()> {
    for (idx, (_, diff)) in frames.iter().enumerate() {
        if let Some(line) = diff.lines.keys().find(|line| **line >= MAX_LINES) {
            return Err(PlayerError::InvalidRecording(format!(
                "frame {}: line index {} exceeds the {} line limit",
                idx, line, MAX_LINES
            )));
        }
    }
    Ok(())
}

fn parse_stream(version: RecordingVersion, header: Value, content: &str) -> Result<Recording> {
    let header: StreamHeader = serde_json::from_value(header)?;
    let term = header.term.as_ref();
    let width = header
        .width
        .or_else(|| term.and_then(|t| t.cols))
        .unwrap_or(DEFAULT_WIDTH);
    let height = header
        .height
        .or_else(|| term.and_then(|t| t.rows))
        .unwrap_or(DEFAULT_HEIGHT);

    let mut events = Vec::new();
    let mut previous = 0.0f64;
    for (idx, line) in content.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let (time, event_type, data) = StreamEvent::from_json(line, idx + 1)?;
        let delay = match version {
            RecordingVersion::StreamV2 => {
                let delay = (time - previous).max(0.0);
                previous = time;
                delay
            }
            _ => time.max(0.0),
        };
        events.push(StreamEvent {
            delay,
            event_type,
            data,
        });
    }

    Ok(Recording::Stream(StreamRecording {
        version,
        width,
        height,
        title: header.title,
        events,
    }))
}
