//! Screen model shared by recordings, the timeline, and the player.
//!
//! A screen is a list of lines plus a cursor. Lines are runs of text with
//! uniform attributes (`Segment`s), which is also how format 0 recordings
//! store them on disk: `["text", {"fg": 2, "bold": true}]`.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

fn is_false(value: &bool) -> bool {
    !*value
}

/// Text attributes for a run of characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<u8>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub inverse: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub blink: bool,
}

/// A run of text sharing one set of attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment(pub String, pub Attrs);

impl Segment {
    /// Create an unstyled segment.
    pub fn plain(text: impl Into<String>) -> Self {
        Segment(text.into(), Attrs::default())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    pub fn attrs(&self) -> &Attrs {
        &self.1
    }
}

/// One screen line.
pub type Line = Vec<Segment>;

/// Concatenate the text of all segments in a line.
pub fn line_text(line: &Line) -> String {
    line.iter().map(Segment::text).collect()
}

/// Cursor position and visibility.
///
/// `visible` is the recorded terminal mode; `blink_on` is the blink phase
/// driven during playback. The cursor is drawn only when both are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub x: usize,
    pub y: usize,
    pub visible: bool,
    pub blink_on: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            visible: true,
            blink_on: true,
        }
    }
}

impl Cursor {
    /// Whether a renderer should draw the cursor right now.
    pub fn shown(&self) -> bool {
        self.visible && self.blink_on
    }
}

/// An absolute screen state. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScreenState {
    pub lines: Arc<[Line]>,
    pub cursor: Cursor,
}

impl ScreenState {
    pub fn new(lines: Vec<Line>, cursor: Cursor) -> Self {
        Self {
            lines: lines.into(),
            cursor,
        }
    }

    /// Plain text of every line, for tests and diagnostics.
    pub fn text_lines(&self) -> Vec<String> {
        self.lines.iter().map(line_text).collect()
    }

    /// Copy of this state with the cursor blink phase forced on.
    pub fn with_cursor_on(&self) -> Self {
        let mut state = self.clone();
        state.cursor.blink_on = true;
        state
    }
}

/// Sparse cursor update in a format 0 diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CursorDiff {
    #[serde(default)]
    pub x: Option<usize>,
    #[serde(default)]
    pub y: Option<usize>,
    #[serde(default)]
    pub visible: Option<bool>,
}

/// Sparse screen update in a format 0 recording.
///
/// `lines` maps line indices to their full new content.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScreenDiff {
    #[serde(default)]
    pub lines: BTreeMap<usize, Line>,
    #[serde(default)]
    pub cursor: Option<CursorDiff>,
}
