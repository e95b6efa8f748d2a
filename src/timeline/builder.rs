//! Recording to frame timeline.
//!
//! Format 0 diffs are deep-merged into an accumulated screen; byte-stream
//! formats are fed through a [`VirtualScreen`]. Either way every input record
//! yields one absolute frame, lazily, and the duration is known up front.

use std::collections::BTreeMap;
use std::vec;

use tracing::debug;

use super::{Frame, Timeline};
use crate::asciicast::{DiffRecording, EventType, Recording, StdoutRecording, StreamEvent, StreamRecording};
use crate::screen::{Cursor, Line, ScreenDiff, ScreenState};
use crate::terminal::VirtualScreen;

/// Build the timeline for a parsed recording.
pub fn build(recording: Recording) -> Timeline {
    match recording {
        Recording::Diff(rec) => build_diff(rec),
        Recording::Stdout(rec) => build_stdout(rec),
        Recording::Stream(rec) => build_stream(rec),
    }
}

/// Recorded delays below zero would run time backwards.
fn non_negative(delay: f64) -> f64 {
    delay.max(0.0)
}

fn build_diff(rec: DiffRecording) -> Timeline {
    let duration = rec.frames.iter().map(|(delay, _)| non_negative(*delay)).sum();
    let frames = rec
        .frames
        .into_iter()
        .scan(DiffAccumulator::default(), |acc, (delay, diff)| {
            acc.apply(diff);
            Some(Frame::new(non_negative(delay), acc.snapshot()))
        });
    Timeline {
        duration,
        frames: Box::new(frames),
    }
}

fn build_stdout(rec: StdoutRecording) -> Timeline {
    let duration: f64 = rec.stdout.iter().map(|(delay, _)| non_negative(*delay)).sum();
    if let Some(declared) = rec.duration {
        if (declared - duration).abs() > 1e-6 {
            debug!(declared, computed = duration, "Declared duration differs from sum of delays");
        }
    }

    let screen = VirtualScreen::new(rec.width, rec.height);
    let frames = rec
        .stdout
        .into_iter()
        .scan(screen, |screen, (delay, data)| {
            screen.feed(&data);
            Some(Frame::new(non_negative(delay), screen.snapshot()))
        });
    Timeline {
        duration,
        frames: Box::new(frames),
    }
}

fn build_stream(rec: StreamRecording) -> Timeline {
    let duration = rec.events.iter().map(|e| e.delay).sum();
    Timeline {
        duration,
        frames: Box::new(StreamFrames {
            events: rec.events.into_iter(),
            screen: VirtualScreen::new(rec.width, rec.height),
            pending: 0.0,
        }),
    }
}

/// Accumulated format 0 screen.
#[derive(Default)]
struct DiffAccumulator {
    lines: BTreeMap<usize, Line>,
    cursor: Cursor,
}

impl DiffAccumulator {
    fn apply(&mut self, diff: ScreenDiff) {
        self.lines.extend(diff.lines);
        if let Some(cursor) = diff.cursor {
            if let Some(x) = cursor.x {
                self.cursor.x = x;
            }
            if let Some(y) = cursor.y {
                self.cursor.y = y;
            }
            if let Some(visible) = cursor.visible {
                self.cursor.visible = visible;
            }
        }
    }

    /// Dense lines `0..=max_index`; never-written indices are empty.
    fn snapshot(&self) -> ScreenState {
        let len = self
            .lines
            .keys()
            .next_back()
            .and_then(|max| max.checked_add(1))
            .unwrap_or(0);
        let mut lines = vec![Line::new(); len];
        for (idx, line) in &self.lines {
            if let Some(slot) = lines.get_mut(*idx) {
                *slot = line.clone();
            }
        }
        ScreenState::new(lines, self.cursor)
    }
}

/// Frames for stream recordings.
///
/// Output and resize events produce a frame. Other events only contribute
/// their delay to the next frame; delay left over at the end is emitted as a
/// final frame so the frame delays always sum to the recording duration.
struct StreamFrames {
    events: vec::IntoIter<StreamEvent>,
    screen: VirtualScreen,
    pending: f64,
}

impl Iterator for StreamFrames {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        for event in self.events.by_ref() {
            self.pending += event.delay;
            if event.is_output() {
                self.screen.feed(&event.data);
            } else if let Some((cols, rows)) = event.parse_resize() {
                self.screen.resize(cols, rows);
            } else {
                if event.event_type == EventType::Resize {
                    debug!(data = %event.data, "Ignoring malformed resize event");
                }
                continue;
            }
            let delay = std::mem::take(&mut self.pending);
            return Some(Frame::new(delay, self.screen.snapshot()));
        }

        if self.pending > 0.0 {
            let delay = std::mem::take(&mut self.pending);
            return Some(Frame::new(delay, self.screen.snapshot()));
        }
        None
    }
}
