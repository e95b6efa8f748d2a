//! Pure operations over frame sequences.
//!
//! All functions walk cumulative delays the same way, so a time that lands
//! exactly on a frame boundary is treated consistently: the frame at that
//! boundary is already current.

use std::borrow::Borrow;

use super::Frame;
use crate::screen::ScreenState;

/// Drop the first `t` seconds of virtual time.
///
/// The first yielded frame carries the remainder until its natural boundary.
/// Frames whose boundary is at or before `t` are skipped; if `t` is past the
/// end the result is empty.
pub fn slice_from<I>(frames: I, t: f64) -> impl Iterator<Item = Frame>
where
    I: IntoIterator<Item = Frame>,
{
    let t = t.max(0.0);
    let mut elapsed = 0.0f64;
    let mut started = false;
    frames.into_iter().filter_map(move |frame| {
        if started {
            return Some(frame);
        }
        elapsed += frame.delay;
        if elapsed > t {
            started = true;
            Some(Frame {
                delay: elapsed - t,
                ..frame
            })
        } else {
            None
        }
    })
}

/// Divide every delay by `speed`. Screens are unchanged.
pub fn rescale<I>(frames: I, speed: f64) -> impl Iterator<Item = Frame>
where
    I: IntoIterator<Item = Frame>,
{
    debug_assert!(speed > 0.0, "speed must be positive");
    frames.into_iter().map(move |frame| Frame {
        delay: frame.delay / speed,
        ..frame
    })
}

/// Screen of the last frame whose cumulative delay is at most `t`.
///
/// Returns `None` when `t` precedes the first frame.
pub fn state_at<I>(frames: I, t: f64) -> Option<ScreenState>
where
    I: IntoIterator,
    I::Item: Borrow<Frame>,
{
    let mut elapsed = 0.0f64;
    let mut current = None;
    for frame in frames {
        let frame = frame.borrow();
        elapsed += frame.delay;
        if elapsed > t {
            break;
        }
        current = Some(frame.screen.clone());
    }
    current
}

/// Sum of all delays.
pub fn total_duration<I>(frames: I) -> f64
where
    I: IntoIterator,
    I::Item: Borrow<Frame>,
{
    frames.into_iter().map(|frame| frame.borrow().delay).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::{Cursor, Segment};

    fn frame(delay: f64, text: &str) -> Frame {
        Frame::new(
            delay,
            ScreenState::new(vec![vec![Segment::plain(text)]], Cursor::default()),
        )
    }

    fn frames() -> Vec<Frame> {
        vec![frame(1.0, "a"), frame(1.0, "b"), frame(2.0, "c")]
    }

    fn texts(frames: impl Iterator<Item = Frame>) -> Vec<(f64, String)> {
        frames
            .map(|f| (f.delay, f.screen.text_lines().concat()))
            .collect()
    }

    #[test]
    fn slice_inside_frame_keeps_remainder() {
        let sliced = texts(slice_from(frames(), 1.5));
        assert_eq!(sliced, vec![(0.5, "b".to_string()), (2.0, "c".to_string())]);
    }

    #[test]
    fn slice_on_boundary_skips_to_next_frame() {
        let sliced = texts(slice_from(frames(), 2.0));
        assert_eq!(sliced, vec![(2.0, "c".to_string())]);
    }

    #[test]
    fn slice_at_zero_keeps_everything() {
        assert_eq!(slice_from(frames(), 0.0).count(), 3);
    }

    #[test]
    fn slice_past_end_is_empty() {
        assert_eq!(slice_from(frames(), 4.0).count(), 0);
        assert_eq!(slice_from(frames(), 10.0).count(), 0);
    }

    #[test]
    fn rescale_divides_delays() {
        let delays: Vec<f64> = rescale(frames(), 2.0).map(|f| f.delay).collect();
        assert_eq!(delays, vec![0.5, 0.5, 1.0]);
    }

    #[test]
    fn state_at_before_first_frame_is_none() {
        assert!(state_at(&frames(), 0.5).is_none());
    }

    #[test]
    fn state_at_boundary_includes_frame() {
        let state = state_at(&frames(), 2.0).unwrap();
        assert_eq!(state.text_lines(), vec!["b".to_string()]);
    }

    #[test]
    fn state_at_end_is_last_frame() {
        let state = state_at(&frames(), 100.0).unwrap();
        assert_eq!(state.text_lines(), vec!["c".to_string()]);
    }

    #[test]
    fn total_duration_sums_delays() {
        assert_eq!(total_duration(&frames()), 4.0);
        assert_eq!(total_duration(Vec::<Frame>::new()), 0.0);
    }
}
