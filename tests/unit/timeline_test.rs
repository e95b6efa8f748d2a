//! Timeline builder and cursor tests against fixture recordings

use std::sync::Arc;

use castplay::asciicast::Recording;
use castplay::timeline::{self, rescale, slice_from, state_at, total_duration, Frame};

use crate::helpers::load_fixture;

fn frames_of(name: &str) -> Arc<[Frame]> {
    let rec = Recording::parse_str(&load_fixture(name)).unwrap();
    timeline::build(rec).materialize()
}

fn delays(frames: impl IntoIterator<Item = Frame>) -> Vec<f64> {
    frames.into_iter().map(|f| f.delay).collect()
}

#[test]
fn build_reports_sum_of_delays() {
    let rec = Recording::parse_str(&load_fixture("v1.json")).unwrap();
    let timeline = timeline::build(rec);
    assert_eq!(timeline.duration, 100.0);
    assert_eq!(timeline.frames.count(), 2);
}

#[test]
fn format_zero_accumulates_diffs() {
    let frames = frames_of("v0.json");
    assert_eq!(frames.len(), 3);
    let last = &frames[2].screen;
    assert_eq!(last.text_lines(), vec!["$ ls", "file.txt"]);
    assert_eq!((last.cursor.x, last.cursor.y), (0, 2));
    assert!(last.cursor.visible);
}

#[test]
fn format_one_feeds_virtual_terminal() {
    let frames = frames_of("v1.json");
    assert_eq!(frames[0].screen.text_lines()[0], "hello");
    assert_eq!(
        frames[1].screen.text_lines(),
        vec!["hello", "world", "", ""]
    );
}

#[test]
fn stream_non_output_delay_moves_to_next_frame() {
    let frames = frames_of("sample.cast");
    assert_eq!(delays(frames.iter().cloned()), vec![0.5, 1.0, 1.0]);
    assert_eq!(total_duration(frames.iter()), 2.5);
}

#[test]
fn stream_trailing_delay_becomes_final_frame() {
    let frames = frames_of("with_markers.cast");
    assert_eq!(delays(frames.iter().cloned()), vec![0.5, 1.5, 2.0]);
    assert_eq!(frames[1].screen, frames[2].screen);
}

#[test]
fn state_at_picks_last_reached_frame() {
    let frames = frames_of("v1.json");
    assert!(state_at(frames.iter(), 49.9).is_none());
    let at_half = state_at(frames.iter(), 50.0).unwrap();
    assert_eq!(at_half.text_lines()[0], "hello");
    assert_eq!(at_half.text_lines()[1], "");
    let at_end = state_at(frames.iter(), 100.0).unwrap();
    assert_eq!(at_end.text_lines()[1], "world");
}

#[test]
fn slice_then_rescale() {
    let frames = frames_of("v1.json");
    let sliced: Vec<Frame> = slice_from(frames.iter().cloned(), 75.0).collect();
    assert_eq!(delays(sliced.clone()), vec![25.0]);
    assert_eq!(delays(rescale(sliced, 2.0)), vec![12.5]);
}

#[test]
fn slice_past_end_is_empty() {
    let frames = frames_of("sample.cast");
    assert_eq!(slice_from(frames.iter().cloned(), 10.0).count(), 0);
}

#[test]
fn sliced_delays_account_for_skipped_time() {
    let frames = frames_of("with_markers.cast");
    let total = total_duration(frames.iter());
    for t in [0.0, 0.25, 0.5, 1.7, 3.9] {
        let rest = total_duration(slice_from(frames.iter().cloned(), t));
        assert!((rest + t - total).abs() < 1e-9, "t = {}", t);
    }
}

#[test]
fn rescale_composes() {
    let frames = frames_of("sample.cast");
    let twice = delays(rescale(rescale(frames.iter().cloned(), 2.0), 4.0));
    let once = delays(rescale(frames.iter().cloned(), 8.0));
    assert_eq!(twice, once);
}

#[test]
fn state_at_is_idempotent() {
    let frames = frames_of("sample.cast");
    let first = state_at(frames.iter(), 1.7);
    let second = state_at(frames.iter(), 1.7);
    assert_eq!(first, second);
    assert!(first.is_some());
}
