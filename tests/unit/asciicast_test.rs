//! Recording parser tests against fixture files

use castplay::asciicast::{Recording, RecordingVersion};
use castplay::error::PlayerError;

use crate::helpers::{fixtures_dir, load_fixture, temp_fixture};

#[test]
fn detects_every_fixture_format() {
    let cases = [
        ("v0.json", RecordingVersion::Diff),
        ("v1.json", RecordingVersion::Stdout),
        ("sample.cast", RecordingVersion::StreamV2),
        ("with_markers.cast", RecordingVersion::StreamV3),
    ];
    for (name, expected) in cases {
        let rec = Recording::parse_str(&load_fixture(name)).unwrap();
        assert_eq!(rec.version(), expected, "{}", name);
    }
}

#[test]
fn format_one_carries_size_and_title() {
    let rec = Recording::parse_str(&load_fixture("v1.json")).unwrap();
    assert_eq!(rec.size(), Some((20, 4)));
    assert_eq!(rec.title(), Some("Century"));
    assert_eq!(rec.record_count(), 2);
    assert!(rec.markers().is_empty());
}

#[test]
fn format_zero_has_no_declared_size() {
    let rec = Recording::parse_str(&load_fixture("v0.json")).unwrap();
    assert_eq!(rec.size(), None);
    assert_eq!(rec.record_count(), 3);
}

#[test]
fn v2_markers_use_absolute_times() {
    let rec = Recording::parse_str(&load_fixture("sample.cast")).unwrap();
    let markers = rec.markers();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].time, 2.0);
    assert_eq!(markers[0].label, "output");
    assert_eq!(rec.title(), Some("demo"));
}

#[test]
fn v3_markers_accumulate_intervals() {
    let rec = Recording::parse_str(&load_fixture("with_markers.cast")).unwrap();
    let times: Vec<f64> = rec.markers().iter().map(|m| m.time).collect();
    assert_eq!(times, vec![1.5, 4.0]);
    assert_eq!(rec.size(), Some((30, 5)));
}

#[test]
fn unsupported_version_is_rejected() {
    let result = Recording::parse_str(&load_fixture("unsupported.json"));
    assert!(matches!(result, Err(PlayerError::UnsupportedVersion(5))));
}

#[test]
fn parse_reads_from_disk() {
    let (_dir, path) = temp_fixture("sample.cast");
    let rec = Recording::parse(&path).unwrap();
    assert_eq!(rec.record_count(), 4);
}

#[test]
fn parse_missing_file_is_io_error() {
    let result = Recording::parse(fixtures_dir().join("missing.cast"));
    assert!(matches!(result, Err(PlayerError::Io { .. })));
}
