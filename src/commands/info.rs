//! Info command handler

use anyhow::{Context, Result};
use std::path::Path;

use castplay::asciicast::Recording;
use castplay::render::format_duration;
use castplay::timeline;

use super::ensure_file_exists;

/// Print a summary of a recording.
pub fn handle(file: &Path) -> Result<()> {
    ensure_file_exists(file)?;
    let recording =
        Recording::parse(file).with_context(|| format!("Failed to load {}", file.display()))?;
    print!("{}", describe(file, recording));
    Ok(())
}

/// Build the summary text. Consumes the recording to build its timeline.
pub fn describe(file: &Path, recording: Recording) -> String {
    let mut out = String::new();
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    out.push_str(&format!("File:     {}\n", name));
    out.push_str(&format!("Format:   v{}\n", recording.version().number()));
    if let Some(title) = recording.title() {
        out.push_str(&format!("Title:    {}\n", title));
    }
    match recording.size() {
        Some((cols, rows)) => out.push_str(&format!("Size:     {}x{}\n", cols, rows)),
        None => out.push_str("Size:     from recording\n"),
    }

    let markers = recording.markers();
    let records = recording.record_count();
    let timeline = timeline::build(recording);
    let duration = timeline.duration;
    let frames = timeline.frames.count();

    out.push_str(&format!("Duration: {} ({:.2}s)\n", format_duration(duration), duration));
    out.push_str(&format!("Records:  {}\n", records));
    out.push_str(&format!("Frames:   {}\n", frames));
    out.push_str(&format!("Markers:  {}\n", markers.len()));
    for marker in &markers {
        out.push_str(&format!("  {} {}\n", format_duration(marker.time), marker.label));
    }
    out
}
