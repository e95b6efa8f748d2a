//! Terminal rendering for the command-line player.
//!
//! Each call draws one full frame: the recorded screen in a viewport, a
//! progress bar with marker ticks, and a status bar. Output is built into a
//! single string to minimize syscalls and written in one go.

use std::io::{self, Write};

use unicode_width::UnicodeWidthChar;

use crate::player::PlayerView;
use crate::screen::{Attrs, Line};

/// Rows used below the viewport (progress bar + status bar)
pub const CHROME_LINES: u16 = 2;

const RESET: &str = "\x1b[0m";
const WHITE: &str = "\x1b[97m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const DARK_GREY: &str = "\x1b[90m";

/// Draw a complete frame for `view` on a `cols` x `rows` terminal.
pub fn render<W: Write>(out: &mut W, view: &PlayerView, cols: u16, rows: u16) -> io::Result<()> {
    let width = cols as usize;
    let view_rows = rows.saturating_sub(CHROME_LINES) as usize;
    let mut output = String::with_capacity(width * (view_rows + 2) * 2);

    render_viewport(&mut output, view, width, view_rows);
    if rows >= CHROME_LINES {
        output.push_str(&format!("\x1b[{};1H", rows - 1));
        output.push_str(&progress_line(view, width));
        output.push_str(&format!("\x1b[{};1H", rows));
        if view.user_active || !view.playing || view.error.is_some() {
            output.push_str(&status_line(view, width));
        } else {
            output.push_str(&" ".repeat(width));
        }
    }

    out.write_all(output.as_bytes())?;
    out.flush()
}

/// First screen row shown, keeping the cursor inside the viewport.
fn viewport_offset(view: &PlayerView, view_rows: usize) -> usize {
    let cursor_y = view.screen.cursor.y;
    if view_rows > 0 && cursor_y >= view_rows {
        cursor_y + 1 - view_rows
    } else {
        0
    }
}

fn render_viewport(output: &mut String, view: &PlayerView, width: usize, view_rows: usize) {
    let offset = viewport_offset(view, view_rows);
    let cursor = view.screen.cursor;
    let message = if view.loading {
        Some("Loading...")
    } else if !view.loaded && view.error.is_none() && view.screen.lines.is_empty() {
        Some("Press space to play")
    } else {
        None
    };

    for view_row in 0..view_rows {
        let screen_row = view_row + offset;
        output.push_str(&format!("\x1b[{};1H", view_row + 1));

        if let (Some(text), true) = (message, view_row == view_rows / 2) {
            let pad = width.saturating_sub(text.len()) / 2;
            let line = format!("{}{}", " ".repeat(pad), text);
            output.push_str(DARK_GREY);
            output.push_str(&pad_to_width(&line, width));
            output.push_str(RESET);
            continue;
        }

        let cursor_col = (cursor.shown() && cursor.y == screen_row).then_some(cursor.x);
        match view.screen.lines.get(screen_row) {
            Some(line) => render_line(output, line, width, cursor_col),
            None => render_line(output, &Line::new(), width, cursor_col),
        }
    }
}

/// Render one line padded to `width`, drawing the cursor as an inverted cell.
fn render_line(output: &mut String, line: &Line, width: usize, cursor_col: Option<usize>) {
    let mut col = 0usize;
    let mut current = Attrs::default();

    let cells = line
        .iter()
        .flat_map(|segment| segment.text().chars().map(move |ch| (ch, *segment.attrs())))
        .chain(std::iter::repeat((' ', Attrs::default())));

    for (ch, attrs) in cells {
        let ch_width = ch.width().unwrap_or(0);
        if ch_width == 0 {
            continue;
        }
        if col + ch_width > width {
            break;
        }
        let mut attrs = attrs;
        if cursor_col == Some(col) {
            attrs.inverse = !attrs.inverse;
        }
        if attrs != current {
            output.push_str(RESET);
            push_sgr(output, &attrs);
            current = attrs;
        }
        output.push(ch);
        col += ch_width;
    }

    // A wide char that didn't fit leaves a gap
    if col < width {
        if current != Attrs::default() {
            output.push_str(RESET);
            current = Attrs::default();
        }
        output.push_str(&" ".repeat(width - col));
    }
    if current != Attrs::default() {
        output.push_str(RESET);
    }
}

/// Append SGR sequences for non-default attributes.
fn push_sgr(output: &mut String, attrs: &Attrs) {
    if let Some(fg) = attrs.fg {
        match fg {
            0..=7 => output.push_str(&format!("\x1b[{}m", 30 + fg)),
            8..=15 => output.push_str(&format!("\x1b[{}m", 90 + fg - 8)),
            _ => output.push_str(&format!("\x1b[38;5;{}m", fg)),
        }
    }
    if let Some(bg) = attrs.bg {
        match bg {
            0..=7 => output.push_str(&format!("\x1b[{}m", 40 + bg)),
            8..=15 => output.push_str(&format!("\x1b[{}m", 100 + bg - 8)),
            _ => output.push_str(&format!("\x1b[48;5;{}m", bg)),
        }
    }
    if attrs.bold {
        output.push_str("\x1b[1m");
    }
    if attrs.italic {
        output.push_str("\x1b[3m");
    }
    if attrs.underline {
        output.push_str("\x1b[4m");
    }
    if attrs.blink {
        output.push_str("\x1b[5m");
    }
    if attrs.inverse {
        output.push_str("\x1b[7m");
    }
}

fn pad_to_width(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(&" ".repeat(width - used));
    out
}

/// Format a duration in seconds to MM:SS format.
pub fn format_duration(seconds: f64) -> String {
    let total_secs = seconds.max(0.0) as u64;
    let mins = total_secs / 60;
    let secs = total_secs % 60;
    format!("{:02}:{:02}", mins, secs)
}

/// Progress bar glyphs: `━` played, `⏺` position, `─` remaining, `◆` marker.
pub fn progress_bar(bar_width: usize, progress: f64, markers: &[f64], duration: f64) -> Vec<char> {
    let filled = (bar_width as f64 * progress.clamp(0.0, 1.0)) as usize;
    let mut bar: Vec<char> = (0..bar_width)
        .map(|i| if i < filled { '━' } else { '─' })
        .collect();
    if filled < bar_width {
        bar[filled] = '⏺';
    }
    if duration > 0.0 {
        for time in markers {
            let pos = ((time / duration) * bar_width as f64) as usize;
            if pos < bar_width && bar[pos] != '⏺' {
                bar[pos] = '◆';
            }
        }
    }
    bar
}

fn progress_line(view: &PlayerView, width: usize) -> String {
    let time_display = format!(
        " {}/{}",
        format_duration(view.current_time),
        format_duration(view.duration)
    );
    let bar_width = width.saturating_sub(1 + time_display.len() + 1);
    let bar = progress_bar(bar_width, view.progress(), &view.markers, view.duration);

    let mut output = String::with_capacity(width * 4);
    output.push(' ');
    for ch in bar {
        match ch {
            '━' => output.push_str(GREEN),
            '⏺' => output.push_str(WHITE),
            '◆' => output.push_str(YELLOW),
            _ => output.push_str(DARK_GREY),
        }
        output.push(ch);
    }
    output.push_str(DARK_GREY);
    output.push_str(&time_display);
    let used = 1 + bar_width + time_display.len();
    output.push_str(&" ".repeat(width.saturating_sub(used)));
    output.push_str(RESET);
    output
}

fn status_line(view: &PlayerView, width: usize) -> String {
    let mut left = String::new();
    let mut visible = String::new();

    let icon = if view.playing { "⏸ " } else { "▶ " };
    left.push_str(WHITE);
    left.push(' ');
    left.push_str(icon);
    visible.push(' ');
    visible.push_str(icon);

    let speed = format!(" {}x ", format_speed(view.speed));
    left.push_str(DARK_GREY);
    left.push_str(&speed);
    visible.push_str(&speed);

    if let Some(error) = &view.error {
        let text = format!(" {} ", error);
        left.push_str(RED);
        left.push_str(&text);
        visible.push_str(&text);
    } else if let Some(title) = &view.title {
        let text = format!(" {} ", title);
        left.push_str(WHITE);
        left.push_str(&text);
        visible.push_str(&text);
    }

    let hints = "│ space:play ←→:seek +-:speed 0-9:jump q:quit";
    left.push_str(CYAN);
    visible.push_str(hints);
    left.push_str(hints);

    let used: usize = visible.chars().map(|c| c.width().unwrap_or(0)).sum();
    if used > width {
        // Too narrow for everything: fall back to the plain text, truncated
        return format!("{}{}{}", WHITE, pad_to_width(&visible, width), RESET);
    }
    left.push_str(&" ".repeat(width - used));
    left.push_str(RESET);
    left
}

fn format_speed(speed: f64) -> String {
    if speed >= 1.0 && speed.fract() == 0.0 {
        format!("{}", speed as u32)
    } else {
        let text = format!("{:.4}", speed);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
