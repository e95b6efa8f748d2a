//! Virtual terminal used to materialize byte-stream recordings.
//!
//! This is the `feed(state, bytes) -> state'` collaborator of the timeline
//! builder: recorded output chunks are fed in order and a compact
//! [`ScreenState`] is taken after each one. Only the subset of escape
//! sequences needed to show typical shell sessions is understood; anything
//! else is traced and ignored.

mod performer;

use vte::Parser;

use crate::screen::{Attrs, Cursor, Line, ScreenState, Segment};

use performer::Grid;

/// A single cell in the virtual screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cell {
    pub ch: char,
    pub attrs: Attrs,
}

impl Cell {
    /// Second half of a double-width character.
    pub const CONTINUATION: char = '\0';
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            attrs: Attrs::default(),
        }
    }
}

/// A fixed-size virtual terminal screen.
pub struct VirtualScreen {
    grid: Grid,
    parser: Parser,
}

impl VirtualScreen {
    /// Create a blank screen with the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid: Grid::new(width.max(1), height.max(1)),
            parser: Parser::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.grid.width
    }

    pub fn height(&self) -> usize {
        self.grid.height
    }

    /// Feed recorded output through the emulator.
    pub fn feed(&mut self, data: &str) {
        self.parser.advance(&mut self.grid, data.as_bytes());
    }

    /// Resize the screen, keeping the top-left content and clamping the cursor.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.grid.resize(width.max(1), height.max(1));
    }

    /// Compact view of the current screen.
    ///
    /// Equal-styled cells are grouped into segments and trailing unstyled
    /// blanks are dropped from every line.
    pub fn snapshot(&self) -> ScreenState {
        let lines: Vec<Line> = self.grid.rows.iter().map(|row| compact_row(row)).collect();
        let cursor = Cursor {
            x: self.grid.col.min(self.grid.width.saturating_sub(1)),
            y: self.grid.row,
            visible: self.grid.cursor_visible,
            blink_on: true,
        };
        ScreenState::new(lines, cursor)
    }
}

fn compact_row(row: &[Cell]) -> Line {
    let end = row
        .iter()
        .rposition(|cell| cell.ch != ' ' || cell.attrs != Attrs::default())
        .map_or(0, |idx| idx + 1);

    let mut line: Line = Vec::new();
    for cell in &row[..end] {
        if cell.ch == Cell::CONTINUATION {
            continue;
        }
        match line.last_mut() {
            Some(Segment(text, attrs)) if *attrs == cell.attrs => text.push(cell.ch),
            _ => line.push(Segment(cell.ch.to_string(), cell.attrs)),
        }
    }
    line
}
