//! VTE performer for the virtual screen.

use tracing::trace;
use unicode_width::UnicodeWidthChar;
use vte::{Params, Perform};

use super::Cell;
use crate::screen::Attrs;

/// Cell grid plus cursor and pen state, driven by `vte` callbacks.
pub(crate) struct Grid {
    pub width: usize,
    pub height: usize,
    pub rows: Vec<Vec<Cell>>,
    pub col: usize,
    pub row: usize,
    pub pen: Attrs,
    pub cursor_visible: bool,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![Cell::default(); width]; height],
            col: 0,
            row: 0,
            pen: Attrs::default(),
            cursor_visible: true,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.rows.resize_with(height, || vec![Cell::default(); width]);
        for row in &mut self.rows {
            row.resize(width, Cell::default());
        }
        self.width = width;
        self.height = height;
        self.col = self.col.min(width.saturating_sub(1));
        self.row = self.row.min(height.saturating_sub(1));
    }

    fn line_feed(&mut self) {
        if self.row + 1 < self.height {
            self.row += 1;
        } else {
            self.rows.remove(0);
            self.rows.push(vec![Cell::default(); self.width]);
        }
    }

    fn put_char(&mut self, c: char) {
        let char_width = c.width().unwrap_or(1);
        if char_width == 0 {
            return;
        }
        if self.col + char_width > self.width {
            self.line_feed();
            self.col = 0;
        }
        let attrs = self.pen;
        self.rows[self.row][self.col] = Cell { ch: c, attrs };
        self.col += 1;
        if char_width == 2 && self.col < self.width {
            self.rows[self.row][self.col] = Cell {
                ch: Cell::CONTINUATION,
                attrs,
            };
            self.col += 1;
        }
    }

    fn clear_cells(&mut self, row: usize, from: usize, to: usize) {
        if let Some(cells) = self.rows.get_mut(row) {
            let to = to.min(cells.len());
            for cell in cells.iter_mut().take(to).skip(from) {
                *cell = Cell::default();
            }
        }
    }

    fn erase_line(&mut self, mode: u16) {
        match mode {
            0 => self.clear_cells(self.row, self.col, self.width),
            1 => self.clear_cells(self.row, 0, self.col + 1),
            _ => self.clear_cells(self.row, 0, self.width),
        }
    }

    fn erase_display(&mut self, mode: u16) {
        match mode {
            0 => {
                self.erase_line(0);
                for row in self.row + 1..self.height {
                    self.clear_cells(row, 0, self.width);
                }
            }
            1 => {
                for row in 0..self.row {
                    self.clear_cells(row, 0, self.width);
                }
                self.erase_line(1);
            }
            _ => {
                for row in 0..self.height {
                    self.clear_cells(row, 0, self.width);
                }
            }
        }
    }

    fn set_position(&mut self, row: usize, col: usize) {
        self.row = row.saturating_sub(1).min(self.height - 1);
        self.col = col.saturating_sub(1).min(self.width - 1);
    }

    fn apply_sgr(&mut self, params: &[u16]) {
        if params.is_empty() {
            self.pen = Attrs::default();
            return;
        }
        let mut iter = params.iter().copied();
        while let Some(param) = iter.next() {
            match param {
                0 => self.pen = Attrs::default(),
                1 => self.pen.bold = true,
                3 => self.pen.italic = true,
                4 => self.pen.underline = true,
                5 => self.pen.blink = true,
                7 => self.pen.inverse = true,
                22 => self.pen.bold = false,
                23 => self.pen.italic = false,
                24 => self.pen.underline = false,
                25 => self.pen.blink = false,
                27 => self.pen.inverse = false,
                30..=37 => self.pen.fg = Some((param - 30) as u8),
                39 => self.pen.fg = None,
                40..=47 => self.pen.bg = Some((param - 40) as u8),
                49 => self.pen.bg = None,
                90..=97 => self.pen.fg = Some((param - 90 + 8) as u8),
                100..=107 => self.pen.bg = Some((param - 100 + 8) as u8),
                38 | 48 => {
                    let color = match iter.next() {
                        Some(5) => iter.next().map(|n| n.min(255) as u8),
                        Some(2) => {
                            // Truecolor has no palette slot; consume r, g, b.
                            iter.next();
                            iter.next();
                            iter.next();
                            None
                        }
                        _ => None,
                    };
                    if param == 38 {
                        self.pen.fg = color;
                    } else {
                        self.pen.bg = color;
                    }
                }
                _ => trace!(param, "Unhandled SGR parameter"),
            }
        }
    }
}

impl Perform for Grid {
    fn print(&mut self, c: char) {
        self.put_char(c);
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            b'\n' | b'\x0b' | b'\x0c' => self.line_feed(),
            b'\r' => self.col = 0,
            b'\x08' => self.col = self.col.saturating_sub(1),
            b'\t' => {
                let next_tab = (self.col / 8 + 1) * 8;
                self.col = next_tab.min(self.width - 1);
            }
            _ => {}
        }
    }

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], _ignore: bool, action: char) {
        let params: Vec<u16> = params.iter().flat_map(|p| p.iter().copied()).collect();
        let count = params.first().copied().filter(|&n| n != 0).unwrap_or(1) as usize;

        if intermediates.contains(&b'?') {
            if params.contains(&25) {
                match action {
                    'h' => self.cursor_visible = true,
                    'l' => self.cursor_visible = false,
                    _ => {}
                }
            }
            return;
        }

        match action {
            'A' => self.row = self.row.saturating_sub(count),
            'B' => self.row = (self.row + count).min(self.height - 1),
            'C' => self.col = (self.col + count).min(self.width - 1),
            'D' => self.col = self.col.saturating_sub(count),
            'G' => self.col = (count - 1).min(self.width - 1),
            'd' => self.row = (count - 1).min(self.height - 1),
            'H' | 'f' => {
                let row = params.first().copied().unwrap_or(1) as usize;
                let col = params.get(1).copied().unwrap_or(1) as usize;
                self.set_position(row, col);
            }
            'J' => self.erase_display(params.first().copied().unwrap_or(0)),
            'K' => self.erase_line(params.first().copied().unwrap_or(0)),
            'm' => self.apply_sgr(&params),
            _ => trace!(
                action = %action,
                params = ?params,
                intermediates = ?intermediates,
                "Unhandled CSI sequence"
            ),
        }
    }

    fn esc_dispatch(&mut self, intermediates: &[u8], _ignore: bool, byte: u8) {
        trace!(
            byte = byte,
            byte_char = %char::from(byte),
            intermediates = ?intermediates,
            "Unhandled ESC sequence"
        );
    }
}
