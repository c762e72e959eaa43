//! Character cell frame buffer
//!
//! The renderer composes a whole frame here, then [`FrameBuffer::flush`]
//! queues only the cells that changed since the last flush.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{self, Color},
    terminal,
};

/// One screen cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::Reset,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    /// What the terminal currently shows; `None` forces a full redraw
    shown: Option<Vec<Cell>>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
            shown: None,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Reallocate for a new terminal size; the next flush repaints everything
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::default(); width as usize * height as usize];
        self.shown = None;
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Set one cell; out-of-bounds writes are dropped
    pub fn put(&mut self, x: i32, y: i32, ch: char, fg: Color) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = Cell { ch, fg };
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Write a string left to right, clipping at the edges
    pub fn put_str(&mut self, x: i32, y: i32, text: &str, fg: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.put(x + i as i32, y, ch, fg);
        }
    }

    /// Write a string centered on row `y`
    pub fn put_centered(&mut self, y: i32, text: &str, fg: Color) {
        let len = text.chars().count() as i32;
        let x = (self.width as i32 - len) / 2;
        self.put_str(x, y, text, fg);
    }

    /// Draw sprite rows with their top-left at (x, y). Spaces are
    /// transparent.
    pub fn put_sprite(&mut self, x: i32, y: i32, rows: &[&str], fg: Color) {
        for (dy, row) in rows.iter().enumerate() {
            for (dx, ch) in row.chars().enumerate() {
                if ch != ' ' {
                    self.put(x + dx as i32, y + dy as i32, ch, fg);
                }
            }
        }
    }

    /// Row `y` as plain text
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = y as usize * self.width as usize;
        self.cells[start..start + self.width as usize]
            .iter()
            .map(|c| c.ch)
            .collect()
    }

    /// Queue changed cells to `out` and flush
    pub fn flush(&mut self, out: &mut impl Write) -> io::Result<()> {
        let full = self.shown.is_none();
        if full {
            queue!(out, terminal::Clear(terminal::ClearType::All))?;
        }

        let mut fg = None;
        let mut cursor_at = None;
        for y in 0..self.height {
            for x in 0..self.width {
                let i = y as usize * self.width as usize + x as usize;
                let cell = self.cells[i];
                let unchanged = self
                    .shown
                    .as_ref()
                    .is_some_and(|shown| shown[i] == cell);
                if unchanged {
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(out, cursor::MoveTo(x, y))?;
                }
                if fg != Some(cell.fg) {
                    queue!(out, style::SetForegroundColor(cell.fg))?;
                    fg = Some(cell.fg);
                }
                queue!(out, style::Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        queue!(out, style::ResetColor)?;
        out.flush()?;
        self.shown = Some(self.cells.clone());
        Ok(())
    }
}
