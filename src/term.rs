//! Display sink: terminal size, frame serialization and the raw-mode session.
//!
//! Frames are serialized as ANSI text. The first frame (and any frame after
//! a size change) is a full redraw; later frames only rewrite cells that
//! differ from the previous one.

use std::fmt::{self, Write as _};
use std::io::{self, Write};

use anyhow::{Context, Result};
use crossterm::terminal;

use crate::ansi_escape_code::{
    CursorInvisible, CursorVisible, DisableAltBuffer, EnableAltBuffer, EraseScreen, Reset,
    SetBackground, SetCursorHome, SetCursorPos, SetForeground,
};
use crate::color::Rgb;
use crate::raster::{Cell, FrameBuffer};

#[cfg(unix)]
pub fn term_size() -> io::Result<(u16, u16)> {
    use libc::{ioctl, winsize, STDOUT_FILENO, TIOCGWINSZ};

    let mut size = winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };

    // SAFETY: TIOCGWINSZ only writes into the winsize we pass.
    let ret = unsafe { ioctl(STDOUT_FILENO, TIOCGWINSZ, &mut size) };
    if ret == -1 {
        return Err(io::Error::last_os_error());
    }
    if size.ws_col == 0 || size.ws_row == 0 {
        return Err(io::Error::new(io::ErrorKind::Other, "terminal reported a zero size"));
    }
    Ok((size.ws_col, size.ws_row))
}

#[cfg(not(unix))]
pub fn term_size() -> io::Result<(u16, u16)> {
    terminal::size()
}

/// Writes the whole grid starting at the home position.
pub fn encode_full(out: &mut impl fmt::Write, fb: &FrameBuffer, background: Rgb) -> fmt::Result {
    write!(out, "{}", SetCursorHome)?;
    let last_row = (fb.height() as usize).saturating_sub(1);

    for (y, row) in fb.rows().enumerate() {
        write!(out, "{}", SetBackground(background))?;
        let mut current: Option<Rgb> = None;
        for cell in row {
            // blank cells only show the background
            if cell.glyph != ' ' && current != Some(cell.color) {
                write!(out, "{}", SetForeground(cell.color))?;
                current = Some(cell.color);
            }
            out.write_char(cell.glyph)?;
        }
        write!(out, "{}", Reset)?;
        if y < last_row {
            out.write_str("\r\n")?;
        }
    }
    Ok(())
}

/// Writes only the cells of `next` that differ from `prev`.
///
/// Both buffers must have the same dimensions.
pub fn encode_diff(
    out: &mut impl fmt::Write,
    next: &FrameBuffer,
    prev: &FrameBuffer,
    background: Rgb,
) -> fmt::Result {
    let width = next.width() as usize;
    let mut prev_set_color: Option<Rgb> = None;
    let mut cursor: Option<usize> = None;
    let mut started = false;

    for (index, (cell, old)) in next.cells().iter().zip(prev.cells()).enumerate() {
        if cell == old {
            continue;
        }
        if !started {
            write!(out, "{}", SetBackground(background))?;
            started = true;
        }
        if cursor != Some(index) {
            let x = (index % width) as u16;
            let y = (index / width) as u16;
            write!(out, "{}", SetCursorPos(y + 1, x + 1))?;
        }
        if cell.glyph != ' ' && prev_set_color != Some(cell.color) {
            write!(out, "{}", SetForeground(cell.color))?;
            prev_set_color = Some(cell.color);
        }
        out.write_char(cell.glyph)?;
        // the cursor wraps to the next row only on the last column; force a move there
        cursor = if (index + 1) % width == 0 { None } else { Some(index + 1) };
    }

    if started {
        write!(out, "{}", Reset)?;
    }
    Ok(())
}

pub struct TerminalSink {
    stdout: io::BufWriter<io::Stdout>,
    background: Rgb,
    last: Option<FrameBuffer>,
    scratch: String,
}

impl TerminalSink {
    pub fn new(background: Rgb) -> Self {
        Self {
            stdout: io::BufWriter::new(io::stdout()),
            background,
            last: None,
            scratch: String::new(),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("enabling raw mode")?;
        write!(
            self.stdout,
            "{}{}{}{}",
            EnableAltBuffer,
            SetBackground(self.background),
            EraseScreen,
            CursorInvisible
        )?;
        self.stdout.flush()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        write!(
            self.stdout,
            "{}{}{}{}",
            Reset, EraseScreen, DisableAltBuffer, CursorVisible
        )?;
        self.stdout.flush()?;
        terminal::disable_raw_mode().context("disabling raw mode")?;
        Ok(())
    }

    /// Force the next frame to be a full redraw.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Writes `fb` and keeps it as the reference for the next diff.
    pub fn present(&mut self, fb: FrameBuffer) -> Result<()> {
        self.scratch.clear();
        match &self.last {
            Some(prev) if prev.width() == fb.width() && prev.height() == fb.height() => {
                encode_diff(&mut self.scratch, &fb, prev, self.background)?;
            }
            _ => {
                write!(self.scratch, "{}{}", SetBackground(self.background), EraseScreen)?;
                encode_full(&mut self.scratch, &fb, self.background)?;
            }
        }
        self.stdout.write_all(self.scratch.as_bytes())?;
        self.stdout.flush()?;
        self.last = Some(fb);
        Ok(())
    }
}

/// Cells of `fb` as plain text rows, without escape codes.
pub fn plain_text(fb: &FrameBuffer) -> Vec<String> {
    fb.rows().map(|row| row.iter().map(|c: &Cell| c.glyph).collect()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREEN: Rgb = Rgb::new(0, 255, 0);
    const BG: Rgb = Rgb::new(0, 0, 0);

    fn strip_ansi(s: &str) -> String {
        let mut out = String::new();
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\x1B' {
                for c in chars.by_ref() {
                    if c.is_ascii_alphabetic() {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn full_redraw_contains_every_row() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.put_str(0, 0, "ab", GREEN);
        let mut out = String::new();
        encode_full(&mut out, &fb, BG).unwrap();
        assert!(out.starts_with("\x1B[H"));
        assert_eq!(strip_ansi(&out), "ab \r\n   ");
    }

    #[test]
    fn full_redraw_sets_colour_once_per_run() {
        let mut fb = FrameBuffer::new(4, 1);
        fb.put_str(0, 0, "abcd", GREEN);
        let mut out = String::new();
        encode_full(&mut out, &fb, BG).unwrap();
        assert_eq!(out.matches("\x1B[38;2;0;255;0m").count(), 1);
    }

    #[test]
    fn diff_of_identical_frames_is_empty() {
        let mut fb = FrameBuffer::new(5, 5);
        fb.put_str(1, 1, "xyz", GREEN);
        let mut out = String::new();
        encode_diff(&mut out, &fb, &fb.clone(), BG).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn diff_moves_cursor_to_changed_cells_only() {
        let prev = FrameBuffer::new(5, 3);
        let mut next = prev.clone();
        next.put_str(1, 2, "hi", GREEN);
        let mut out = String::new();
        encode_diff(&mut out, &next, &prev, BG).unwrap();
        // one move for the contiguous run
        assert_eq!(out.matches("\x1B[3;2H").count(), 1);
        assert_eq!(out.matches('H').count(), 1);
        assert_eq!(strip_ansi(&out), "hi");
    }

    #[test]
    fn plain_text_rows() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.put_str(0, 1, "ok", GREEN);
        assert_eq!(plain_text(&fb), vec!["  ".to_string(), "ok".to_string()]);
    }
}
