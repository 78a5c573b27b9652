//! Terminal adapter: the handful of primitives the browser draws with, and
//! the crossterm implementation of them.
//!
//! Output is inline (no alternate screen), so everything above the viewport
//! stays as the shell left it.

use std::io::{self, Stdout, Write, stdout};

use crossterm::cursor::{self, Hide, MoveTo, Show};
use crossterm::event;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use log::{info, warn};

use crate::core::action::Action;
use crate::core::error::BrowseError;
use crate::tui::event::decode_event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalGeometry {
    pub cols: u16,
    pub rows: u16,
}

/// 0-based, terminal-absolute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub row: u16,
    pub col: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Normal,
    /// The row under the cursor.
    Highlight,
}

pub trait Terminal {
    fn size(&mut self) -> io::Result<TerminalGeometry>;
    fn cursor_position(&mut self) -> io::Result<CursorPosition>;
    fn move_cursor(&mut self, row: u16, col: u16) -> io::Result<()>;
    /// Clears from the start of `row` to the bottom of the screen.
    fn clear_lines_below(&mut self, row: u16) -> io::Result<()>;
    /// Scrolls existing content up when the cursor is on the last row.
    fn write_newlines(&mut self, count: u16) -> io::Result<()>;
    /// Writes one line at the cursor and leaves the cursor on that row.
    /// Callers place each row with `move_cursor`; a line break on the bottom
    /// row would scroll the shell history up.
    fn print_line(&mut self, line: &str, style: LineStyle) -> io::Result<()>;
    /// Blocks until one input event arrives.
    fn read_action(&mut self) -> io::Result<Action>;
    fn flush(&mut self) -> io::Result<()>;
}

/// Crossterm-backed terminal. Commands are queued and sent on `flush`.
pub struct CrosstermTerminal<W: Write> {
    out: W,
    highlight: Color,
}

impl CrosstermTerminal<Stdout> {
    pub fn stdout(highlight: Color) -> Self {
        Self::new(stdout(), highlight)
    }
}

impl<W: Write> CrosstermTerminal<W> {
    pub fn new(out: W, highlight: Color) -> Self {
        Self { out, highlight }
    }
}

impl<W: Write> Terminal for CrosstermTerminal<W> {
    fn size(&mut self) -> io::Result<TerminalGeometry> {
        let (cols, rows) = terminal::size()?;
        Ok(TerminalGeometry { cols, rows })
    }

    fn cursor_position(&mut self) -> io::Result<CursorPosition> {
        let (col, row) = cursor::position()?;
        Ok(CursorPosition { row, col })
    }

    fn move_cursor(&mut self, row: u16, col: u16) -> io::Result<()> {
        queue!(self.out, MoveTo(col, row))
    }

    fn clear_lines_below(&mut self, row: u16) -> io::Result<()> {
        queue!(self.out, MoveTo(0, row), Clear(ClearType::FromCursorDown))?;
        self.out.flush()
    }

    fn write_newlines(&mut self, count: u16) -> io::Result<()> {
        for _ in 0..count {
            queue!(self.out, Print("\n"))?;
        }
        self.out.flush()
    }

    fn print_line(&mut self, line: &str, style: LineStyle) -> io::Result<()> {
        match style {
            LineStyle::Highlight => queue!(
                self.out,
                SetForegroundColor(self.highlight),
                Print(line),
                ResetColor
            ),
            LineStyle::Normal => queue!(self.out, Print(line)),
        }
    }

    fn read_action(&mut self) -> io::Result<Action> {
        Ok(decode_event(&event::read()?))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Raw mode for as long as the guard lives. Dropping it restores the
/// terminal on every exit path, including `?` returns and panics.
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn new() -> Result<Self, BrowseError> {
        terminal::enable_raw_mode().map_err(BrowseError::TerminalUnavailable)?;
        let guard = Self;
        execute!(stdout(), Hide).map_err(BrowseError::TerminalUnavailable)?;
        info!("Raw mode enabled");
        Ok(guard)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), ResetColor, Show);
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("Failed to disable raw mode: {}", e);
        } else {
            info!("Raw mode disabled");
        }
    }
}
