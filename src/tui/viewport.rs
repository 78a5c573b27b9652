//! # Viewport
//!
//! Claims the part of the terminal below the shell prompt for the browser.
//! When the prompt sits too low, existing content is scrolled up with
//! newlines first, so nothing above the viewport is overwritten.
//!
//! ```text
//!  row 0  ┌──────────────────┐
//!         │ earlier output   │
//!         │ $ sprig          │ ◀ prompt (scrolled up if needed)
//! start ▶ │ ./               │ ┐
//!         │ ├── src/         │ │ visible_rows
//!         │ └── Cargo.toml   │ ┘
//!  rows   └──────────────────┘
//! ```

use log::{debug, info};

use crate::core::error::BrowseError;
use crate::tui::terminal::{CursorPosition, Terminal, TerminalGeometry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub geometry: TerminalGeometry,
    pub origin: CursorPosition,
    pub visible_rows: u16,
    pub start_row: u16,
}

/// Result of the space check at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustment {
    pub position: CursorPosition,
    /// Newlines to emit before drawing. 0 when there is room already.
    pub shift: u16,
}

/// Make sure at least half the terminal is usable below the cursor.
pub fn adjust(geometry: TerminalGeometry, cursor: CursorPosition) -> Adjustment {
    let half = geometry.rows / 2;
    let rows_below = geometry.rows.saturating_sub(cursor.row);
    if rows_below > half {
        return Adjustment {
            position: cursor,
            shift: 0,
        };
    }

    let shift = half - rows_below + 1;
    // Without a real scroll the newlines just walk down from the cursor, so the
    // region cannot start any lower than where the cursor already is.
    let row = geometry.rows.saturating_sub(shift).min(cursor.row);
    Adjustment {
        position: CursorPosition {
            row,
            col: cursor.col,
        },
        shift,
    }
}

/// First terminal row the window is drawn on.
pub fn start_row(geometry: TerminalGeometry, position: CursorPosition, visible_rows: u16) -> u16 {
    let fits = u32::from(position.row) + u32::from(visible_rows) <= u32::from(geometry.rows);
    debug_assert!(
        fits,
        "viewport overflows the terminal: row {} + {} visible > {} rows",
        position.row, visible_rows, geometry.rows
    );
    if fits {
        position.row
    } else {
        geometry.rows.saturating_sub(visible_rows)
    }
}

impl Viewport {
    /// Query the terminal, make room if needed, and fix the drawing region.
    /// Requires raw mode (cursor position queries read the reply from stdin).
    pub fn setup<T: Terminal + ?Sized>(term: &mut T) -> Result<Self, BrowseError> {
        let geometry = term.size().map_err(BrowseError::TerminalUnavailable)?;
        if geometry.rows == 0 {
            return Err(BrowseError::TerminalUnavailable(std::io::Error::other(
                "terminal reports zero rows",
            )));
        }
        let cursor = term
            .cursor_position()
            .map_err(BrowseError::TerminalUnavailable)?;

        let Adjustment { position, shift } = adjust(geometry, cursor);
        if shift > 0 {
            debug!(
                "Cursor at row {} of {}, scrolling {} lines",
                cursor.row, geometry.rows, shift
            );
            term.write_newlines(shift).map_err(BrowseError::Write)?;
        }

        let visible_rows = geometry.rows.saturating_sub(position.row);
        let viewport = Self {
            geometry,
            origin: position,
            visible_rows,
            start_row: start_row(geometry, position, visible_rows),
        };
        info!(
            "Viewport {}x{}: start row {}, {} visible rows",
            geometry.cols, geometry.rows, viewport.start_row, viewport.visible_rows
        );
        Ok(viewport)
    }
}
