//! # TUI Adapter
//!
//! The crossterm-specific layer: claims a region of the terminal, draws the
//! window of tree entries into it, and turns key presses into `Action`s.
//!
//! ## Frame
//!
//! ```text
//! Rendering ──▶ AwaitingInput ──▶ Applying ──▶ Rendering
//!                                     └──────▶ Terminated (quit)
//! ```
//!
//! 1. If the tree changed last frame, refill the window from a fresh traversal.
//! 2. Reconcile the cursor against the window (slides by at most one).
//! 3. Draw `[first, last]`, the cursor row highlighted.
//! 4. Block for one recognized action. Unknown input is read past without
//!    redrawing.
//! 5. Apply it, then clear everything from `start_row` down so a shrinking
//!    window leaves no stale rows behind.
//!
//! Nothing blocks except the read in step 4.

pub mod event;
pub mod formatter;
pub mod terminal;
pub mod viewport;

use std::path::Path;

use log::{debug, error, info, warn};

use crate::core::action::Action;
use crate::core::config::ResolvedConfig;
use crate::core::error::BrowseError;
use crate::core::fs_tree::{FsTree, FsTreeOptions};
use crate::core::tree::TreeModel;
use crate::core::window::WindowBuffer;
use crate::tui::formatter::{LineFormatter, TreeLineFormatter};
use crate::tui::terminal::{CrosstermTerminal, LineStyle, RawModeGuard, Terminal};
use crate::tui::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Rendering,
    AwaitingInput,
    Applying,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One browsing session: the tree, the window onto it, and the mutation flag.
pub struct Browser<T: TreeModel, F: LineFormatter> {
    tree: T,
    formatter: F,
    window: WindowBuffer,
    needs_refill: bool,
    phase: Phase,
    line: String,
}

impl<T: TreeModel, F: LineFormatter> Browser<T, F> {
    pub fn new(tree: T, formatter: F, visible_rows: u16, depth_limit: Option<usize>) -> Self {
        Self {
            tree,
            formatter,
            window: WindowBuffer::new(usize::from(visible_rows), depth_limit),
            needs_refill: true,
            phase: Phase::Rendering,
            line: String::new(),
        }
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    pub fn window(&self) -> &WindowBuffer {
        &self.window
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn needs_refill(&self) -> bool {
        self.needs_refill
    }

    fn enter(&mut self, phase: Phase) {
        debug!("{:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    /// Refill if flagged, then reconcile the cursor.
    pub fn prepare(&mut self) {
        if self.needs_refill {
            self.window.refill(&self.tree);
            self.needs_refill = false;
        }
        self.window.reconcile(&self.tree);
    }

    /// Draw the current window starting at `start_row`, one positioned row per
    /// entry. A row whose node can no longer be read is logged and left blank.
    pub fn render<W: Terminal + ?Sized>(
        &mut self,
        term: &mut W,
        start_row: u16,
    ) -> Result<(), BrowseError> {
        let cursor = self.window.cursor();
        for (row, (index, entry)) in (start_row..).zip(self.window.entries_in_window()) {
            term.move_cursor(row, 0).map_err(BrowseError::Write)?;
            match self.formatter.format(&self.tree, entry, &mut self.line) {
                Ok(()) => {}
                Err(e) if e.is_recoverable() => {
                    warn!("Leaving entry {} blank: {}", index, e);
                    continue;
                }
                Err(e) => return Err(e),
            }
            let style = if index == cursor {
                LineStyle::Highlight
            } else {
                LineStyle::Normal
            };
            term.print_line(&self.line, style)
                .map_err(BrowseError::Write)?;
        }
        term.flush().map_err(BrowseError::Write)
    }

    /// Apply one action to the cursor or the tree.
    ///
    /// A failed expand/collapse is logged and leaves everything unchanged.
    pub fn apply(&mut self, action: Action) -> Flow {
        debug!("Applying {:?}", action);
        match action {
            Action::Quit => return Flow::Quit,
            Action::Down => self.window.move_down(),
            Action::Up => self.window.move_up(),
            Action::Select => {
                if let Err(e) = self.toggle_at_cursor() {
                    warn!("Select failed, tree unchanged: {}", e);
                }
            }
            Action::Unknown => {}
        }
        Flow::Continue
    }

    fn toggle_at_cursor(&mut self) -> Result<(), BrowseError> {
        let Some(entry) = self.window.entry_at_cursor() else {
            return Ok(());
        };
        let node = entry.node;
        if self.tree.has_children(node) {
            debug!("Collapsing {}", node);
            self.tree.free_children(node, None);
        } else {
            debug!("Expanding {}", node);
            self.tree.expand(node)?;
        }
        self.needs_refill = true;
        Ok(())
    }

    /// Run one full frame. Returns `Flow::Quit` when the user asked to leave.
    pub fn frame<W: Terminal + ?Sized>(
        &mut self,
        term: &mut W,
        viewport: &Viewport,
    ) -> Result<Flow, BrowseError> {
        self.enter(Phase::Rendering);
        self.prepare();
        self.render(term, viewport.start_row)?;

        self.enter(Phase::AwaitingInput);
        let action = loop {
            let action = term.read_action().map_err(BrowseError::Read)?;
            if action.is_recognized() {
                break action;
            }
        };

        self.enter(Phase::Applying);
        let flow = self.apply(action);
        term.clear_lines_below(viewport.start_row)
            .map_err(BrowseError::Write)?;

        if flow == Flow::Quit {
            self.enter(Phase::Terminated);
        }
        Ok(flow)
    }

    /// Frames until quit or a fatal error.
    pub fn run_loop<W: Terminal + ?Sized>(
        &mut self,
        term: &mut W,
        viewport: &Viewport,
    ) -> Result<(), BrowseError> {
        while self.frame(term, viewport)? == Flow::Continue {}
        Ok(())
    }
}

/// Browse `root` until the user quits. The terminal is restored on every exit path.
pub fn run(root: &Path, config: &ResolvedConfig) -> Result<(), BrowseError> {
    let options = FsTreeOptions {
        show_hidden: config.show_hidden,
        dirs_first: config.dirs_first,
    };
    let mut tree = FsTree::new(root, options)?;
    let root_id = tree.root();
    tree.expand(root_id)?;

    let _raw_mode = RawModeGuard::new()?;
    let mut term = CrosstermTerminal::stdout(config.highlight);
    let viewport = Viewport::setup(&mut term)?;

    let formatter = TreeLineFormatter::new(viewport.geometry.cols);
    let mut browser = Browser::new(tree, formatter, viewport.visible_rows, config.max_depth);
    info!("Browsing {}", root.display());

    let result = browser.run_loop(&mut term, &viewport);
    if let Err(ref e) = result {
        error!("Loop ended with error: {}", e);
    }
    close_view(&mut term, viewport.start_row);
    result
}

/// Wipe the region so the shell prompt returns where the view started.
fn close_view<W: Terminal + ?Sized>(term: &mut W, start_row: u16) {
    if let Err(e) = term.clear_lines_below(start_row) {
        warn!("Failed to clear the view on exit: {}", e);
    }
}
