//! # Window Buffer & Cursor Engine
//!
//! Keeps the on-screen range `[first, last]` of tree entries consistent with
//! the cursor, pulling from the lazy traversal only when the cursor walks past
//! everything pulled so far.
//!
//! ```text
//! entries:  [0][1][2][3][4][5]......      append-only until the next refill
//!               └──window──┘  ▲
//!              first     last  traversal resumes here
//! ```
//!
//! Everything ever pulled stays buffered, so scrolling back up never touches
//! the tree. The window moves by at most one entry per `reconcile`, matching
//! the ±1 cursor moves the loop produces.

use std::ops::Range;

use log::{debug, info};

use crate::core::tree::{Entry, Traversal, TreeModel, open_traversal};

/// What `reconcile` did to restore `first <= cursor <= last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slide {
    None,
    Forward,
    Backward,
    /// Cursor ran past the end of an exhausted traversal and was pulled back.
    Clamped,
}

pub struct WindowBuffer {
    entries: Vec<Entry>,
    traversal: Option<Traversal>,
    first: usize,
    last: usize,
    cursor: usize,
    visible_rows: usize,
    depth_limit: Option<usize>,
}

impl WindowBuffer {
    pub fn new(visible_rows: usize, depth_limit: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            traversal: None,
            first: 0,
            last: 0,
            cursor: 0,
            visible_rows: visible_rows.max(1),
            depth_limit,
        }
    }

    /// Rebuild from a fresh traversal after the tree changed.
    ///
    /// The window start and the cursor index are kept when the new traversal
    /// still reaches them. An expand or collapse only changes the selected
    /// node's descendants, so its preorder index is unchanged.
    pub fn refill<T: TreeModel + ?Sized>(&mut self, tree: &T) {
        // Release the old traversal before opening its replacement.
        self.traversal = None;
        self.entries.clear();

        let target = self.first + self.visible_rows;
        let mut traversal = open_traversal(tree, self.depth_limit);
        while self.entries.len() < target {
            match traversal.next(tree) {
                Some(entry) => self.entries.push(entry),
                None => break,
            }
        }
        self.traversal = Some(traversal);

        if self.entries.is_empty() {
            self.first = 0;
            self.last = 0;
            self.cursor = 0;
        } else {
            self.last = self.entries.len() - 1;
            self.first = self.entries.len().saturating_sub(self.visible_rows);
            self.cursor = self.cursor.clamp(self.first, self.last);
        }

        info!(
            "Refilled window: {} entries buffered, window [{}, {}], cursor {}",
            self.entries.len(),
            self.first,
            self.last,
            self.cursor
        );
    }

    /// Restore `first <= cursor <= last` for the next render.
    pub fn reconcile<T: TreeModel + ?Sized>(&mut self, tree: &T) -> Slide {
        if self.entries.is_empty() {
            self.cursor = 0;
            return Slide::None;
        }

        let slide = if self.cursor > self.last {
            if self.last + 1 < self.entries.len() || self.pull(tree) {
                self.slide_forward();
                Slide::Forward
            } else {
                self.cursor = self.last;
                Slide::Clamped
            }
        } else if self.cursor < self.first {
            self.first -= 1;
            self.last -= 1;
            Slide::Backward
        } else {
            Slide::None
        };

        if slide != Slide::None {
            debug!(
                "Reconciled ({:?}): window [{}, {}], cursor {}",
                slide, self.first, self.last, self.cursor
            );
        }
        slide
    }

    pub fn move_down(&mut self) {
        self.cursor += 1;
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn slide_forward(&mut self) {
        // An under-full window (traversal ran dry at refill) grows instead of sliding.
        if self.last - self.first + 1 >= self.visible_rows {
            self.first += 1;
        }
        self.last += 1;
    }

    fn pull<T: TreeModel + ?Sized>(&mut self, tree: &T) -> bool {
        let Some(traversal) = self.traversal.as_mut() else {
            return false;
        };
        match traversal.next(tree) {
            Some(entry) => {
                self.entries.push(entry);
                true
            }
            None => false,
        }
    }

    /// Indices currently on screen. Empty for an empty buffer.
    pub fn window(&self) -> Range<usize> {
        if self.entries.is_empty() {
            0..0
        } else {
            self.first..self.last + 1
        }
    }

    pub fn entries_in_window(&self) -> impl Iterator<Item = (usize, &Entry)> {
        let window = self.window();
        self.entries[window.clone()].iter().enumerate().map(move |(i, e)| (window.start + i, e))
    }

    pub fn entry_at_cursor(&self) -> Option<&Entry> {
        self.entries.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn first(&self) -> usize {
        self.first
    }

    pub fn last(&self) -> usize {
        self.last
    }

    /// Entries pulled since the last refill.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True once the traversal has nothing left to give.
    pub fn is_exhausted(&self) -> bool {
        self.traversal.as_ref().is_none_or(Traversal::is_exhausted)
    }
}
