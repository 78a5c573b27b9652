//! Turns one `Entry` into the text of one row: tree guides, an expand marker,
//! the name, and an optional detail, truncated to the terminal width.

use std::fmt::Write as _;

use unicode_width::UnicodeWidthChar;

use crate::core::error::{BrowseError, TreeError};
use crate::core::tree::{Entry, TreeModel};

const GUIDE_PIPE: &str = "│   ";
const GUIDE_BLANK: &str = "    ";
const BRANCH_MID: &str = "├── ";
const BRANCH_LAST: &str = "└── ";
const MARKER_OPEN: &str = "▾ ";
const MARKER_CLOSED: &str = "▸ ";

pub trait LineFormatter {
    /// Write the row for `entry` into `out`, replacing its contents.
    fn format(
        &mut self,
        tree: &dyn TreeModel,
        entry: &Entry,
        out: &mut String,
    ) -> Result<(), BrowseError>;
}

pub struct TreeLineFormatter {
    max_width: usize,
}

impl TreeLineFormatter {
    pub fn new(cols: u16) -> Self {
        Self {
            max_width: usize::from(cols),
        }
    }
}

impl LineFormatter for TreeLineFormatter {
    fn format(
        &mut self,
        tree: &dyn TreeModel,
        entry: &Entry,
        out: &mut String,
    ) -> Result<(), BrowseError> {
        out.clear();
        let name = tree
            .name(entry.node)
            .ok_or(TreeError::MissingNode(entry.node))?;

        if let Some((own, ancestors)) = entry.ancestry.split_last() {
            for &ancestor_is_last in ancestors {
                out.push_str(if ancestor_is_last { GUIDE_BLANK } else { GUIDE_PIPE });
            }
            out.push_str(if *own { BRANCH_LAST } else { BRANCH_MID });
        }

        if entry.is_branch {
            out.push_str(if entry.expanded { MARKER_OPEN } else { MARKER_CLOSED });
        }
        out.push_str(name);
        if entry.is_branch && entry.depth > 0 {
            out.push('/');
        }
        if let Some(detail) = tree.detail(entry.node) {
            // Writing to a String cannot fail.
            let _ = write!(out, " -> {detail}");
        }

        truncate_to_width(out, self.max_width);
        Ok(())
    }
}

/// Cut `line` so it occupies at most `max_width` terminal columns.
fn truncate_to_width(line: &mut String, max_width: usize) {
    let mut width = 0;
    let mut cut = None;
    for (index, ch) in line.char_indices() {
        width += ch.width().unwrap_or(0);
        if width > max_width {
            cut = Some(index);
            break;
        }
    }
    if let Some(index) = cut {
        line.truncate(index);
    }
}
