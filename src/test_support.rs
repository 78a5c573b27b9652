//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;

use crate::core::action::Action;
use crate::core::error::TreeError;
use crate::core::tree::{Arena, NodeId, TreeModel, open_traversal};
use crate::tui::terminal::{CursorPosition, LineStyle, Terminal, TerminalGeometry};

// ============================================================================
// In-memory tree
// ============================================================================

#[derive(Clone, Debug)]
struct Template {
    name: String,
    children: Option<Vec<Template>>,
}

struct MemNode {
    name: String,
    /// Children not yet materialized; `None` for leaves.
    template: Option<Vec<Template>>,
}

/// A `TreeModel` built from a compact notation such as `"root[a[a1,a2],b]"`.
///
/// A name followed by `[...]` is a branch; `x[]` is an empty branch.
/// Branches whose name ends in `!` fail to expand.
pub struct MemoryTree {
    arena: Arena<MemNode>,
    root: NodeId,
    generation: u64,
}

impl MemoryTree {
    pub fn from_spec(spec: &str) -> Self {
        let chars: Vec<char> = spec.chars().filter(|c| !c.is_whitespace()).collect();
        let mut pos = 0;
        let template = parse_node(&chars, &mut pos);
        let mut arena = Arena::new();
        let root = arena.insert(MemNode {
            name: template.name,
            template: template.children,
        });
        Self {
            arena,
            root,
            generation: 0,
        }
    }

    /// Root plus `total - 1` leaves, root expanded: exactly `total` entries.
    pub fn with_entries(total: usize) -> Self {
        let leaves: Vec<String> = (1..total).map(|i| format!("n{i}")).collect();
        let mut tree = Self::from_spec(&format!("root[{}]", leaves.join(",")));
        let root = tree.root();
        tree.expand(root).expect("root expands");
        tree
    }

    pub fn expand_all(&mut self) {
        let mut pending = vec![self.root];
        while let Some(id) = pending.pop() {
            if self.expand(id).is_ok()
                && let Some(kids) = self.children(id)
            {
                pending.extend_from_slice(kids);
            }
        }
    }

    /// Finds a materialized node by name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        let mut traversal = open_traversal(self, None);
        while let Some(entry) = traversal.next(self) {
            if self.name(entry.node) == Some(name) {
                return Some(entry.node);
            }
        }
        None
    }

    pub fn live_nodes(&self) -> usize {
        self.arena.live()
    }
}

fn parse_node(chars: &[char], pos: &mut usize) -> Template {
    let start = *pos;
    while *pos < chars.len() && !matches!(chars[*pos], '[' | ']' | ',') {
        *pos += 1;
    }
    let name: String = chars[start..*pos].iter().collect();
    let mut children = None;
    if *pos < chars.len() && chars[*pos] == '[' {
        *pos += 1;
        let mut kids = Vec::new();
        while *pos < chars.len() && chars[*pos] != ']' {
            kids.push(parse_node(chars, pos));
            if *pos < chars.len() && chars[*pos] == ',' {
                *pos += 1;
            }
        }
        *pos += 1;
        children = Some(kids);
    }
    Template { name, children }
}

impl TreeModel for MemoryTree {
    fn root(&self) -> NodeId {
        self.root
    }

    fn name(&self, id: NodeId) -> Option<&str> {
        self.arena.get(id).map(|n| n.name.as_str())
    }

    fn is_branch(&self, id: NodeId) -> bool {
        self.arena.get(id).is_some_and(|n| n.template.is_some())
    }

    fn children(&self, id: NodeId) -> Option<&[NodeId]> {
        self.arena.children(id)
    }

    fn expand(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.arena.get(id).ok_or(TreeError::MissingNode(id))?;
        if node.name.ends_with('!') {
            return Err(TreeError::Io {
                path: PathBuf::from(&node.name),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            });
        }
        let Some(templates) = node.template.clone() else {
            return Ok(());
        };
        if self.arena.children(id).is_some() {
            return Ok(());
        }
        let kids = templates
            .into_iter()
            .map(|t| {
                self.arena.insert(MemNode {
                    name: t.name,
                    template: t.children,
                })
            })
            .collect();
        self.arena.set_children(id, kids)?;
        self.generation += 1;
        Ok(())
    }

    fn free_children(&mut self, id: NodeId, depth_limit: Option<usize>) {
        self.arena.free_children(id, depth_limit);
        self.generation += 1;
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

// ============================================================================
// Scripted terminal
// ============================================================================

/// Records everything drawn; replays a fixed script of input actions.
/// Returns `Action::Quit` once the script runs out.
pub struct FakeTerminal {
    pub geometry: TerminalGeometry,
    pub cursor: CursorPosition,
    pub actions: VecDeque<Action>,
    /// Lines printed since the last clear, as (row, text, style).
    pub screen: Vec<(u16, String, LineStyle)>,
    pub newlines: u16,
    pub clears: Vec<u16>,
    /// Lines written below the last row, which a real terminal scrolls for.
    pub scrolls: u16,
    pub fail_writes: bool,
    pub fail_queries: bool,
    pub fail_reads: bool,
    row: u16,
}

impl FakeTerminal {
    pub fn new(cols: u16, rows: u16, cursor_row: u16) -> Self {
        Self {
            geometry: TerminalGeometry { cols, rows },
            cursor: CursorPosition {
                row: cursor_row,
                col: 0,
            },
            actions: VecDeque::new(),
            screen: Vec::new(),
            newlines: 0,
            clears: Vec::new(),
            scrolls: 0,
            fail_writes: false,
            fail_queries: false,
            fail_reads: false,
            row: cursor_row,
        }
    }

    pub fn script(mut self, actions: &[Action]) -> Self {
        self.actions.extend(actions.iter().copied());
        self
    }

    /// Text of the highlighted line currently on screen.
    pub fn highlighted(&self) -> Option<&str> {
        self.screen
            .iter()
            .find(|(_, _, style)| *style == LineStyle::Highlight)
            .map(|(_, text, _)| text.as_str())
    }

    pub fn lines(&self) -> Vec<&str> {
        self.screen.iter().map(|(_, text, _)| text.as_str()).collect()
    }

    fn check_write(&self) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "write failed"));
        }
        Ok(())
    }
}

impl Terminal for FakeTerminal {
    fn size(&mut self) -> io::Result<TerminalGeometry> {
        if self.fail_queries {
            return Err(io::Error::other("not a tty"));
        }
        Ok(self.geometry)
    }

    fn cursor_position(&mut self) -> io::Result<CursorPosition> {
        if self.fail_queries {
            return Err(io::Error::other("not a tty"));
        }
        Ok(self.cursor)
    }

    fn move_cursor(&mut self, row: u16, _col: u16) -> io::Result<()> {
        self.check_write()?;
        self.row = row;
        Ok(())
    }

    fn clear_lines_below(&mut self, row: u16) -> io::Result<()> {
        self.check_write()?;
        self.clears.push(row);
        self.screen.retain(|(r, _, _)| *r < row);
        Ok(())
    }

    fn write_newlines(&mut self, count: u16) -> io::Result<()> {
        self.check_write()?;
        self.newlines += count;
        Ok(())
    }

    fn print_line(&mut self, line: &str, style: LineStyle) -> io::Result<()> {
        self.check_write()?;
        if self.row >= self.geometry.rows {
            self.scrolls += 1;
        }
        // Same row twice overwrites, like a real terminal.
        let row = self.row;
        self.screen.retain(|(r, _, _)| *r != row);
        self.screen.push((row, line.to_string(), style));
        Ok(())
    }

    fn read_action(&mut self) -> io::Result<Action> {
        if self.fail_reads {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(self.actions.pop_front().unwrap_or(Action::Quit))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.check_write()
    }
}
