//! # Tree Model
//!
//! The narrow interface the browser uses to look at a hierarchy, plus the
//! lazy traversal that turns the materialized part of it into `Entry` values.
//!
//! ```text
//! TreeModel ──open_traversal()──▶ Traversal ──next(&tree)──▶ Entry
//!     ▲                                                       │
//!     └──────────── expand / free_children ◀── NodeId ────────┘
//! ```
//!
//! Entries only carry a `NodeId` and the structural bits the formatter needs.
//! They never own tree data. Every mutation bumps the tree's generation, and a
//! traversal opened against an older generation yields nothing.

use std::fmt;

use log::debug;

use crate::core::error::TreeError;

/// Opaque handle to a node. Only meaningful for the tree that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One visible row of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub node: NodeId,
    /// 0 for the root.
    pub depth: usize,
    /// Children are materialized.
    pub expanded: bool,
    /// The node can hold children (a directory), whether or not they are loaded.
    pub is_branch: bool,
    /// One flag per level below the root: `true` when the node on the path at
    /// that level is the last of its siblings. The final flag is the entry's own.
    pub ancestry: Vec<bool>,
}

pub trait TreeModel {
    fn root(&self) -> NodeId;

    /// Display name of the node, `None` if the id is dead.
    fn name(&self, id: NodeId) -> Option<&str>;

    /// Extra text shown after the name (e.g. a symlink target).
    fn detail(&self, _id: NodeId) -> Option<&str> {
        None
    }

    fn is_branch(&self, id: NodeId) -> bool;

    /// Materialized children, `None` while collapsed.
    fn children(&self, id: NodeId) -> Option<&[NodeId]>;

    fn has_children(&self, id: NodeId) -> bool {
        self.children(id).is_some()
    }

    /// Load the node's children. A no-op for leaves.
    fn expand(&mut self, id: NodeId) -> Result<(), TreeError>;

    /// Release the node's descendants. `Some(n)` keeps `n` levels materialized
    /// and frees everything deeper; `None` frees the whole subtree.
    fn free_children(&mut self, id: NodeId, depth_limit: Option<usize>);

    /// Bumped on every mutation.
    fn generation(&self) -> u64;
}

struct Pending {
    node: NodeId,
    depth: usize,
    ancestry: Vec<bool>,
}

/// Forward-only preorder walk over materialized nodes.
///
/// Holds no borrow of the tree; each `next` call takes it by reference so
/// the buffer can keep the traversal alive between frames.
pub struct Traversal {
    stack: Vec<Pending>,
    depth_limit: Option<usize>,
    generation: u64,
}

/// Opens a traversal at the tree's current generation. A dead root yields an
/// empty traversal.
pub fn open_traversal<T: TreeModel + ?Sized>(tree: &T, depth_limit: Option<usize>) -> Traversal {
    let root = tree.root();
    let mut stack = Vec::new();
    if tree.name(root).is_some() {
        stack.push(Pending {
            node: root,
            depth: 0,
            ancestry: Vec::new(),
        });
    }
    Traversal {
        stack,
        depth_limit,
        generation: tree.generation(),
    }
}

impl Traversal {
    pub fn next<T: TreeModel + ?Sized>(&mut self, tree: &T) -> Option<Entry> {
        if tree.generation() != self.generation {
            if !self.stack.is_empty() {
                debug!(
                    "Traversal opened at generation {} is stale (tree at {}), dropping",
                    self.generation,
                    tree.generation()
                );
                self.stack.clear();
            }
            return None;
        }

        let Pending {
            node,
            depth,
            ancestry,
        } = self.stack.pop()?;

        let children = tree.children(node);
        let within_limit = self.depth_limit.is_none_or(|limit| depth < limit);
        if let Some(kids) = children
            && within_limit
        {
            // Reverse so the first child is popped next.
            for (i, &child) in kids.iter().enumerate().rev() {
                let mut child_ancestry = Vec::with_capacity(ancestry.len() + 1);
                child_ancestry.extend_from_slice(&ancestry);
                child_ancestry.push(i + 1 == kids.len());
                self.stack.push(Pending {
                    node: child,
                    depth: depth + 1,
                    ancestry: child_ancestry,
                });
            }
        }

        Some(Entry {
            node,
            depth,
            expanded: children.is_some(),
            is_branch: tree.is_branch(node),
            ancestry,
        })
    }

    pub fn is_exhausted(&self) -> bool {
        self.stack.is_empty()
    }
}

// ============================================================================
// Node arena shared by tree implementations
// ============================================================================

struct Slot<N> {
    data: N,
    children: Option<Vec<NodeId>>,
}

/// Slot storage with id reuse. Freed subtrees return their slots to a free list.
pub struct Arena<N> {
    slots: Vec<Option<Slot<N>>>,
    free: Vec<usize>,
}

impl<N> Default for Arena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Arena<N> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn insert(&mut self, data: N) -> NodeId {
        let slot = Slot {
            data,
            children: None,
        };
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(slot);
                NodeId(index)
            }
            None => {
                self.slots.push(Some(slot));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&N> {
        self.slot(id).map(|s| &s.data)
    }

    pub fn children(&self, id: NodeId) -> Option<&[NodeId]> {
        self.slot(id).and_then(|s| s.children.as_deref())
    }

    pub fn set_children(&mut self, id: NodeId, children: Vec<NodeId>) -> Result<(), TreeError> {
        let slot = self
            .slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(TreeError::MissingNode(id))?;
        slot.children = Some(children);
        Ok(())
    }

    /// Number of live nodes.
    pub fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn free_children(&mut self, id: NodeId, keep_levels: Option<usize>) {
        match keep_levels {
            None | Some(0) => {
                let taken = self
                    .slots
                    .get_mut(id.0)
                    .and_then(Option::as_mut)
                    .and_then(|s| s.children.take());
                for child in taken.unwrap_or_default() {
                    self.release(child);
                }
            }
            Some(levels) => {
                let kids = self.children(id).map(<[NodeId]>::to_vec).unwrap_or_default();
                for child in kids {
                    self.free_children(child, Some(levels - 1));
                }
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(slot) = self.slots.get_mut(next.0).and_then(Option::take) {
                self.free.push(next.0);
                pending.extend(slot.children.unwrap_or_default());
            }
        }
    }

    fn slot(&self, id: NodeId) -> Option<&Slot<N>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }
}
