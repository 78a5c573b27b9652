//! # Filesystem Tree
//!
//! A `TreeModel` over a directory. Directories are read lazily, one level per
//! `expand`, and collapsing drops the subtree so memory tracks what is on
//! screen rather than what was ever visited.
//!
//! Symlinks are listed with their target but never expanded.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::core::error::TreeError;
use crate::core::tree::{Arena, NodeId, TreeModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsKind {
    Directory,
    File,
    Symlink,
}

struct FsNode {
    path: PathBuf,
    name: String,
    kind: FsKind,
    /// Symlink target, rendered as ` -> target`.
    detail: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct FsTreeOptions {
    pub show_hidden: bool,
    pub dirs_first: bool,
}

impl Default for FsTreeOptions {
    fn default() -> Self {
        Self {
            show_hidden: false,
            dirs_first: true,
        }
    }
}

pub struct FsTree {
    arena: Arena<FsNode>,
    root: NodeId,
    options: FsTreeOptions,
    generation: u64,
}

impl FsTree {
    /// Builds a tree rooted at `root`. Nothing is read until the root is expanded.
    pub fn new(root: &Path, options: FsTreeOptions) -> Result<Self, TreeError> {
        let metadata = fs::symlink_metadata(root).map_err(|source| TreeError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        // A symlinked root is followed once so `sprig link/` browses the target.
        let kind = if metadata.is_dir() || root.is_dir() {
            FsKind::Directory
        } else {
            FsKind::File
        };
        let mut arena = Arena::new();
        let root_id = arena.insert(FsNode {
            path: root.to_path_buf(),
            name: root.display().to_string(),
            kind,
            detail: None,
        });
        Ok(Self {
            arena,
            root: root_id,
            options,
            generation: 0,
        })
    }

    pub fn kind(&self, id: NodeId) -> Option<FsKind> {
        self.arena.get(id).map(|n| n.kind)
    }

    fn read_children(&self, dir: &Path) -> Result<Vec<FsNode>, TreeError> {
        let io_err = |source| TreeError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut nodes = Vec::new();
        for item in fs::read_dir(dir).map_err(io_err)? {
            let item = match item {
                Ok(item) => item,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };
            let name = item.file_name().to_string_lossy().into_owned();
            if !self.options.show_hidden && name.starts_with('.') {
                continue;
            }
            let path = item.path();
            let (kind, detail) = match item.file_type() {
                Ok(ft) if ft.is_symlink() => {
                    let target = fs::read_link(&path)
                        .map(|t| t.display().to_string())
                        .ok();
                    (FsKind::Symlink, target)
                }
                Ok(ft) if ft.is_dir() => (FsKind::Directory, None),
                _ => (FsKind::File, None),
            };
            nodes.push(FsNode {
                path,
                name,
                kind,
                detail,
            });
        }

        let dirs_first = self.options.dirs_first;
        nodes.sort_by(|a, b| {
            let rank = |n: &FsNode| u8::from(!(dirs_first && n.kind == FsKind::Directory));
            match rank(a).cmp(&rank(b)) {
                Ordering::Equal => a.name.cmp(&b.name),
                other => other,
            }
        });
        Ok(nodes)
    }
}

impl TreeModel for FsTree {
    fn root(&self) -> NodeId {
        self.root
    }

    fn name(&self, id: NodeId) -> Option<&str> {
        self.arena.get(id).map(|n| n.name.as_str())
    }

    fn detail(&self, id: NodeId) -> Option<&str> {
        self.arena.get(id).and_then(|n| n.detail.as_deref())
    }

    fn is_branch(&self, id: NodeId) -> bool {
        self.kind(id) == Some(FsKind::Directory)
    }

    fn children(&self, id: NodeId) -> Option<&[NodeId]> {
        self.arena.children(id)
    }

    fn expand(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.arena.get(id).ok_or(TreeError::MissingNode(id))?;
        if node.kind != FsKind::Directory {
            debug!("Not expanding non-directory {}", node.path.display());
            return Ok(());
        }
        if self.arena.children(id).is_some() {
            return Ok(());
        }

        let path = node.path.clone();
        let nodes = self.read_children(&path)?;
        debug!("Expanded {} ({} children)", path.display(), nodes.len());
        let kids = nodes.into_iter().map(|n| self.arena.insert(n)).collect();
        self.arena.set_children(id, kids)?;
        self.generation += 1;
        Ok(())
    }

    fn free_children(&mut self, id: NodeId, depth_limit: Option<usize>) {
        self.arena.free_children(id, depth_limit);
        self.generation += 1;
        debug!(
            "Freed children of {} (keep {:?}), {} nodes live",
            id,
            depth_limit,
            self.arena.live()
        );
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}
