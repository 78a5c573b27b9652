//! # Core
//!
//! Everything that decides *what* is on screen, independent of how it gets
//! drawn.
//!
//! ```text
//!        ┌──────────────┐   traversal    ┌────────────────┐
//!        │  TreeModel   │ ─────────────▶ │  WindowBuffer  │
//!        │ (fs_tree)    │ ◀───────────── │  + cursor      │
//!        └──────────────┘ expand/collapse└────────────────┘
//!                 ▲                              │
//!                 └───────── Action ◀── TUI ─────┘
//! ```
//!
//! ## Modules
//!
//! - [`tree`]: the `TreeModel` trait, node arena, and lazy `Traversal`
//! - [`fs_tree`]: a `TreeModel` over a directory on disk
//! - [`window`]: the sliding window and cursor engine
//! - [`action`]: the `Action` enum, everything the user can ask for
//! - [`config`]: settings and their override hierarchy
//! - [`error`]: error kinds and their handling policy

pub mod action;
pub mod config;
pub mod error;
pub mod fs_tree;
pub mod tree;
pub mod window;
