//! # Errors
//!
//! Three kinds of failure, each with its own handling policy:
//!
//! - `TerminalUnavailable`: raw mode or geometry queries failed. Fatal at startup.
//! - `Write`: drawing or clearing failed. Ends the loop; raw mode is still restored.
//! - `Read`: the input stream failed. Ends the loop like `Write`.
//! - `TreeAccess`: expand/collapse or traversal failed. Non-fatal for the frame.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::core::tree::NodeId;

/// Failures reported by a `TreeModel`.
#[derive(Debug)]
pub enum TreeError {
    /// Reading a directory failed (permissions, vanished path, ...).
    Io { path: PathBuf, source: io::Error },
    /// The id does not refer to a live node (freed or never allocated).
    MissingNode(NodeId),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::Io { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            TreeError::MissingNode(id) => write!(f, "no such node: {id}"),
        }
    }
}

impl std::error::Error for TreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TreeError::Io { source, .. } => Some(source),
            TreeError::MissingNode(_) => None,
        }
    }
}

#[derive(Debug)]
pub enum BrowseError {
    TerminalUnavailable(io::Error),
    Write(io::Error),
    Read(io::Error),
    TreeAccess(TreeError),
}

impl BrowseError {
    /// True when the loop may carry on after logging the error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BrowseError::TreeAccess(_))
    }
}

impl fmt::Display for BrowseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowseError::TerminalUnavailable(e) => write!(f, "terminal unavailable: {e}"),
            BrowseError::Write(e) => write!(f, "terminal write failed: {e}"),
            BrowseError::Read(e) => write!(f, "terminal input failed: {e}"),
            BrowseError::TreeAccess(e) => write!(f, "tree access failed: {e}"),
        }
    }
}

impl std::error::Error for BrowseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BrowseError::TerminalUnavailable(e)
            | BrowseError::Write(e)
            | BrowseError::Read(e) => Some(e),
            BrowseError::TreeAccess(e) => Some(e),
        }
    }
}

impl From<TreeError> for BrowseError {
    fn from(e: TreeError) -> Self {
        BrowseError::TreeAccess(e)
    }
}

impl From<BrowseError> for io::Error {
    fn from(e: BrowseError) -> Self {
        match e {
            BrowseError::TerminalUnavailable(inner)
            | BrowseError::Write(inner)
            | BrowseError::Read(inner) => inner,
            BrowseError::TreeAccess(inner) => io::Error::other(inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_tree_access_is_recoverable() {
        assert!(BrowseError::TreeAccess(TreeError::MissingNode(NodeId(3))).is_recoverable());
        assert!(!BrowseError::Write(io::Error::other("x")).is_recoverable());
        assert!(!BrowseError::Read(io::Error::other("x")).is_recoverable());
        assert!(!BrowseError::TerminalUnavailable(io::Error::other("x")).is_recoverable());
    }

    #[test]
    fn test_display_includes_path() {
        let err = BrowseError::from(TreeError::Io {
            path: PathBuf::from("/nope"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        });
        let text = err.to_string();
        assert!(text.starts_with("tree access failed"));
        assert!(text.contains("/nope"));
    }

    #[test]
    fn test_into_io_error_keeps_terminal_error_kind() {
        let err = BrowseError::Write(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_read_failure_is_labelled_as_input() {
        let err = BrowseError::Read(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
        assert_eq!(err.to_string(), "terminal input failed: stdin closed");
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
