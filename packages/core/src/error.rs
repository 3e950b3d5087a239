//! Error types for filesystem operations over the document tree.

use crate::node::NodeKind;
use crate::path::Path;

/// Per-call failures surfaced to the dispatch framework.
///
/// All of these are recoverable by the caller and map onto the framework's
/// errno convention at the adapter boundary. Nothing here aborts the mount.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FsError {
    /// The path does not resolve to a node: a missing object key, an
    /// out-of-range or non-numeric array index, or a descent past a scalar.
    #[error("no such entry: /{path}")]
    NotFound { path: Path },

    /// A directory operation was attempted on a scalar node.
    #[error("not a directory: {kind} node")]
    NotADirectory { kind: NodeKind },

    /// A file operation was attempted on an object or array node.
    #[error("not a file: {kind} node")]
    NotAFile { kind: NodeKind },

    /// Non-read-only access was requested on the read-only filesystem.
    #[error("access denied: filesystem is read-only")]
    AccessDenied,

    /// The directory entry sink stopped accepting entries.
    #[error("directory entry sink is full")]
    SinkFull,
}

/// Failures while loading the source document at startup.
///
/// These are fatal to process start and never reach the dispatch loop.
#[derive(thiserror::Error, Debug)]
pub enum DocumentError {
    #[error("unable to read document {}: {source}", .path.display())]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
