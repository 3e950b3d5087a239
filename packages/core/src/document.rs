//! The root document: owner of the node tree for the lifetime of a mount.

use std::fs;

use crate::error::DocumentError;
use crate::node::Node;

/// The single root of the projected tree.
///
/// Loaded once at startup, dropped once after unmount. Every node reference
/// handed out by the resolver is a borrow bounded by this value, so the
/// mount loop holds it (behind an `Arc`) until the framework guarantees no
/// further calls will be dispatched.
///
/// The tree is immutable after load: `Document` hands out only shared
/// references, and sharing it across dispatch threads needs no locking.
#[derive(Clone, Debug)]
pub struct Document {
    root: Node,
}

impl Document {
    /// Wrap an already-built node tree.
    pub fn new(root: Node) -> Self {
        Document { root }
    }

    /// Parse a document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Ok(Document {
            root: Node::from(value),
        })
    }

    /// Load and parse a document from a file on disk.
    pub fn load(path: &std::path::Path) -> Result<Self, DocumentError> {
        let text = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// The root node of the tree.
    pub fn root(&self) -> &Node {
        &self.root
    }
}
