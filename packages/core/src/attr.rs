//! Attribute mapping: filesystem metadata for a resolved node.

use crate::node::Node;
use crate::render;

/// Permission bits for directories: read and search for everyone.
pub const DIR_PERM: u16 = 0o555;

/// Permission bits for regular files: read-only for everyone.
pub const FILE_PERM: u16 = 0o444;

/// Whether an entry presents as a directory or a regular file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// Filesystem metadata for one node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attributes {
    pub kind: EntryKind,
    /// Rendered content length in bytes. Zero for directories.
    pub size: u64,
    pub nlink: u32,
    pub perm: u16,
}

impl Attributes {
    fn directory() -> Self {
        // Link count is fixed at 2; no nested-directory accounting is done
        Attributes {
            kind: EntryKind::Directory,
            size: 0,
            nlink: 2,
            perm: DIR_PERM,
        }
    }

    fn file(size: u64) -> Self {
        Attributes {
            kind: EntryKind::File,
            size,
            nlink: 1,
            perm: FILE_PERM,
        }
    }
}

/// Compute the metadata for a resolved node.
///
/// Objects and arrays are directories. Scalars are regular files whose size
/// is the byte length of their canonical rendering, so `attributes(n).size`
/// always equals `render(n).len()`.
pub fn attributes(node: &Node) -> Attributes {
    match node {
        Node::Object(_) | Node::Array(_) => Attributes::directory(),
        Node::String(s) => Attributes::file(s.len() as u64),
        // The literals true/null are 4 bytes, false is 5
        Node::Bool(true) | Node::Null => Attributes::file(4),
        Node::Bool(false) => Attributes::file(5),
        Node::Integer(value) => Attributes::file(render::integer_text(*value).len() as u64),
        Node::Real(value) => Attributes::file(render::real_text(*value).len() as u64),
    }
}
