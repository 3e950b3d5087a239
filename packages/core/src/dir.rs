//! Directory enumeration: child entry names for object and array nodes.

use std::borrow::Cow;
use std::collections::btree_map;
use std::ops::Range;

use crate::error::FsError;
use crate::node::Node;

/// Iterator over a directory node's child entry names.
///
/// Object keys come out in the node's stored iteration order, each exactly
/// once. Array entries are the decimal index strings `"0"` through
/// `"len-1"` in ascending order. The conventional `.` and `..` entries are
/// the dispatch adapter's to emit, not this iterator's.
#[derive(Debug)]
pub enum DirEntries<'a> {
    Object(btree_map::Keys<'a, String, Node>),
    Array(Range<usize>),
}

impl<'a> Iterator for DirEntries<'a> {
    type Item = Cow<'a, str>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            DirEntries::Object(keys) => keys.next().map(|key| Cow::Borrowed(key.as_str())),
            DirEntries::Array(indices) => indices.next().map(|i| Cow::Owned(i.to_string())),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            DirEntries::Object(keys) => keys.size_hint(),
            DirEntries::Array(indices) => indices.size_hint(),
        }
    }
}

/// Enumerate the child entry names of a directory node.
///
/// Fails with [`FsError::NotADirectory`] for scalar nodes.
pub fn entries(node: &Node) -> Result<DirEntries<'_>, FsError> {
    match node {
        Node::Object(map) => Ok(DirEntries::Object(map.keys())),
        Node::Array(items) => Ok(DirEntries::Array(0..items.len())),
        Node::Null
        | Node::Bool(_)
        | Node::Integer(_)
        | Node::Real(_)
        | Node::String(_) => Err(FsError::NotADirectory { kind: node.kind() }),
    }
}

/// Drive the entry names of a directory node into a sink.
///
/// The sink returns `true` while it can accept entries. The first rejection
/// stops enumeration immediately and surfaces as [`FsError::SinkFull`];
/// remaining entries are never silently dropped.
pub fn fill<F>(node: &Node, mut sink: F) -> Result<(), FsError>
where
    F: FnMut(&str) -> bool,
{
    for name in entries(node)? {
        if !sink(&name) {
            return Err(FsError::SinkFull);
        }
    }
    Ok(())
}
