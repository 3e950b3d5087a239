//! The read engine: bounded, offset-based reads against rendered content.

use crate::error::FsError;
use crate::node::Node;
use crate::render;

/// The byte-range rule for file reads.
///
/// At or past the end of `content` the result is empty (the conventional
/// end-of-file signal, not an error); otherwise it is the
/// `min(size, len - offset)` bytes starting at `offset`.
pub fn slice(content: &[u8], offset: u64, size: u32) -> &[u8] {
    let len = content.len() as u64;
    if offset >= len {
        return &[];
    }
    let start = offset as usize;
    let end = len.min(offset + u64::from(size)) as usize;
    &content[start..end]
}

/// Read up to `size` bytes of a scalar node's rendered content at `offset`.
///
/// Renders the node on every call; rendering is idempotent, so callers that
/// hold a node open may instead render once and apply [`slice`] to the
/// cached bytes. Fails with [`FsError::NotAFile`] for objects and arrays.
pub fn read_at(node: &Node, offset: u64, size: u32) -> Result<Vec<u8>, FsError> {
    let rendered = render::render(node)?;
    Ok(slice(rendered.as_bytes(), offset, size).to_vec())
}
