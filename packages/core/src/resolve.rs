//! Path resolution: mapping a path to a node in the document tree.

use tracing::debug;

use crate::error::FsError;
use crate::node::Node;
use crate::path::Path;

/// Resolve `path` against `root`.
///
/// Walks the tree one component at a time: object components are key
/// lookups, array components are strict base-10 indices. Resolution is
/// purely structural and deterministic; the same path against the same
/// tree always yields the same node, and the empty (root) path yields
/// `root` itself.
///
/// Every failure surfaces as [`FsError::NotFound`]. The distinct causes
/// (missing key, bad index, descent past a scalar) are logged at debug
/// level for diagnostics.
///
/// # Examples
///
/// ```rust
/// use jsonfs_core::{resolve, Document, Node, path};
///
/// let doc = Document::from_json(r#"{"users": [{"name": "Alice"}]}"#).unwrap();
/// let node = resolve(doc.root(), &path!("users/0/name")).unwrap();
/// assert_eq!(node, &Node::String("Alice".to_string()));
/// ```
pub fn resolve<'doc>(root: &'doc Node, path: &Path) -> Result<&'doc Node, FsError> {
    resolve_with_stop(root, path, None)
}

/// Resolve `path` against `root`, honoring an optional stop segment.
///
/// When a component equals `stop`, the walk halts and returns the node
/// accumulated so far, ignoring any deeper components. With `stop` set to
/// `None` this is exactly [`resolve`]; the extension changes nothing for
/// paths that never contain the segment.
pub fn resolve_with_stop<'doc>(
    root: &'doc Node,
    path: &Path,
    stop: Option<&str>,
) -> Result<&'doc Node, FsError> {
    let mut cursor = root;
    for component in path.iter() {
        if stop == Some(component.as_str()) {
            return Ok(cursor);
        }
        cursor = match cursor {
            Node::Object(map) => map.get(component.as_str()).ok_or_else(|| {
                debug!(%path, component = %component, "no such key in object");
                FsError::NotFound { path: path.clone() }
            })?,
            Node::Array(items) => {
                let index = component.parse::<usize>().map_err(|error| {
                    debug!(%path, component = %component, %error, "array index did not parse");
                    FsError::NotFound { path: path.clone() }
                })?;
                items.get(index).ok_or_else(|| {
                    debug!(%path, index, len = items.len(), "array index out of range");
                    FsError::NotFound { path: path.clone() }
                })?
            }
            scalar => {
                // Scalars have no children; a remaining component means the
                // path reaches past a leaf.
                debug!(%path, kind = %scalar.kind(), "descent past a scalar node");
                return Err(FsError::NotFound { path: path.clone() });
            }
        };
    }
    Ok(cursor)
}

/// Resolve one child step: `name` as a key of an object or an index of an
/// array.
///
/// This is a single iteration of [`resolve`] for callers that already hold
/// the parent node and a bare entry name (directory lookups hand over one
/// component at a time, never a slash-delimited path, so a key that happens
/// to contain a reserved character is never re-tokenized).
pub fn child<'doc>(parent: &'doc Node, name: &str) -> Option<&'doc Node> {
    match parent {
        Node::Object(map) => map.get(name),
        Node::Array(items) => name.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}
