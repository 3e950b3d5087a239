//! jsonfs core: path resolution and node rendering over a JSON document.
//!
//! The crate projects an immutable JSON tree onto filesystem semantics:
//! - `Node` / `Document`: the parsed tree and its single owner
//! - `Path`: slash-delimited addressing into the tree
//! - `resolve`: mapping a path to a node
//! - `attr`: directory-vs-file metadata for a node
//! - `render`: the canonical text a scalar exposes as file content
//! - `dir`: child entry names for objects and arrays
//! - `read`: bounded, offset-based reads against rendered content
//!
//! Everything here is a pure function of the tree. Nothing mutates a node,
//! so any number of operations may run concurrently over shared borrows
//! with no locking. FUSE wiring lives in `jsonfs-fuse`, not here.
//!
//! # Example
//!
//! ```rust
//! use jsonfs_core::{attr, read, resolve, Document, path};
//!
//! let doc = Document::from_json(r#"{"answer": 42}"#).unwrap();
//! let node = resolve(doc.root(), &path!("answer")).unwrap();
//!
//! assert_eq!(attr::attributes(node).size, 2);
//! assert_eq!(read::read_at(node, 0, 4096).unwrap(), b"42");
//! ```

pub mod attr;
pub mod dir;
mod document;
mod error;
mod node;
mod path;
pub mod read;
pub mod render;
mod resolve;

pub use attr::{Attributes, EntryKind};
pub use document::Document;
pub use error::{DocumentError, FsError};
pub use node::{Node, NodeKind};
pub use path::Path;
pub use resolve::{child, resolve, resolve_with_stop};
