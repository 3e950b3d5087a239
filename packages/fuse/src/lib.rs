//! jsonfs FUSE adapter: the bridge between `jsonfs-core` and `fuser`.
//!
//! The core crate answers every semantic question (what a path resolves to,
//! what a node's metadata and content are); this crate translates between
//! that and the kernel's dispatch protocol:
//! - `InodeTable`: stable u64 inode numbers for resolved paths
//! - `JsonFs`: the `fuser::Filesystem` implementation and errno mapping
//! - `mount`: mount options and the blocking dispatch loop
//!
//! # Example
//!
//! ```no_run
//! use jsonfs_core::Document;
//! use jsonfs_fuse::{mount, MountConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let document = Document::load(std::path::Path::new("data.json"))?;
//! mount(document, std::path::Path::new("/mnt/data"), MountConfig::default())?;
//! # Ok(())
//! # }
//! ```

mod fs;
mod inode;
mod mount;

pub use fs::JsonFs;
pub use inode::{InodeTable, ROOT_INO};
pub use mount::{mount, MountConfig};
