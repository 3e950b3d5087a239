//! Inode bookkeeping: the kernel's u64 handles mapped onto document paths.

use std::collections::HashMap;

use jsonfs_core::Path;

/// The inode number of the mount root, fixed by the FUSE protocol.
pub const ROOT_INO: u64 = fuser::FUSE_ROOT_ID;

/// Bidirectional ino <-> path table.
///
/// The kernel addresses everything after the first lookup by inode number,
/// so each resolved name gets a stable number here. The tree is immutable,
/// which keeps this simple: numbers are never invalidated or recycled, and
/// a path keeps the same number for the lifetime of the mount.
#[derive(Debug)]
pub struct InodeTable {
    by_ino: HashMap<u64, Path>,
    by_path: HashMap<Path, u64>,
    next: u64,
}

impl InodeTable {
    /// Create a table with the root path preassigned to [`ROOT_INO`].
    pub fn new() -> Self {
        let mut table = InodeTable {
            by_ino: HashMap::new(),
            by_path: HashMap::new(),
            next: ROOT_INO + 1,
        };
        table.by_ino.insert(ROOT_INO, Path::root());
        table.by_path.insert(Path::root(), ROOT_INO);
        table
    }

    /// The path a previously assigned inode number refers to.
    pub fn path_of(&self, ino: u64) -> Option<&Path> {
        self.by_ino.get(&ino)
    }

    /// The inode number for `path`, assigning the next free one on first
    /// sight.
    pub fn get_or_insert(&mut self, path: &Path) -> u64 {
        if let Some(&ino) = self.by_path.get(path) {
            return ino;
        }
        let ino = self.next;
        self.next += 1;
        self.by_ino.insert(ino, path.clone());
        self.by_path.insert(path.clone(), ino);
        ino
    }

    /// The inode number for `path` if one was already assigned.
    pub fn get(&self, path: &Path) -> Option<u64> {
        self.by_path.get(path).copied()
    }
}

impl Default for InodeTable {
    fn default() -> Self {
        Self::new()
    }
}
