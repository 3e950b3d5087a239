//! The `fuser::Filesystem` implementation over a loaded document.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime};

use fuser::{
    FileAttr, FileType, Filesystem, ReplyAttr, ReplyCreate, ReplyData, ReplyDirectory, ReplyEmpty,
    ReplyEntry, ReplyOpen, ReplyWrite, Request, TimeOrNow,
};
use tracing::{debug, info, warn};

use jsonfs_core::{attr, dir, read, render, resolve_with_stop};
use jsonfs_core::{Attributes, Document, EntryKind, FsError, Node, Path};

use crate::inode::InodeTable;

/// Attribute and entry cache TTL handed to the kernel. The tree never
/// changes while mounted, so the kernel may cache for as long as it likes.
const TTL: Duration = Duration::from_secs(3600);

/// Map a core failure onto the framework's errno convention.
fn errno(error: &FsError) -> libc::c_int {
    match error {
        FsError::NotFound { .. } => libc::ENOENT,
        FsError::NotADirectory { .. } => libc::ENOTDIR,
        FsError::NotAFile { .. } => libc::EISDIR,
        FsError::AccessDenied => libc::EACCES,
        FsError::SinkFull => libc::ENOMEM,
    }
}

/// Refuse any open that asks for more than read-only access.
///
/// Checked against the access-mode bits only, so O_NOFOLLOW and friends
/// still open; the node kind does not matter.
fn check_access_mode(flags: i32) -> Result<(), FsError> {
    if flags & libc::O_ACCMODE != libc::O_RDONLY {
        return Err(FsError::AccessDenied);
    }
    Ok(())
}

/// State kept per open file or directory handle.
///
/// Rendering is idempotent, so a file's content is rendered once at open
/// and every read serves byte slices from the cached copy.
enum OpenHandle {
    File { content: Vec<u8> },
    Dir,
}

/// The read-only JSON projection served to the dispatch framework.
///
/// All document access goes through the core crate; this type only keeps
/// the adapter bookkeeping (inode and handle tables) plus the identity and
/// timestamps reported in attributes. The dispatch loop may call in from
/// any thread: the document is immutable and the tables are lock-guarded.
pub struct JsonFs {
    document: Arc<Document>,
    inodes: RwLock<InodeTable>,
    handles: RwLock<HashMap<u64, OpenHandle>>,
    next_fh: AtomicU64,
    /// Optional reserved segment that halts resolution early.
    stop_segment: Option<String>,
    uid: u32,
    gid: u32,
    mounted_at: SystemTime,
}

impl JsonFs {
    pub fn new(document: Arc<Document>, stop_segment: Option<String>) -> Self {
        JsonFs {
            document,
            inodes: RwLock::new(InodeTable::new()),
            handles: RwLock::new(HashMap::new()),
            next_fh: AtomicU64::new(1),
            stop_segment,
            uid: unsafe { libc::getuid() },
            gid: unsafe { libc::getgid() },
            mounted_at: SystemTime::now(),
        }
    }

    /// Resolve the node a previously assigned inode refers to.
    fn node_of(&self, ino: u64) -> Result<&Node, FsError> {
        let inodes = self.inodes.read().expect("inode table lock poisoned");
        let path = inodes.path_of(ino).ok_or(FsError::NotFound {
            path: Path::root(),
        })?;
        resolve_with_stop(self.document.root(), path, self.stop_segment.as_deref())
    }

    fn path_of(&self, ino: u64) -> Option<Path> {
        self.inodes
            .read()
            .expect("inode table lock poisoned")
            .path_of(ino)
            .cloned()
    }

    fn alloc_fh(&self, handle: OpenHandle) -> u64 {
        let fh = self.next_fh.fetch_add(1, Ordering::Relaxed);
        self.handles
            .write()
            .expect("handle table lock poisoned")
            .insert(fh, handle);
        fh
    }

    fn drop_fh(&self, fh: u64) {
        self.handles
            .write()
            .expect("handle table lock poisoned")
            .remove(&fh);
    }

    /// Convert core attributes into the kernel's stat shape.
    fn file_attr(&self, ino: u64, attrs: &Attributes) -> FileAttr {
        FileAttr {
            ino,
            size: attrs.size,
            blocks: attrs.size.div_ceil(512),
            atime: self.mounted_at,
            mtime: self.mounted_at,
            ctime: self.mounted_at,
            crtime: self.mounted_at,
            kind: match attrs.kind {
                EntryKind::Directory => FileType::Directory,
                EntryKind::File => FileType::RegularFile,
            },
            perm: attrs.perm,
            nlink: attrs.nlink,
            uid: self.uid,
            gid: self.gid,
            rdev: 0,
            blksize: 512,
            flags: 0,
        }
    }
}

impl Filesystem for JsonFs {
    fn lookup(&mut self, _req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEntry) {
        let Some(name) = name.to_str() else {
            // Document keys are UTF-8; a non-UTF-8 name cannot match one
            reply.error(libc::ENOENT);
            return;
        };
        debug!(parent, name, "lookup");

        let Some(parent_path) = self.path_of(parent) else {
            warn!(parent, "lookup against unknown parent inode");
            reply.error(libc::ENOENT);
            return;
        };
        let parent_node = match self.node_of(parent) {
            Ok(node) => node,
            Err(error) => {
                reply.error(errno(&error));
                return;
            }
        };

        // The reserved segment addresses the node reached so far, which for
        // a single lookup step is the parent itself.
        if self.stop_segment.as_deref() == Some(name) {
            let attrs = self.file_attr(parent, &attr::attributes(parent_node));
            reply.entry(&TTL, &attrs, 0);
            return;
        }

        match jsonfs_core::child(parent_node, name) {
            Some(node) => {
                let child_path = parent_path.child(name);
                let ino = self
                    .inodes
                    .write()
                    .expect("inode table lock poisoned")
                    .get_or_insert(&child_path);
                let attrs = self.file_attr(ino, &attr::attributes(node));
                reply.entry(&TTL, &attrs, 0);
            }
            None => reply.error(libc::ENOENT),
        }
    }

    fn getattr(&mut self, _req: &Request<'_>, ino: u64, reply: ReplyAttr) {
        debug!(ino, "getattr");
        match self.node_of(ino) {
            Ok(node) => {
                let attrs = self.file_attr(ino, &attr::attributes(node));
                reply.attr(&TTL, &attrs);
            }
            Err(error) => reply.error(errno(&error)),
        }
    }

    fn opendir(&mut self, _req: &Request<'_>, ino: u64, _flags: i32, reply: ReplyOpen) {
        debug!(ino, "opendir");
        let node = match self.node_of(ino) {
            Ok(node) => node,
            Err(error) => {
                reply.error(errno(&error));
                return;
            }
        };
        if !node.is_container() {
            reply.error(errno(&FsError::NotADirectory { kind: node.kind() }));
            return;
        }
        let fh = self.alloc_fh(OpenHandle::Dir);
        reply.opened(fh, 0);
    }

    fn readdir(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        mut reply: ReplyDirectory,
    ) {
        debug!(ino, offset, "readdir");
        let Some(path) = self.path_of(ino) else {
            reply.error(libc::ENOENT);
            return;
        };
        let node = match self.node_of(ino) {
            Ok(node) => node,
            Err(error) => {
                reply.error(errno(&error));
                return;
            }
        };

        // "." and ".." first; the enumerator produces only real children.
        let parent_ino = match path.parent() {
            Some(parent_path) => self
                .inodes
                .write()
                .expect("inode table lock poisoned")
                .get_or_insert(&parent_path),
            None => ino,
        };
        let mut index: i64 = 0;
        for (entry_ino, name) in [(ino, "."), (parent_ino, "..")] {
            index += 1;
            if index <= offset {
                continue;
            }
            if reply.add(entry_ino, index, FileType::Directory, name) {
                reply.ok();
                return;
            }
        }

        let result = dir::fill(node, |name| {
            index += 1;
            if index <= offset {
                return true;
            }
            let kind = match jsonfs_core::child(node, name) {
                Some(child) if child.is_container() => FileType::Directory,
                _ => FileType::RegularFile,
            };
            let child_ino = self
                .inodes
                .write()
                .expect("inode table lock poisoned")
                .get_or_insert(&path.child(name));
            !reply.add(child_ino, index, kind, name)
        });
        match result {
            Ok(()) => reply.ok(),
            // The reply buffer is full: end this page, the kernel resumes
            // from the last offset it saw. Nothing is dropped.
            Err(FsError::SinkFull) => reply.ok(),
            Err(error) => reply.error(errno(&error)),
        }
    }

    fn releasedir(&mut self, _req: &Request<'_>, _ino: u64, fh: u64, _flags: i32, reply: ReplyEmpty) {
        self.drop_fh(fh);
        reply.ok();
    }

    fn open(&mut self, _req: &Request<'_>, ino: u64, flags: i32, reply: ReplyOpen) {
        debug!(ino, flags, "open");
        let node = match self.node_of(ino) {
            Ok(node) => node,
            Err(error) => {
                reply.error(errno(&error));
                return;
            }
        };
        if let Err(error) = check_access_mode(flags) {
            reply.error(errno(&error));
            return;
        }
        match render::render(node) {
            Ok(content) => {
                let fh = self.alloc_fh(OpenHandle::File {
                    content: content.into_owned().into_bytes(),
                });
                reply.opened(fh, 0);
            }
            Err(error) => reply.error(errno(&error)),
        }
    }

    fn read(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        fh: u64,
        offset: i64,
        size: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyData,
    ) {
        debug!(ino, fh, offset, size, "read");
        let offset = offset.max(0) as u64;
        let handles = self.handles.read().expect("handle table lock poisoned");
        match handles.get(&fh) {
            Some(OpenHandle::File { content }) => reply.data(read::slice(content, offset, size)),
            Some(OpenHandle::Dir) => reply.error(libc::EISDIR),
            None => {
                warn!(fh, "read against unknown file handle");
                reply.error(libc::EBADF);
            }
        }
    }

    fn release(
        &mut self,
        _req: &Request<'_>,
        _ino: u64,
        fh: u64,
        _flags: i32,
        _lock_owner: Option<u64>,
        _flush: bool,
        reply: ReplyEmpty,
    ) {
        self.drop_fh(fh);
        reply.ok();
    }

    fn destroy(&mut self) {
        // The Arc<Document> drops with this value once the session ends
        info!("filesystem unmounted, releasing document");
    }

    // The projection is strictly read-only; every mutating operation is
    // rejected up front rather than left to the framework default.

    fn setattr(
        &mut self,
        _req: &Request<'_>,
        _ino: u64,
        _mode: Option<u32>,
        _uid: Option<u32>,
        _gid: Option<u32>,
        _size: Option<u64>,
        _atime: Option<TimeOrNow>,
        _mtime: Option<TimeOrNow>,
        _ctime: Option<SystemTime>,
        _fh: Option<u64>,
        _crtime: Option<SystemTime>,
        _chgtime: Option<SystemTime>,
        _bkuptime: Option<SystemTime>,
        _flags: Option<u32>,
        reply: ReplyAttr,
    ) {
        reply.error(libc::EROFS);
    }

    fn mknod(
        &mut self,
        _req: &Request<'_>,
        _parent: u64,
        _name: &OsStr,
        _mode: u32,
        _umask: u32,
        _rdev: u32,
        reply: ReplyEntry,
    ) {
        reply.error(libc::EROFS);
    }

    fn mkdir(
        &mut self,
        _req: &Request<'_>,
        _parent: u64,
        _name: &OsStr,
        _mode: u32,
        _umask: u32,
        reply: ReplyEntry,
    ) {
        reply.error(libc::EROFS);
    }

    fn unlink(&mut self, _req: &Request<'_>, _parent: u64, _name: &OsStr, reply: ReplyEmpty) {
        reply.error(libc::EROFS);
    }

    fn rmdir(&mut self, _req: &Request<'_>, _parent: u64, _name: &OsStr, reply: ReplyEmpty) {
        reply.error(libc::EROFS);
    }

    fn symlink(
        &mut self,
        _req: &Request<'_>,
        _parent: u64,
        _link_name: &OsStr,
        _target: &std::path::Path,
        reply: ReplyEntry,
    ) {
        reply.error(libc::EROFS);
    }

    fn rename(
        &mut self,
        _req: &Request<'_>,
        _parent: u64,
        _name: &OsStr,
        _newparent: u64,
        _newname: &OsStr,
        _flags: u32,
        reply: ReplyEmpty,
    ) {
        reply.error(libc::EROFS);
    }

    fn link(
        &mut self,
        _req: &Request<'_>,
        _ino: u64,
        _newparent: u64,
        _newname: &OsStr,
        reply: ReplyEntry,
    ) {
        reply.error(libc::EROFS);
    }

    fn write(
        &mut self,
        _req: &Request<'_>,
        _ino: u64,
        _fh: u64,
        _offset: i64,
        _data: &[u8],
        _write_flags: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyWrite,
    ) {
        reply.error(libc::EROFS);
    }

    fn create(
        &mut self,
        _req: &Request<'_>,
        _parent: u64,
        _name: &OsStr,
        _mode: u32,
        _umask: u32,
        _flags: i32,
        reply: ReplyCreate,
    ) {
        reply.error(libc::EROFS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonfs_core::path;
    use serde_json::json;

    fn filesystem(stop: Option<&str>) -> JsonFs {
        let document = Document::new(Node::from(json!({
            "greeting": "hello",
            "items": [1, 2.5, true],
        })));
        JsonFs::new(Arc::new(document), stop.map(|s| s.to_string()))
    }

    #[test]
    fn errno_mapping_covers_the_taxonomy() {
        assert_eq!(errno(&FsError::NotFound { path: path!("x") }), libc::ENOENT);
        assert_eq!(
            errno(&FsError::NotADirectory {
                kind: jsonfs_core::NodeKind::Integer
            }),
            libc::ENOTDIR
        );
        assert_eq!(
            errno(&FsError::NotAFile {
                kind: jsonfs_core::NodeKind::Object
            }),
            libc::EISDIR
        );
        assert_eq!(errno(&FsError::AccessDenied), libc::EACCES);
        assert_eq!(errno(&FsError::SinkFull), libc::ENOMEM);
    }

    #[test]
    fn root_inode_resolves_to_document_root() {
        let fs = filesystem(None);
        let node = fs.node_of(crate::inode::ROOT_INO).unwrap();
        assert!(node.is_container());
    }

    #[test]
    fn unknown_inode_is_not_found() {
        let fs = filesystem(None);
        assert!(matches!(fs.node_of(4242), Err(FsError::NotFound { .. })));
    }

    #[test]
    fn file_attr_carries_core_attributes() {
        let fs = filesystem(None);
        let node = Node::String("four".to_string());
        let attrs = fs.file_attr(7, &attr::attributes(&node));
        assert_eq!(attrs.ino, 7);
        assert_eq!(attrs.size, 4);
        assert_eq!(attrs.kind, FileType::RegularFile);
        assert_eq!(attrs.perm, 0o444);
        assert_eq!(attrs.nlink, 1);
        assert_eq!(attrs.blksize, 512);
    }

    #[test]
    fn handle_table_allocates_distinct_fhs() {
        let fs = filesystem(None);
        let a = fs.alloc_fh(OpenHandle::Dir);
        let b = fs.alloc_fh(OpenHandle::File { content: vec![] });
        assert_ne!(a, b);
        fs.drop_fh(a);
        assert!(fs
            .handles
            .read()
            .unwrap()
            .get(&a)
            .is_none());
        assert!(fs.handles.read().unwrap().get(&b).is_some());
    }

    #[test]
    fn only_read_only_access_modes_pass() {
        assert!(check_access_mode(libc::O_RDONLY).is_ok());
        assert!(check_access_mode(libc::O_RDONLY | libc::O_NOFOLLOW).is_ok());
        assert_eq!(
            check_access_mode(libc::O_WRONLY),
            Err(FsError::AccessDenied)
        );
        assert_eq!(check_access_mode(libc::O_RDWR), Err(FsError::AccessDenied));
        assert_eq!(
            check_access_mode(libc::O_RDWR | libc::O_TRUNC),
            Err(FsError::AccessDenied)
        );
    }

    #[test]
    fn stop_segment_threads_through_inode_resolution() {
        let fs = filesystem(Some("#self"));
        // Force a path containing the reserved segment into the table; the
        // resolver must stop at "items" and ignore the rest.
        let ino = fs
            .inodes
            .write()
            .unwrap()
            .get_or_insert(&path!("items/#self/junk"));
        let node = fs.node_of(ino).unwrap();
        assert!(node.is_container());
        assert_eq!(dir::entries(node).unwrap().count(), 3);
    }
}
