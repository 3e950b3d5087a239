//! Mount entry point: hand the filesystem to the dispatch loop.

use std::sync::Arc;

use fuser::MountOption;
use tracing::info;

use jsonfs_core::Document;

use crate::fs::JsonFs;

/// Mount-time options beyond the always-on read-only baseline.
#[derive(Clone, Debug, Default)]
pub struct MountConfig {
    /// Unmount automatically when the process exits.
    pub auto_unmount: bool,
    /// Reserved path segment that halts resolution and addresses the node
    /// reached so far. Disabled when `None`.
    pub stop_segment: Option<String>,
}

/// Mount `document` at `mountpoint` and run the dispatch loop to unmount.
///
/// The filesystem is always mounted read-only with kernel-side permission
/// checks; the document is released after the session ends.
pub fn mount(
    document: Document,
    mountpoint: &std::path::Path,
    config: MountConfig,
) -> std::io::Result<()> {
    let mut options = vec![
        MountOption::RO,
        MountOption::FSName("jsonfs".to_string()),
        MountOption::DefaultPermissions,
    ];
    if config.auto_unmount {
        options.push(MountOption::AutoUnmount);
    }

    info!(mountpoint = %mountpoint.display(), "mounting document projection");
    let fs = JsonFs::new(Arc::new(document), config.stop_segment);
    fuser::mount2(fs, mountpoint, &options)
}
