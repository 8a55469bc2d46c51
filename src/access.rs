use std::fs;
use std::path::Path;
use tracing::debug;

use crate::locator::ProjectFile;

/// Check whether the current user may write `path`, without touching it
///
/// A read-only permission set counts as not writable even for users the
/// OS would let through anyway.
pub fn is_writable(path: &Path) -> bool {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            debug!("Cannot stat {}: {}", path.display(), e);
            return false;
        }
    };

    if metadata.permissions().readonly() {
        return false;
    }

    os_allows_write(path)
}

#[cfg(unix)]
fn os_allows_write(path: &Path) -> bool {
    use nix::unistd::{AccessFlags, access};

    match access(path, AccessFlags::W_OK) {
        Ok(()) => true,
        Err(errno) => {
            debug!("No write access to {}: {}", path.display(), errno);
            false
        }
    }
}

#[cfg(not(unix))]
fn os_allows_write(_path: &Path) -> bool {
    true
}

/// Split candidates into `(writable, not_writable)`
///
/// Every candidate is checked exactly once, has its `writable` flag set from
/// that check and lands in exactly one side.
pub fn partition_writable(files: Vec<ProjectFile>) -> (Vec<ProjectFile>, Vec<ProjectFile>) {
    let (writable, unwritable): (Vec<_>, Vec<_>) = files
        .into_iter()
        .map(|mut f| {
            f.writable = is_writable(&f.path);
            f
        })
        .partition(|f| f.writable);

    debug!(
        "{} writable, {} without write permission",
        writable.len(),
        unwritable.len()
    );

    (writable, unwritable)
}
