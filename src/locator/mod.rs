mod format;

pub use format::{
    CONTAINER_EXTENSION, PLAIN_EXTENSION, ProjectFile, ProjectFormat, is_payload_name,
};

use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Leading marker for hidden names; archives carry it too
pub const HIDDEN_MARKER: char = '.';

/// Names starting with the hidden marker are never candidates
pub fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with(HIDDEN_MARKER))
}

/// Find project files under `root`
///
/// Only direct children are visited unless `recursive` is set. Hidden
/// entries below the root (including archives from earlier runs) are
/// skipped, symlinks are not followed, and walk errors are logged and
/// skipped. The result is sorted by path.
pub fn locate(root: &Path, recursive: bool) -> Vec<ProjectFile> {
    info!("Scanning {} (recursive: {})", root.display(), recursive);

    let mut walker = WalkDir::new(root).follow_links(false).min_depth(1);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();

    for entry in walker.into_iter().filter_entry(|e| !is_hidden(e)) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if let Some(file) = ProjectFile::from_path(entry.path()) {
            debug!("Found {:?} file {}", file.format, file.path.display());
            files.push(file);
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));

    info!("Found {} QGIS project file(s)", files.len());
    files
}
