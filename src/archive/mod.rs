mod error;
mod hidden;

pub use error::ArchiveError;
pub use hidden::set_hidden;

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::locator::HIDDEN_MARKER;
use crate::timestamps::TimestampSnapshot;

/// Upper bound on the numeric suffix search
pub const MAX_ARCHIVE_SUFFIX: u32 = 100_000;

/// Hidden copy of an original, created at most once per file per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archived {
    pub path: PathBuf,
    /// Non-fatal problems (hidden attribute, timestamps)
    pub warnings: Vec<String>,
}

/// `<dir>/.<stem>_<suffix><ext>` for `original`
pub fn archive_path(original: &Path, suffix: u32) -> PathBuf {
    let dir = original.parent().unwrap_or_else(|| Path::new(""));

    let mut name = OsString::from(HIDDEN_MARKER.to_string());
    if let Some(stem) = original.file_stem() {
        name.push(stem);
    }
    name.push(format!("_{}", suffix));
    if let Some(ext) = original.extension() {
        name.push(".");
        name.push(ext);
    }

    dir.join(name)
}

/// Claim the smallest free archive path for `original`
///
/// The claim is an empty placeholder created with `create_new`, so two
/// workers can never pick the same suffix. Existing archives are never
/// opened for writing.
pub fn reserve_archive_path(original: &Path) -> Result<PathBuf, ArchiveError> {
    for suffix in 0..MAX_ARCHIVE_SUFFIX {
        let candidate = archive_path(original, suffix);

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(_) => return Ok(candidate),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(source) => {
                return Err(ArchiveError::Reserve {
                    path: candidate,
                    source,
                });
            }
        }
    }

    Err(ArchiveError::SuffixExhausted {
        path: original.to_path_buf(),
        max: MAX_ARCHIVE_SUFFIX,
    })
}

/// How an archive took over the original's content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveMethod {
    /// Hard link to the original; the original path is never vacated
    Linked,
    /// Original renamed onto a reserved placeholder
    Moved,
}

/// An archive that exists on disk but is not yet hidden or stamped
///
/// Call [`PendingArchive::complete`] once the replacement is in place, or
/// [`PendingArchive::abandon`] if installing it failed.
#[derive(Debug)]
#[must_use]
pub struct PendingArchive {
    pub path: PathBuf,
    pub method: ArchiveMethod,
    original: PathBuf,
}

/// Give `original` a second name at the smallest free archive path
///
/// A hard link fails with `AlreadyExists` on a taken name, so it doubles as
/// the create-if-absent reservation and the original keeps its path. On
/// filesystems without hard links the original is moved instead.
pub fn begin_archive(original: &Path) -> Result<PendingArchive, ArchiveError> {
    for suffix in 0..MAX_ARCHIVE_SUFFIX {
        let candidate = archive_path(original, suffix);

        match fs::hard_link(original, &candidate) {
            Ok(()) => {
                debug!("Linked {} as {}", original.display(), candidate.display());
                return Ok(PendingArchive {
                    path: candidate,
                    method: ArchiveMethod::Linked,
                    original: original.to_path_buf(),
                });
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) if links_unsupported(&e) => {
                debug!("Hard links unavailable for {}: {}", original.display(), e);
                return move_to_archive(original);
            }
            Err(source) => {
                return Err(ArchiveError::Link {
                    from: original.to_path_buf(),
                    to: candidate,
                    source,
                });
            }
        }
    }

    Err(ArchiveError::SuffixExhausted {
        path: original.to_path_buf(),
        max: MAX_ARCHIVE_SUFFIX,
    })
}

// vfat and some network mounts report EPERM rather than EOPNOTSUPP
fn links_unsupported(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        ErrorKind::Unsupported | ErrorKind::PermissionDenied
    )
}

/// Move `original` onto a reserved placeholder
///
/// Leaves the original path empty until the replacement is installed.
pub fn move_to_archive(original: &Path) -> Result<PendingArchive, ArchiveError> {
    let path = reserve_archive_path(original)?;

    if let Err(source) = fs::rename(original, &path) {
        if let Err(e) = fs::remove_file(&path) {
            warn!("Could not remove placeholder {}: {}", path.display(), e);
        }
        return Err(ArchiveError::Rename {
            from: original.to_path_buf(),
            to: path,
            source,
        });
    }

    Ok(PendingArchive {
        path,
        method: ArchiveMethod::Moved,
        original: original.to_path_buf(),
    })
}

impl PendingArchive {
    /// Hide the archive and restore the original's times on it
    ///
    /// Runs after the replacement is installed, when the archive is the
    /// only name left for the old content.
    pub fn complete(self, snapshot: &TimestampSnapshot) -> Archived {
        let PendingArchive { path, original, .. } = self;
        info!("Archived {} as {}", original.display(), path.display());

        let mut warnings = Vec::new();

        if let Err(e) = set_hidden(&path, true) {
            warn!("Could not hide {}: {}", path.display(), e);
            warnings.push(format!("archive not marked hidden: {}", e));
        }

        if let Err(e) = snapshot.apply(&path) {
            warn!("Could not restore times on {}: {}", path.display(), e);
            warnings.push(format!("archive timestamps not restored: {}", e));
        }

        debug!("Archive {} ready", path.display());
        Archived { path, warnings }
    }

    /// Undo the archive after a failed install
    ///
    /// A link is simply removed. A moved original is renamed back.
    pub fn abandon(self) -> Result<(), ArchiveError> {
        match self.method {
            ArchiveMethod::Linked => {
                fs::remove_file(&self.path).map_err(|source| ArchiveError::Unlink {
                    path: self.path.clone(),
                    source,
                })
            }
            ArchiveMethod::Moved => {
                fs::rename(&self.path, &self.original).map_err(|source| ArchiveError::Rename {
                    from: self.path.clone(),
                    to: self.original.clone(),
                    source,
                })
            }
        }
    }
}
