use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, error};

use crate::archive::{self, ArchiveError};
use crate::locator::HIDDEN_MARKER;
use crate::timestamps::TimestampSnapshot;
use crate::transform::{Rewrite, rebuild};

#[derive(Error, Debug)]
pub enum CommitError {
    #[error("Failed to create temporary file in {}: {source}", .dir.display())]
    Stage {
        dir: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write replacement for {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to rebuild project archive for {}: {source}", .path.display())]
    Container {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("Failed to move replacement into {}: {source}", .path.display())]
    Install {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(
        "Failed to move replacement into {}: {source}; archive {} could not be undone",
        .path.display(),
        .archive.display()
    )]
    RollbackFailed {
        path: PathBuf,
        archive: PathBuf,
        source: std::io::Error,
    },
}

/// Fully written replacement waiting next to its original
///
/// Dropping it without installing removes the temporary file.
#[derive(Debug)]
pub struct StagedFile {
    temp: NamedTempFile,
    target: PathBuf,
}

/// Result of installing a staged replacement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installed {
    pub archive: Option<PathBuf>,
    pub warnings: Vec<String>,
}

/// Write the new content into a hidden temporary sibling of `original`
///
/// The original is only read (for its permissions); on any failure it is
/// left exactly as it was and the temporary file is removed.
pub fn stage(original: &Path, rewrite: &Rewrite) -> Result<StagedFile, CommitError> {
    let dir = match original.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let suffix = original
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let mut temp = tempfile::Builder::new()
        .prefix(&format!("{}qfar-", HIDDEN_MARKER))
        .suffix(&suffix)
        .tempfile_in(dir)
        .map_err(|source| CommitError::Stage {
            dir: dir.to_path_buf(),
            source,
        })?;

    let write_err = |source: std::io::Error| CommitError::Write {
        path: original.to_path_buf(),
        source,
    };

    match rewrite {
        Rewrite::Plain { content } => {
            temp.write_all(content).map_err(write_err)?;
        }
        Rewrite::Container {
            source,
            payload_index,
            payload,
        } => {
            rebuild(source, *payload_index, payload, temp.as_file_mut()).map_err(|source| {
                CommitError::Container {
                    path: original.to_path_buf(),
                    source,
                }
            })?;
        }
    }

    temp.as_file().sync_all().map_err(write_err)?;

    let permissions = fs::metadata(original).map_err(write_err)?.permissions();
    fs::set_permissions(temp.path(), permissions).map_err(write_err)?;

    debug!(
        "Staged replacement for {} at {}",
        original.display(),
        temp.path().display()
    );

    Ok(StagedFile {
        temp,
        target: original.to_path_buf(),
    })
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Retire the original and move the replacement into its place
    ///
    /// Without an archive snapshot this is one atomic rename over the
    /// original. With one, the original first gets a hidden archive name,
    /// then the replacement is renamed over the original path; if that
    /// fails the archive is undone.
    pub fn install(self, archive_with: Option<&TimestampSnapshot>) -> Result<Installed, CommitError> {
        self.install_with(archive_with, |temp, target| {
            temp.persist(target).map(drop).map_err(|e| e.error)
        })
    }

    fn install_with<F>(
        self,
        archive_with: Option<&TimestampSnapshot>,
        replace: F,
    ) -> Result<Installed, CommitError>
    where
        F: FnOnce(NamedTempFile, &Path) -> std::io::Result<()>,
    {
        let StagedFile { temp, target } = self;

        let Some(snapshot) = archive_with else {
            replace(temp, &target).map_err(|source| CommitError::Install {
                path: target.clone(),
                source,
            })?;

            return Ok(Installed {
                archive: None,
                warnings: Vec::new(),
            });
        };

        let pending = archive::begin_archive(&target)?;

        if let Err(source) = replace(temp, &target) {
            let archive = pending.path.clone();
            return match pending.abandon() {
                Ok(()) => Err(CommitError::Install {
                    path: target,
                    source,
                }),
                Err(rollback) => {
                    error!("Rollback of {} failed: {}", target.display(), rollback);
                    Err(CommitError::RollbackFailed {
                        path: target,
                        archive,
                        source,
                    })
                }
            };
        }

        let archived = pending.complete(snapshot);

        Ok(Installed {
            archive: Some(archived.path),
            warnings: archived.warnings,
        })
    }
}
