use std::path::PathBuf;
use thiserror::Error;

use crate::commit::CommitError;
use crate::transform::TransformError;

/// Why a single file could not be processed; never aborts the run
#[derive(Error, Debug)]
pub enum FileError {
    #[error("Failed to read timestamps of {}: {source}", .path.display())]
    Timestamps {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Commit(#[from] CommitError),
}
