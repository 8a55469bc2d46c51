use std::path::PathBuf;
use thiserror::Error;

/// Input problems caught before any file is touched
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Directory not found: {}", .0.display())]
    MissingRoot(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("\"Find\" input cannot be left blank")]
    EmptyFind,

    #[error("Worker count must be at least 1")]
    NoWorkers,
}
