use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse project archive {}: {source}", .path.display())]
    Container {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    #[error("Failed to read payload {entry} in {}: {source}", .path.display())]
    Payload {
        path: PathBuf,
        entry: String,
        source: std::io::Error,
    },

    #[error("No .qgs payload found in {}", .0.display())]
    MissingPayload(PathBuf),
}
