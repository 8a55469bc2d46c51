use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Failed to reserve archive path {}: {source}", .path.display())]
    Reserve {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to link {} as {}: {source}", .from.display(), .to.display())]
    Link {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to remove archive link {}: {source}", .path.display())]
    Unlink {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("No free archive name for {} (tried {max} suffixes)", .path.display())]
    SuffixExhausted { path: PathBuf, max: u32 },
}
