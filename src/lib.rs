// Public API exports
pub mod access;
pub mod archive;
pub mod batch;
pub mod commit;
pub mod config;
pub mod locator;
pub mod report;
pub mod timestamps;
pub mod transform;

#[cfg(test)]
mod test_support;

// Re-export main types for convenience
pub use config::{AccessTimePolicy, RewriteConfig, RewriteConfigBuilder, RewriteRequest, ValidationError};

pub use locator::{ProjectFile, ProjectFormat, locate};

pub use transform::{Rewrite, Transformation, TransformError, transform_file};

pub use commit::{CommitError, StagedFile};

pub use archive::{ArchiveError, archive_path};

pub use timestamps::TimestampSnapshot;

pub use batch::{BatchResult, FileError, FileOutcome, UpdatedFile, run};
