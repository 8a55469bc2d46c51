mod error;

pub use error::ValidationError;

use std::path::{Path, PathBuf};

/// What to look for and what to put in its place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRequest {
    find: String,
    replace: String,
}

impl RewriteRequest {
    /// Create a request; `find` must not be empty, `replace` may be
    pub fn new(
        find: impl Into<String>,
        replace: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let find = find.into();
        if find.is_empty() {
            return Err(ValidationError::EmptyFind);
        }

        Ok(Self {
            find,
            replace: replace.into(),
        })
    }

    pub fn find(&self) -> &str {
        &self.find
    }

    pub fn replace(&self) -> &str {
        &self.replace
    }
}

/// How the access time is chosen when a file is rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessTimePolicy {
    /// Stamp the moment the timestamps were captured
    #[default]
    CaptureInstant,
    /// Keep the access time the file had before the run
    Preserve,
}

/// Immutable settings for one run
#[derive(Debug, Clone)]
pub struct RewriteConfig {
    pub root: PathBuf,
    pub recursive: bool,
    pub request: RewriteRequest,
    pub archive: bool,
    pub atime_policy: AccessTimePolicy,
    /// Number of files processed concurrently (1 = sequential)
    pub jobs: usize,
}

impl RewriteConfig {
    /// Start a builder for the given root and rewrite
    pub fn builder(root: impl Into<PathBuf>, request: RewriteRequest) -> RewriteConfigBuilder {
        RewriteConfigBuilder::new(root, request)
    }

    /// Check everything that must hold before the first file is touched
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_root(&self.root)?;

        if self.jobs == 0 {
            return Err(ValidationError::NoWorkers);
        }

        Ok(())
    }
}

fn validate_root(root: &Path) -> Result<(), ValidationError> {
    if !root.exists() {
        return Err(ValidationError::MissingRoot(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ValidationError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Builder for [`RewriteConfig`] with the interactive tool's defaults
pub struct RewriteConfigBuilder {
    config: RewriteConfig,
}

impl RewriteConfigBuilder {
    /// Recursive search and archiving on, one worker
    pub fn new(root: impl Into<PathBuf>, request: RewriteRequest) -> Self {
        Self {
            config: RewriteConfig {
                root: root.into(),
                recursive: true,
                request,
                archive: true,
                atime_policy: AccessTimePolicy::default(),
                jobs: 1,
            },
        }
    }

    /// Search subdirectories
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.config.recursive = recursive;
        self
    }

    /// Keep a hidden copy of each original
    pub fn archive(mut self, archive: bool) -> Self {
        self.config.archive = archive;
        self
    }

    pub fn atime_policy(mut self, policy: AccessTimePolicy) -> Self {
        self.config.atime_policy = policy;
        self
    }

    pub fn jobs(mut self, jobs: usize) -> Self {
        self.config.jobs = jobs;
        self
    }

    pub fn build(self) -> RewriteConfig {
        self.config
    }
}
