use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::locator::ProjectFormat;

/// A file that was rewritten in place
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdatedFile {
    pub path: PathBuf,
    pub format: ProjectFormat,
    /// Hidden copy of the original, when archiving was on
    pub archive: Option<PathBuf>,
    pub replacements: usize,
    /// SHA-256 of the original bytes (matches the archive, if any)
    pub original_sha256: String,
    /// Non-fatal problems after the new content was installed
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotWritable,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotWritable => write!(f, "no write permission"),
        }
    }
}

/// A file excluded before any processing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// A file whose processing failed; the original was left in place
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a single processed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Updated(UpdatedFile),
    Unchanged,
}

/// Size of each classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub found: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Classified results of a whole run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    pub root: PathBuf,
    pub updated: Vec<UpdatedFile>,
    pub unchanged: Vec<PathBuf>,
    pub skipped: Vec<SkippedFile>,
    pub failed: Vec<FailedFile>,
}

impl BatchResult {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Every project file discovered, whatever happened to it
    pub fn found(&self) -> usize {
        self.updated.len() + self.unchanged.len() + self.skipped.len() + self.failed.len()
    }

    pub fn counts(&self) -> Counts {
        Counts {
            found: self.found(),
            updated: self.updated.len(),
            unchanged: self.unchanged.len(),
            skipped: self.skipped.len(),
            failed: self.failed.len(),
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Paths of updated files, in processing order
    pub fn updated_paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.updated.iter().map(|u| &u.path)
    }
}
