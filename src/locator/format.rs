use serde::Serialize;
use std::path::{Path, PathBuf};

/// Extension of the plain-text project format (and of the container payload)
pub const PLAIN_EXTENSION: &str = "qgs";
/// Extension of the zip-packaged project format
pub const CONTAINER_EXTENSION: &str = "qgz";

/// Recognized project file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectFormat {
    /// `.qgs` XML document
    Plain,
    /// `.qgz` zip archive holding a `.qgs` payload
    Container,
}

impl ProjectFormat {
    /// Detect the format from a path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())?;

        match ext.as_str() {
            PLAIN_EXTENSION => Some(Self::Plain),
            CONTAINER_EXTENSION => Some(Self::Container),
            _ => None,
        }
    }
}

/// A discovered project file; the format is fixed at discovery time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFile {
    pub path: PathBuf,
    pub format: ProjectFormat,
    /// Set by [`crate::access::partition_writable`]; `false` until checked
    pub writable: bool,
}

impl ProjectFile {
    /// Build from a path, or `None` if the extension isn't recognized
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let format = ProjectFormat::from_path(&path)?;
        Some(Self {
            path,
            format,
            writable: false,
        })
    }
}

/// Whether an entry name inside a container is a payload candidate
pub fn is_payload_name(name: &str) -> bool {
    !name.ends_with('/')
        && Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(PLAIN_EXTENSION))
}
