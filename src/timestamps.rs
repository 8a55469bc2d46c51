use chrono::{DateTime, Utc};
use filetime::FileTime;
use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;
use tracing::debug;

use crate::config::AccessTimePolicy;

/// File times captured before a file is rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampSnapshot {
    /// Birth time, where the platform reports one
    pub created: Option<SystemTime>,
    pub modified: FileTime,
    pub accessed: FileTime,
}

impl TimestampSnapshot {
    /// Read the times of `path` before anything is changed
    pub fn capture(path: &Path, policy: AccessTimePolicy) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;

        let accessed = match policy {
            AccessTimePolicy::CaptureInstant => FileTime::now(),
            AccessTimePolicy::Preserve => FileTime::from_last_access_time(&metadata),
        };

        let snapshot = Self {
            created: metadata.created().ok(),
            modified: FileTime::from_last_modification_time(&metadata),
            accessed,
        };

        debug!(
            "Captured times of {}: modified {}",
            path.display(),
            snapshot
                .modified_utc()
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "unknown".to_string())
        );

        Ok(snapshot)
    }

    /// Stamp the captured times onto `path`
    ///
    /// Modification and access times must succeed; creation time is best
    /// effort and only applied where the platform can set it.
    pub fn apply(&self, path: &Path) -> io::Result<()> {
        filetime::set_file_times(path, self.accessed, self.modified)?;
        apply_created(path, self.created);
        Ok(())
    }

    pub fn modified_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.modified.unix_seconds(), self.modified.nanoseconds())
    }
}

#[cfg(windows)]
fn apply_created(path: &Path, created: Option<SystemTime>) {
    use std::os::windows::fs::FileTimesExt;

    let Some(created) = created else {
        return;
    };

    let result = fs::OpenOptions::new()
        .write(true)
        .open(path)
        .and_then(|file| file.set_times(fs::FileTimes::new().set_created(created)));

    if let Err(e) = result {
        debug!("Could not restore creation time of {}: {}", path.display(), e);
    }
}

#[cfg(not(windows))]
fn apply_created(_path: &Path, _created: Option<SystemTime>) {}
