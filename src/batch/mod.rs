mod error;
mod result;

pub use error::FileError;
pub use result::{BatchResult, Counts, FailedFile, FileOutcome, SkipReason, SkippedFile, UpdatedFile};

use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::access::partition_writable;
use crate::commit;
use crate::config::{RewriteConfig, ValidationError};
use crate::locator::{ProjectFile, locate};
use crate::timestamps::TimestampSnapshot;
use crate::transform::{Transformation, transform_file};

/// Run the rewrite over every project file under the configured root
///
/// Only validation problems are returned as errors; everything that goes
/// wrong with an individual file is recorded in the result instead.
pub fn run(config: &RewriteConfig) -> Result<BatchResult, ValidationError> {
    config.validate()?;

    let root = std::path::absolute(&config.root).unwrap_or_else(|_| config.root.clone());
    let candidates = locate(&root, config.recursive);
    let (writable, unwritable) = partition_writable(candidates);

    let mut result = BatchResult::new(&root);

    for file in unwritable {
        warn!("Skipping {}: no write permission", file.path.display());
        result.skipped.push(SkippedFile {
            path: file.path,
            reason: SkipReason::NotWritable,
        });
    }

    for (path, outcome) in process_all(&writable, config) {
        match outcome {
            Ok(FileOutcome::Updated(updated)) => result.updated.push(updated),
            Ok(FileOutcome::Unchanged) => result.unchanged.push(path),
            Err(e) => {
                warn!("Failed to process {}: {}", path.display(), e);
                result.failed.push(FailedFile {
                    path,
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        "{} file(s) updated out of {} QGIS project file(s) found ({} unchanged, {} skipped, {} failed)",
        result.updated.len(),
        result.found(),
        result.unchanged.len(),
        result.skipped.len(),
        result.failed.len()
    );

    Ok(result)
}

type Processed = (PathBuf, Result<FileOutcome, FileError>);

/// Process files one by one, or on a pool when more than one job is set
///
/// Output order always follows `files`.
fn process_all(files: &[ProjectFile], config: &RewriteConfig) -> Vec<Processed> {
    let one = |file: &ProjectFile| (file.path.clone(), process_file(file, config));

    if config.jobs <= 1 || files.len() <= 1 {
        return files.iter().map(one).collect();
    }

    match rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs)
        .build()
    {
        Ok(pool) => pool.install(|| files.par_iter().map(one).collect()),
        Err(e) => {
            warn!("Could not start {} workers ({}); running sequentially", config.jobs, e);
            files.iter().map(one).collect()
        }
    }
}

/// Carry one file through capture, transform, commit and timestamp restore
pub fn process_file(file: &ProjectFile, config: &RewriteConfig) -> Result<FileOutcome, FileError> {
    let snapshot = TimestampSnapshot::capture(&file.path, config.atime_policy).map_err(|source| {
        FileError::Timestamps {
            path: file.path.clone(),
            source,
        }
    })?;

    let transformed = match transform_file(file, &config.request)? {
        Transformation::Unchanged => {
            info!("No changes needed: {}", file.path.display());
            return Ok(FileOutcome::Unchanged);
        }
        Transformation::Changed(t) => t,
    };

    let staged = commit::stage(&file.path, &transformed.rewrite)?;
    let installed = staged.install(config.archive.then_some(&snapshot))?;

    let mut warnings = installed.warnings;
    if let Err(e) = snapshot.apply(&file.path) {
        warn!("Could not restore times on {}: {}", file.path.display(), e);
        warnings.push(format!("timestamps not restored: {}", e));
    }

    info!(
        "Updated {} ({} replacement(s))",
        file.path.display(),
        transformed.replacements
    );

    Ok(FileOutcome::Updated(UpdatedFile {
        path: file.path.clone(),
        format: file.format,
        archive: installed.archive,
        replacements: transformed.replacements,
        original_sha256: transformed.original_sha256,
        warnings,
    }))
}
