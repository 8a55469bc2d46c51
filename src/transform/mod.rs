mod container;
mod error;
mod replace;

pub use container::{Payload, read_payload, rebuild};
pub use error::TransformError;
pub use replace::{Replaced, replace_literal};

use sha2::{Digest, Sha256};
use std::fs;
use tracing::debug;

use crate::config::RewriteRequest;
use crate::locator::{ProjectFile, ProjectFormat};

/// New content ready to be committed
#[derive(Debug)]
pub enum Rewrite {
    /// Full replacement text for a `.qgs`
    Plain { content: Vec<u8> },
    /// Original `.qgz` bytes plus the rewritten payload entry
    Container {
        source: Vec<u8>,
        payload_index: usize,
        payload: Vec<u8>,
    },
}

/// A file whose content differs after substitution
#[derive(Debug)]
pub struct Transformed {
    pub rewrite: Rewrite,
    pub replacements: usize,
    /// SHA-256 of the file as it was read
    pub original_sha256: String,
}

#[derive(Debug)]
pub enum Transformation {
    Unchanged,
    Changed(Transformed),
}

impl Transformation {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed(_))
    }
}

/// Apply the rewrite to one file in memory; nothing is written
pub fn transform_file(
    file: &ProjectFile,
    request: &RewriteRequest,
) -> Result<Transformation, TransformError> {
    let original = fs::read(&file.path).map_err(|source| TransformError::Read {
        path: file.path.clone(),
        source,
    })?;

    let find = request.find().as_bytes();
    let replace = request.replace().as_bytes();

    match file.format {
        ProjectFormat::Plain => {
            let replaced = replace_literal(&original, find, replace);
            if replaced.bytes == original {
                return Ok(Transformation::Unchanged);
            }

            Ok(Transformation::Changed(Transformed {
                original_sha256: sha256_hex(&original),
                replacements: replaced.count,
                rewrite: Rewrite::Plain {
                    content: replaced.bytes,
                },
            }))
        }
        ProjectFormat::Container => {
            let payload = read_payload(&file.path, &original)?;
            debug!("Payload of {} is {}", file.path.display(), payload.name);

            let replaced = replace_literal(&payload.bytes, find, replace);
            if replaced.bytes == payload.bytes {
                return Ok(Transformation::Unchanged);
            }

            Ok(Transformation::Changed(Transformed {
                original_sha256: sha256_hex(&original),
                replacements: replaced.count,
                rewrite: Rewrite::Container {
                    source: original,
                    payload_index: payload.index,
                    payload: replaced.bytes,
                },
            }))
        }
    }
}

/// Hex SHA-256 of a byte slice
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests;
