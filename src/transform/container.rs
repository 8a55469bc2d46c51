use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use zip::result::ZipResult;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use super::TransformError;
use crate::locator::is_payload_name;

/// The rewritable `.qgs` entry of a `.qgz` archive
#[derive(Debug)]
pub struct Payload {
    pub index: usize,
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Locate and read the payload entry of an in-memory `.qgz`
///
/// When several entries qualify the last one wins.
pub fn read_payload(path: &Path, source: &[u8]) -> Result<Payload, TransformError> {
    let container_err = |source: zip::result::ZipError| TransformError::Container {
        path: path.to_path_buf(),
        source,
    };

    let mut archive = ZipArchive::new(Cursor::new(source)).map_err(container_err)?;

    let mut found = None;
    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i).map_err(container_err)?;
        if !entry.is_dir() && is_payload_name(entry.name()) {
            found = Some((i, entry.name().to_string()));
        }
    }

    let (index, name) = found.ok_or_else(|| TransformError::MissingPayload(path.to_path_buf()))?;

    let mut entry = archive.by_index(index).map_err(container_err)?;
    let mut bytes = Vec::new();
    entry
        .read_to_end(&mut bytes)
        .map_err(|source| TransformError::Payload {
            path: path.to_path_buf(),
            entry: name.clone(),
            source,
        })?;

    Ok(Payload { index, name, bytes })
}

/// Write a copy of `source` into `out` with entry `payload_index` replaced
///
/// Every other entry is raw-copied (compressed bytes and CRC untouched).
/// The new payload keeps the original entry's name, compression method,
/// modification time and Unix mode. The archive comment is carried over.
pub fn rebuild<W: Write + Seek>(
    source: &[u8],
    payload_index: usize,
    payload: &[u8],
    out: W,
) -> ZipResult<W> {
    let mut archive = ZipArchive::new(Cursor::new(source))?;
    let mut writer = ZipWriter::new(out);
    writer.set_raw_comment(archive.comment().into());

    for i in 0..archive.len() {
        if i != payload_index {
            writer.raw_copy_file(archive.by_index_raw(i)?)?;
            continue;
        }

        let entry = archive.by_index_raw(i)?;
        let name = entry.name().to_string();
        let mut options = SimpleFileOptions::default().compression_method(entry.compression());
        if let Some(modified) = entry.last_modified() {
            options = options.last_modified_time(modified);
        }
        if let Some(mode) = entry.unix_mode() {
            options = options.unix_permissions(mode);
        }
        drop(entry);

        writer.start_file(name, options)?;
        writer.write_all(payload)?;
    }

    writer.finish()
}
