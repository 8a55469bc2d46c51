//! Fixture helpers shared by the unit tests

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// A decoded `.qgz` entry as seen by a reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySnapshot {
    pub name: String,
    pub compression: CompressionMethod,
    pub crc32: u32,
    pub compressed_size: u64,
    pub data: Vec<u8>,
}

/// Write a zip with the given `(name, data, method)` entries
pub fn write_qgz(path: &Path, entries: &[(&str, &[u8], CompressionMethod)]) {
    write_qgz_with_comment(path, entries, "");
}

/// Like [`write_qgz`], with an archive-level comment
pub fn write_qgz_with_comment(
    path: &Path,
    entries: &[(&str, &[u8], CompressionMethod)],
    comment: &str,
) {
    let file = File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    zip.set_comment(comment);
    for (name, data, method) in entries {
        let options = SimpleFileOptions::default().compression_method(*method);
        zip.start_file(*name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap();
}

/// A typical QGIS container: project payload plus an auxiliary database
pub fn write_sample_qgz(path: &Path, payload: &str) {
    write_qgz(
        path,
        &[
            ("proj.qgs", payload.as_bytes(), CompressionMethod::Deflated),
            (
                "proj.qgd",
                b"SQLite format 3\0 aux-data /data/old stays".as_slice(),
                CompressionMethod::Stored,
            ),
        ],
    );
}

/// Read every entry of a zip in index order
pub fn read_entries(path: &Path) -> Vec<EntrySnapshot> {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        let mut data = Vec::new();
        entry.read_to_end(&mut data).unwrap();
        entries.push(EntrySnapshot {
            name: entry.name().to_string(),
            compression: entry.compression(),
            crc32: entry.crc32(),
            compressed_size: entry.compressed_size(),
            data,
        });
    }
    entries
}

/// Archive-level comment of a zip
pub fn zip_comment(path: &Path) -> Vec<u8> {
    ZipArchive::new(File::open(path).unwrap())
        .unwrap()
        .comment()
        .to_vec()
}

/// Names of every file in `dir` (not recursive), sorted
pub fn dir_listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
