use super::*;
use crate::test_support::{
    read_entries, write_qgz, write_qgz_with_comment, write_sample_qgz, zip_comment,
};
use std::io::Cursor;
use tempfile::tempdir;
use zip::CompressionMethod;

fn request(find: &str, replace: &str) -> RewriteRequest {
    RewriteRequest::new(find, replace).unwrap()
}

// ========================================================================
// Literal substitution
// ========================================================================

#[test]
fn test_replace_every_occurrence() {
    let result = replace_literal(b"a.b.a.b", b"a", b"x");
    assert_eq!(result.bytes, b"x.b.x.b");
    assert_eq!(result.count, 2);
}

#[test]
fn test_replace_is_non_overlapping() {
    let result = replace_literal(b"aaaa", b"aa", b"b");
    assert_eq!(result.bytes, b"bb");
    assert_eq!(result.count, 2);

    let result = replace_literal(b"aaa", b"aa", b"b");
    assert_eq!(result.bytes, b"ba");
    assert_eq!(result.count, 1);
}

#[test]
fn test_replacement_is_not_rescanned() {
    // The output contains "ab" again but must not be replaced a second time.
    let result = replace_literal(b"ab", b"ab", b"aab");
    assert_eq!(result.bytes, b"aab");
    assert_eq!(result.count, 1);
}

#[test]
fn test_replace_with_empty() {
    let result = replace_literal(b"/data/old/layer.shp", b"/old", b"");
    assert_eq!(result.bytes, b"/data/layer.shp");
}

#[test]
fn test_replace_no_match() {
    let result = replace_literal(b"nothing here", b"zzz", b"y");
    assert_eq!(result.bytes, b"nothing here");
    assert_eq!(result.count, 0);
}

#[test]
fn test_needle_longer_than_haystack() {
    let result = replace_literal(b"ab", b"abc", b"x");
    assert_eq!(result.bytes, b"ab");
    assert_eq!(result.count, 0);
}

#[test]
fn test_empty_needle_is_noop() {
    let result = replace_literal(b"abc", b"", b"x");
    assert_eq!(result.bytes, b"abc");
    assert_eq!(result.count, 0);
}

#[test]
fn test_non_utf8_bytes_survive() {
    let haystack = [0xFF, b'o', b'l', b'd', 0xFE];
    let result = replace_literal(&haystack, b"old", b"new");
    assert_eq!(result.bytes, [0xFF, b'n', b'e', b'w', 0xFE]);
}

// ========================================================================
// Plain files
// ========================================================================

#[test]
fn test_transform_plain_changed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("proj.qgs");
    let content = "<datasource>host=192.168.12.34 dbname=gis</datasource>";
    std::fs::write(&path, content).unwrap();

    let file = ProjectFile::from_path(&path).unwrap();
    let result = transform_file(&file, &request("192.168.12.34", "192.168.56.78")).unwrap();

    let Transformation::Changed(t) = result else {
        panic!("expected a change");
    };
    assert_eq!(t.replacements, 1);
    assert_eq!(t.original_sha256, sha256_hex(content.as_bytes()));
    match t.rewrite {
        Rewrite::Plain { content } => assert_eq!(
            content,
            b"<datasource>host=192.168.56.78 dbname=gis</datasource>"
        ),
        other => panic!("unexpected rewrite: {:?}", other),
    }
}

#[test]
fn test_transform_plain_unchanged() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("proj.qgs");
    std::fs::write(&path, "<qgis/>").unwrap();

    let file = ProjectFile::from_path(&path).unwrap();
    let result = transform_file(&file, &request("absent", "x")).unwrap();
    assert!(!result.is_changed());
}

#[test]
fn test_transform_identity_rewrite_is_unchanged() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("proj.qgs");
    std::fs::write(&path, "same same").unwrap();

    let file = ProjectFile::from_path(&path).unwrap();
    let result = transform_file(&file, &request("same", "same")).unwrap();
    assert!(!result.is_changed());
}

#[test]
fn test_transform_missing_file() {
    let dir = tempdir().unwrap();
    let file = ProjectFile::from_path(dir.path().join("gone.qgs")).unwrap();

    let err = transform_file(&file, &request("a", "b")).unwrap_err();
    assert!(matches!(err, TransformError::Read { .. }));
}

// ========================================================================
// Containers
// ========================================================================

#[test]
fn test_transform_container_payload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("proj.qgz");
    write_sample_qgz(&path, "<layer source=\"/data/old/roads.shp\"/>");

    let file = ProjectFile::from_path(&path).unwrap();
    let result = transform_file(&file, &request("/data/old", "/data/new")).unwrap();

    let Transformation::Changed(t) = result else {
        panic!("expected a change");
    };
    assert_eq!(t.replacements, 1);
    match t.rewrite {
        Rewrite::Container {
            payload_index,
            payload,
            source,
        } => {
            assert_eq!(payload_index, 0);
            assert_eq!(payload, b"<layer source=\"/data/new/roads.shp\"/>");
            assert_eq!(source, std::fs::read(&path).unwrap());
        }
        other => panic!("unexpected rewrite: {:?}", other),
    }
}

#[test]
fn test_transform_container_ignores_aux_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("proj.qgz");
    // Only the auxiliary entry mentions the search string.
    write_sample_qgz(&path, "<qgis/>");

    let file = ProjectFile::from_path(&path).unwrap();
    let result = transform_file(&file, &request("/data/old", "/data/new")).unwrap();
    assert!(!result.is_changed());
}

#[test]
fn test_transform_container_without_payload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("proj.qgz");
    write_qgz(
        &path,
        &[("readme.txt", b"/data/old".as_slice(), CompressionMethod::Stored)],
    );

    let file = ProjectFile::from_path(&path).unwrap();
    let err = transform_file(&file, &request("/data/old", "/data/new")).unwrap_err();
    assert!(matches!(err, TransformError::MissingPayload(_)));
    assert!(err.to_string().contains("No .qgs payload"));
}

#[test]
fn test_transform_corrupt_container() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("proj.qgz");
    std::fs::write(&path, b"definitely not a zip").unwrap();

    let file = ProjectFile::from_path(&path).unwrap();
    let err = transform_file(&file, &request("a", "b")).unwrap_err();
    assert!(matches!(err, TransformError::Container { .. }));
}

#[test]
fn test_last_payload_entry_wins() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("proj.qgz");
    write_qgz(
        &path,
        &[
            ("first.qgs", b"old".as_slice(), CompressionMethod::Deflated),
            ("aux.qgd", b"old".as_slice(), CompressionMethod::Stored),
            ("second.qgs", b"old old".as_slice(), CompressionMethod::Deflated),
        ],
    );

    let source = std::fs::read(&path).unwrap();
    let payload = read_payload(&path, &source).unwrap();
    assert_eq!(payload.index, 2);
    assert_eq!(payload.name, "second.qgs");
    assert_eq!(payload.bytes, b"old old");
}

#[test]
fn test_rebuild_copies_other_entries_verbatim() {
    let dir = tempdir().unwrap();
    let src_path = dir.path().join("src.qgz");
    write_qgz(
        &src_path,
        &[
            ("styles/a.qml", b"<qml>old</qml>".as_slice(), CompressionMethod::Deflated),
            ("proj.qgs", b"<qgis>old</qgis>".as_slice(), CompressionMethod::Stored),
            ("proj.qgd", b"binary\x00old".as_slice(), CompressionMethod::Stored),
        ],
    );
    let source = std::fs::read(&src_path).unwrap();

    let out = rebuild(&source, 1, b"<qgis>new</qgis>", Cursor::new(Vec::new())).unwrap();
    let out_path = dir.path().join("out.qgz");
    std::fs::write(&out_path, out.into_inner()).unwrap();

    let before = read_entries(&src_path);
    let after = read_entries(&out_path);
    assert_eq!(after.len(), 3);

    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[2]);

    assert_eq!(after[1].name, "proj.qgs");
    assert_eq!(after[1].compression, CompressionMethod::Stored);
    assert_eq!(after[1].data, b"<qgis>new</qgis>");
}

#[test]
fn test_rebuild_keeps_archive_comment() {
    let dir = tempdir().unwrap();
    let src_path = dir.path().join("src.qgz");
    write_qgz_with_comment(
        &src_path,
        &[("proj.qgs", b"<qgis>old</qgis>".as_slice(), CompressionMethod::Deflated)],
        "keep me",
    );
    let source = std::fs::read(&src_path).unwrap();

    let out = rebuild(&source, 0, b"<qgis>new</qgis>", Cursor::new(Vec::new())).unwrap();
    let out_path = dir.path().join("out.qgz");
    std::fs::write(&out_path, out.into_inner()).unwrap();

    assert_eq!(zip_comment(&out_path), b"keep me");
}
