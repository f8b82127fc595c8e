//! Integration test: pack → unpack round-trip on real directory trees
//!
//! Verifies that every file comes back byte-identical at the same relative
//! path under its top-level name, that empty directories reappear, and that
//! colliding top-level names are suffixed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use proptest::prelude::*;
use tempfile::TempDir;

use sealbox_archive::{pack, read_entries, unpack, CapacityGate, PackOptions};
use sealbox_core::{SealError, Selection};

fn write_test_file(dir: &Path, rel: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).expect("create parent");
    std::fs::write(&path, content).expect("write test file");
    path
}

/// Relative path → Some(bytes) for files, None for directories
fn snapshot(root: &Path) -> BTreeMap<String, Option<Vec<u8>>> {
    let mut out = BTreeMap::new();
    for entry in walkdir_like(root) {
        let rel = entry
            .strip_prefix(root)
            .unwrap()
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        if entry.is_dir() {
            out.insert(rel, None);
        } else {
            out.insert(rel, Some(std::fs::read(&entry).unwrap()));
        }
    }
    out
}

fn walkdir_like(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut found = Vec::new();
    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path.clone());
            }
            found.push(path);
        }
    }
    found
}

#[test]
fn roundtrip_directory_tree_with_empty_dirs() {
    let src = TempDir::new().unwrap();
    let root = src.path().join("project");
    write_test_file(&root, "README.md", b"# project\n");
    write_test_file(&root, "src/main.rs", b"fn main() {}\n");
    write_test_file(&root, "src/nested/deep/data.bin", &[0u8, 1, 2, 255, 254]);
    std::fs::create_dir_all(root.join("empty")).unwrap();
    std::fs::create_dir_all(root.join("src/also-empty")).unwrap();

    let packed = pack(&[Selection::resolve(&root).unwrap()], &PackOptions::default()).unwrap();

    let dst = TempDir::new().unwrap();
    unpack(&packed.bytes, dst.path()).unwrap();

    assert_eq!(
        snapshot(&root),
        snapshot(&dst.path().join("project")),
        "unpacked tree must match the source tree"
    );
}

#[test]
fn roundtrip_mixed_selection() {
    let src = TempDir::new().unwrap();
    let file = write_test_file(src.path(), "notes.txt", b"hello");
    let dir = src.path().join("photos");
    write_test_file(&dir, "a.jpg", &[0xFF, 0xD8, 0xFF]);

    let selections = [
        Selection::resolve(&file).unwrap(),
        Selection::resolve(&dir).unwrap(),
    ];
    let packed = pack(&selections, &PackOptions::default()).unwrap();
    assert_eq!(packed.payload_size, 8);

    let dst = TempDir::new().unwrap();
    let report = unpack(&packed.bytes, dst.path()).unwrap();
    assert_eq!(report.files, 2);
    assert_eq!(report.directories, 1);

    assert_eq!(std::fs::read(dst.path().join("notes.txt")).unwrap(), b"hello");
    assert_eq!(
        std::fs::read(dst.path().join("photos/a.jpg")).unwrap(),
        &[0xFF, 0xD8, 0xFF]
    );
}

#[test]
fn colliding_top_level_names_are_suffixed() {
    let src = TempDir::new().unwrap();
    let first = write_test_file(src.path(), "q1/report.txt", b"first quarter");
    let second = write_test_file(src.path(), "q2/report.txt", b"second quarter");

    let packed = pack(
        &[
            Selection::resolve(&first).unwrap(),
            Selection::resolve(&second).unwrap(),
        ],
        &PackOptions::default(),
    )
    .unwrap();

    let entries = read_entries(&packed.bytes).unwrap();
    let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["report.txt", "report (2).txt"]);
    assert_eq!(entries[0].payload.as_deref(), Some(&b"first quarter"[..]));
    assert_eq!(entries[1].payload.as_deref(), Some(&b"second quarter"[..]));
}

#[test]
fn logical_entries_are_reproducible() {
    let src = TempDir::new().unwrap();
    let root = src.path().join("tree");
    for name in ["z.txt", "m/a.txt", "m/b.txt", "a.txt"] {
        write_test_file(&root, name, name.as_bytes());
    }
    let selection = [Selection::resolve(&root).unwrap()];

    let first = read_entries(&pack(&selection, &PackOptions::default()).unwrap().bytes).unwrap();
    let second = read_entries(&pack(&selection, &PackOptions::default()).unwrap().bytes).unwrap();
    assert_eq!(first, second);
}

#[test]
fn size_gate_rejects_before_packing() {
    let src = TempDir::new().unwrap();
    let file = write_test_file(src.path(), "big.bin", &vec![7u8; 2048]);
    let selection = [Selection::resolve(&file).unwrap()];

    let gate = CapacityGate::with_limit(1024);
    let total = sealbox_archive::measure(&selection).unwrap();
    let err = gate.check_fits(total).unwrap_err();

    assert!(matches!(err, SealError::SizeExceeded { total: 2048, max: 1024 }));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn arbitrary_files_roundtrip(
        files in proptest::collection::btree_map("[a-z]{1,8}", proptest::collection::vec(any::<u8>(), 0..512), 1..6),
    ) {
        let src = TempDir::new().unwrap();
        let root = src.path().join("root");
        for (name, data) in &files {
            write_test_file(&root, name, data);
        }

        let packed = pack(&[Selection::resolve(&root).unwrap()], &PackOptions::default()).unwrap();
        let dst = TempDir::new().unwrap();
        unpack(&packed.bytes, dst.path()).unwrap();

        for (name, data) in &files {
            let restored = std::fs::read(dst.path().join("root").join(name)).unwrap();
            prop_assert_eq!(&restored, data);
        }
    }
}
