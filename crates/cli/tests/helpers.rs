use std::collections::BTreeMap;
use std::path::Path;

use extract_vmlinux::{canonicalize_or_current, read_input, sha256_bytes, write_outputs};
use tempfile::tempdir;

#[test]
fn canonicalize_or_current_resolves_existing_relative_path() {
    let original = std::env::current_dir().expect("cwd");
    let tmp = tempdir().expect("tempdir");
    std::fs::write(tmp.path().join("image.bin"), b"blob").expect("write image");
    std::env::set_current_dir(tmp.path()).expect("chdir tmp");

    let result = canonicalize_or_current("image.bin").expect("canonicalize image");
    let expected = tmp.path().join("image.bin").canonicalize().expect("canonicalize expected");
    std::env::set_current_dir(original).expect("restore cwd");
    assert_eq!(result, expected);
}

#[test]
fn canonicalize_or_current_keeps_missing_absolute_path() {
    let tmp = tempdir().expect("tempdir");
    let missing = tmp.path().join("missing.bin");
    let result = canonicalize_or_current(missing.to_str().unwrap()).expect("path");
    assert_eq!(result, missing);
}

#[test]
fn read_input_reports_missing_file() {
    let err = read_input(Path::new("/definitely/not/here.bin")).unwrap_err();
    assert!(err.to_string().contains("Failed to read input image"), "unexpected error: {err}");
}

#[test]
fn sha256_bytes_matches_known_hash() {
    let hash = sha256_bytes(b"abc");
    assert_eq!(hash, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
}

#[test]
fn write_outputs_into_directory() {
    let tmp = tempdir().unwrap();
    let out_dir = tmp.path().join("nested").join("out");
    let mut files = BTreeMap::new();
    files.insert("vmlinux_GZIP_5.bin".to_string(), b"Linux kernel/params.c".to_vec());

    let written = write_outputs(&files, Some(&out_dir)).expect("write outputs");
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].name, "vmlinux_GZIP_5.bin");
    assert_eq!(written[0].len, 21);
    assert_eq!(written[0].sha256, sha256_bytes(b"Linux kernel/params.c"));
    let on_disk = std::fs::read(out_dir.join("vmlinux_GZIP_5.bin")).unwrap();
    assert_eq!(on_disk, b"Linux kernel/params.c");
}

#[test]
fn write_outputs_to_temp_files_uses_name_prefix() {
    let mut files = BTreeMap::new();
    files.insert("vmlinux_XZ_0.bin".to_string(), vec![1, 2, 3]);

    let written = write_outputs(&files, None).expect("write temp outputs");
    let path = Path::new(&written[0].path);
    let file_name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("vmlinux_XZ_0.bin"), "unexpected name {file_name}");
    assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3]);
    std::fs::remove_file(path).unwrap();
}
