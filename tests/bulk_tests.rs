use std::path::{Path, PathBuf};

use aircap::bulk::{bulk_process, extract_file, output_path_for};
use aircap::cleanup::CleanupScope;
use aircap::report::Registry;
use aircap::tools::FieldExtractor;
use aircap::utils::error::ExtractError;
use pretty_assertions::assert_eq;

/// Canned extractor: fixed rows for every capture, failure for any path
/// whose name contains "bad".
struct CannedExtractor;

impl FieldExtractor for CannedExtractor {
    fn header(&self) -> &[&str] {
        &["wlan.sa", "wlan.ssid"]
    }

    fn extract(&self, capture: &Path) -> Result<Vec<Vec<String>>, ExtractError> {
        let name = capture.file_name().unwrap().to_str().unwrap();
        if name.contains("bad") {
            return Err(ExtractError::ToolFailed {
                status: 2,
                stderr: "malformed capture".to_string(),
            });
        }
        Ok(vec![
            vec!["aa:bb".to_string(), "net1".to_string()],
            vec![String::new(), String::new()],
            vec!["aa:bb".to_string(), "net1".to_string()],
            vec!["cc:dd".to_string(), "net2".to_string()],
        ])
    }
}

fn touch(path: &PathBuf) {
    std::fs::write(path, b"capture bytes").unwrap();
}

#[test]
fn test_extract_file_writes_header_and_dedup_body() {
    let dir = tempfile::tempdir().unwrap();
    let capture = dir.path().join("run1.pcap");
    touch(&capture);

    let registry = Registry::with_defaults();
    let scope = CleanupScope::new();
    let output = extract_file(&capture, &CannedExtractor, &registry, &scope, dir.path()).unwrap();

    assert_eq!(output, output_path_for(&capture));
    let body = std::fs::read_to_string(&output).unwrap();
    // Header once, empty row dropped, duplicate collapsed, order preserved.
    assert_eq!(body, "wlan.sa\twlan.ssid\naa:bb\tnet1\ncc:dd\tnet2\n");
    // The staging artifact must not survive a successful run.
    assert_eq!(scope.pending(), 0);
}

#[test]
fn test_extract_file_is_idempotent_over_its_own_output() {
    let dir = tempfile::tempdir().unwrap();
    let capture = dir.path().join("run2.pcap");
    touch(&capture);

    let registry = Registry::with_defaults();
    let scope = CleanupScope::new();

    let output = extract_file(&capture, &CannedExtractor, &registry, &scope, dir.path()).unwrap();
    let first = std::fs::read(&output).unwrap();
    extract_file(&capture, &CannedExtractor, &registry, &scope, dir.path()).unwrap();
    let second = std::fs::read(&output).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_bulk_processes_matching_files_and_skips_failures() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("nested")).unwrap();

    // N = 3 matching (one of which fails), M = 2 non-matching.
    touch(&dir.path().join("a.pcap"));
    touch(&dir.path().join("nested/b.pcapng"));
    touch(&dir.path().join("bad.pcap"));
    touch(&dir.path().join("notes.txt"));
    touch(&dir.path().join("README.md"));

    let registry = Registry::with_defaults();
    let scope = CleanupScope::new();
    let outcome = bulk_process(dir.path(), &CannedExtractor, &registry, &scope, dir.path()).unwrap();

    assert_eq!(outcome.processed, 2);
    assert_eq!(outcome.failed, 1);

    assert!(output_path_for(&dir.path().join("a.pcap")).exists());
    assert!(output_path_for(&dir.path().join("nested/b.pcapng")).exists());
    assert!(!output_path_for(&dir.path().join("bad.pcap")).exists());
    assert!(!output_path_for(&dir.path().join("notes.txt")).exists());
}

#[test]
fn test_failed_extraction_leaves_no_transient_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let capture = dir.path().join("bad.pcap");
    touch(&capture);

    let registry = Registry::with_defaults();
    {
        let scope = CleanupScope::new();
        let result = extract_file(&capture, &CannedExtractor, &registry, &scope, dir.path());
        assert!(result.is_err());
    }

    // Only the capture itself remains in the work dir.
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name())
        .collect();
    assert_eq!(leftovers, vec![std::ffi::OsString::from("bad.pcap")]);
}
