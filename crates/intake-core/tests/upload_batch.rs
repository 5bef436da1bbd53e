//! Integration test: a batch manifest as the transport would hand it over,
//! run end to end against real spool and destination directories.

use intake_core::limits::FixedCeiling;
use intake_core::policy::{ConfigurationError, PolicyError};
use intake_core::{FileOutcome, UploadBatch, UploadPolicy, Uploader};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn spool(dir: &Path, name: &str, contents: &[u8]) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn parallel_array_manifest_runs_through_the_pipeline() {
    let spool_dir = tempdir().unwrap();
    let dest = tempdir().unwrap();
    fs::write(dest.path().join("photo.jpg"), b"existing").unwrap();
    fs::write(dest.path().join("photo_1.jpg"), b"existing").unwrap();

    let t1 = spool(spool_dir.path(), "phpA", b"jpeg bytes");
    let t2 = spool(spool_dir.path(), "phpB", b"");
    let t3 = spool(spool_dir.path(), "phpC", b"gif bytes");
    let manifest = serde_json::json!({
        "name": ["photo.jpg", "empty.png", "party time.gif", ""],
        "type": ["image/jpeg", "image/png", "image/gif", ""],
        "tmp_name": [t1, t2, t3, ""],
        "error": [0, 0, 0, 4],
        "size": [10, 0, 9, 0],
    });
    let batch: UploadBatch = serde_json::from_value(manifest).unwrap();

    let uploader = Uploader::new(UploadPolicy::new(dest.path()).unwrap());
    let report = uploader.upload(&batch);

    assert_eq!(
        report.messages(),
        [
            "photo.jpg was uploaded, and was renamed photo_2.jpg.",
            "empty.png is empty.",
            "party time.gif was uploaded, and was renamed party_time.gif.",
            "You didn't choose a file.",
        ]
    );
    assert_eq!(report.outcomes.len(), 4);
    assert_eq!(fs::read(dest.path().join("photo_2.jpg")).unwrap(), b"jpeg bytes");
    assert_eq!(fs::read(dest.path().join("party_time.gif")).unwrap(), b"gif bytes");
    assert!(!dest.path().join("empty.png").exists());
    assert!(Path::new(&t2).exists(), "rejected spool files are left for the transport");
}

#[test]
fn allow_all_types_quarantines_executables() {
    let spool_dir = tempdir().unwrap();
    let dest = tempdir().unwrap();
    let mut policy = UploadPolicy::new(dest.path()).unwrap();
    policy.allow_all_types(Some("upload"));
    policy
        .set_max_size_str("1M", &FixedCeiling(2 * 1024 * 1024))
        .unwrap();

    let manifest = serde_json::json!([
        {"name": "script.exe", "type": "application/x-msdownload",
         "tmp_name": spool(spool_dir.path(), "p1", b"MZ"), "size": 2},
        {"name": "install", "type": "text/x-shellscript",
         "tmp_name": spool(spool_dir.path(), "p2", b"#!/bin/sh"), "size": 9},
        {"name": "notes.txt", "type": "text/plain",
         "tmp_name": spool(spool_dir.path(), "p3", b"hi"), "size": 2},
    ]);
    let batch: UploadBatch = serde_json::from_value(manifest).unwrap();
    let report = Uploader::new(policy).upload(&batch);

    assert_eq!(report.stored_count(), 3);
    let stored: Vec<Option<&str>> = report
        .outcomes
        .iter()
        .map(|o| match o {
            FileOutcome::Stored { stored_as, .. } => stored_as.as_deref(),
            other => panic!("expected Stored, got {:?}", other),
        })
        .collect();
    assert_eq!(stored, [Some("script.exe.upload"), Some("install.upload"), None]);
    assert!(dest.path().join("script.exe.upload").exists());
    assert!(!dest.path().join("script.exe").exists());
}

#[test]
fn configuration_failures_are_fatal() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");
    assert!(matches!(
        UploadPolicy::new(&missing),
        Err(ConfigurationError::NotFound(_))
    ));

    let mut policy = UploadPolicy::new(dir.path()).unwrap();
    let err = policy.set_max_size(10_000_000, &FixedCeiling(1024 * 1024)).unwrap_err();
    assert!(matches!(err, PolicyError::ExceedsCeiling { .. }));
    assert_eq!(policy.max_size(), 153_600);
}
