use std::fs::File;
use tempfile::tempdir;
use utils_crate::error::UtilsError;
use utils_crate::path::{ensure_dir_exists, require_file};

#[test]
fn test_ensure_dir_exists_creates_nested() -> Result<(), Box<dyn std::error::Error>> {
    let base_dir = tempdir()?;
    let new_dir = base_dir.path().join("data").join("MLP_outcomes");
    assert!(!new_dir.exists());
    ensure_dir_exists(&new_dir)?;
    assert!(new_dir.is_dir());
    Ok(())
}

#[test]
fn test_ensure_dir_exists_existing() -> Result<(), Box<dyn std::error::Error>> {
    let existing = tempdir()?;
    ensure_dir_exists(existing.path())?;
    assert!(existing.path().is_dir());
    Ok(())
}

#[test]
fn test_ensure_dir_exists_file_conflict() {
    let base_dir = tempdir().unwrap();
    let file_path = base_dir.path().join("conflict_file");
    File::create(&file_path).unwrap();
    match ensure_dir_exists(&file_path) {
        Err(UtilsError::InvalidParameter(msg)) => {
            assert!(msg.contains("exists but is not a directory"));
        }
        other => panic!("Unexpected result for file conflict: {other:?}"),
    }
}

#[test]
fn test_require_file_found() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let expected = dir.path().join("voxels.csv");
    File::create(&expected)?;
    assert_eq!(require_file(dir.path(), "voxels.csv")?, expected);
    Ok(())
}

#[test]
fn test_require_file_missing_names_path() {
    let dir = tempdir().unwrap();
    match require_file(dir.path(), "missing.csv") {
        Err(UtilsError::ResourceNotFound(msg)) => assert!(msg.contains("missing.csv")),
        other => panic!("Expected ResourceNotFound, got {other:?}"),
    }
}

#[test]
fn test_require_file_rejects_directory() {
    let dir = tempdir().unwrap();
    std::fs::create_dir(dir.path().join("nested.csv")).unwrap();
    assert!(require_file(dir.path(), "nested.csv").is_err());
}
