use crate::error::UtilsError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Makes sure a directory exists, creating it (and its parents) if needed.
///
/// # Arguments
/// * `dir_path` - Directory to create or check.
///
/// # Errors
/// Returns `UtilsError::Io` if the directory cannot be created and
/// `UtilsError::InvalidParameter` if the path exists but is not a directory.
pub fn ensure_dir_exists(dir_path: &Path) -> Result<(), UtilsError> {
    if !dir_path.exists() {
        info!("Creating directory: {:?}", dir_path);
        fs::create_dir_all(dir_path)
            .map_err(|e| UtilsError::io_with_path(e, dir_path.to_string_lossy().into_owned()))?;
        debug!("Directory created: {:?}", dir_path);
    } else if !dir_path.is_dir() {
        let err_msg = format!("Path {dir_path:?} exists but is not a directory.");
        error!("{}", err_msg);
        return Err(UtilsError::InvalidParameter(err_msg));
    } else {
        debug!("Directory already exists: {:?}", dir_path);
    }
    Ok(())
}

/// Resolves `file_name` inside `dir` and checks that it is an existing file.
///
/// # Errors
/// Returns `UtilsError::ResourceNotFound` naming the full path when the file
/// is missing or is not a regular file.
pub fn require_file(dir: &Path, file_name: &str) -> Result<PathBuf, UtilsError> {
    let path = dir.join(file_name);
    if path.is_file() {
        debug!("Found input file: {:?}", path);
        Ok(path)
    } else {
        Err(UtilsError::ResourceNotFound(format!(
            "input file {} does not exist",
            path.display()
        )))
    }
}
