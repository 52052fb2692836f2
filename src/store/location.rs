use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".personal-library";
/// JSON file holding the whole catalog.
const LIBRARY_FILE_NAME: &str = "library.json";
/// Diagnostics written by the tracing subscriber.
const LOG_FILE_NAME: &str = "library.log";

/// Resolve the application data directory inside the user's home. Without a
/// home directory the current working directory is used instead.
pub fn data_dir() -> PathBuf {
    match BaseDirs::new() {
        Some(base_dirs) => base_dirs.home_dir().join(DATA_DIR_NAME),
        None => PathBuf::from(DATA_DIR_NAME),
    }
}

/// Create the data directory if needed and return it.
pub fn ensure_data_dir() -> Result<PathBuf> {
    let dir = data_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create data directory {}", dir.display()))?;
    Ok(dir)
}

/// Absolute path of the library file.
pub fn library_path() -> PathBuf {
    data_dir().join(LIBRARY_FILE_NAME)
}

/// Absolute path of the log file.
pub fn log_path() -> PathBuf {
    data_dir().join(LOG_FILE_NAME)
}
