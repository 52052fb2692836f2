use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading or writing the library file. None of them are fatal:
/// the store hands them back so the shell can tell the user and carry on.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file exists but does not hold a JSON array of books.
    #[error("{} is corrupted", .path.display())]
    Corrupted {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize the library")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// True when the file was readable but its content could not be parsed.
    pub fn is_corruption(&self) -> bool {
        matches!(self, StoreError::Corrupted { .. })
    }
}
