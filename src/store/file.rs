use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use super::StoreError;
use crate::models::Book;

/// Indentation used for the on-disk JSON so the file stays hand-editable.
const INDENT: &[u8] = b"    ";

/// Read every book from `path`. A missing file is an empty library rather than
/// an error.
pub fn read_books(path: &Path) -> Result<Vec<Book>, StoreError> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&data).map_err(|source| StoreError::Corrupted {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace the file at `path` with the full book list. The JSON goes to a
/// sibling temp file first and is renamed over the target, so a failed write
/// leaves the previous content in place.
pub fn write_books(path: &Path, books: &[Book]) -> Result<(), StoreError> {
    let data = to_pretty_json(books)?;

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, &data).map_err(|source| StoreError::Write {
        path: temp_path.clone(),
        source,
    })?;

    fs::rename(&temp_path, path).map_err(|source| {
        let _ = fs::remove_file(&temp_path);
        StoreError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn to_pretty_json(books: &[Book]) -> Result<Vec<u8>, StoreError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    books
        .serialize(&mut serializer)
        .map_err(StoreError::Serialize)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Vec<Book> {
        vec![
            Book::new("Dune", "Frank Herbert", "1965", "Sci-Fi", true),
            Book::new("The Hobbit", "J.R.R. Tolkien", "1937", "Fantasy", false),
        ]
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let books = read_books(&dir.path().join("library.json")).unwrap();
        assert!(books.is_empty());
    }

    #[test]
    fn round_trip_preserves_order_and_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        write_books(&path, &sample()).unwrap();
        assert_eq!(read_books(&path).unwrap(), sample());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn writes_indented_array_with_expected_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        write_books(&path, &sample()[..1]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n    {\n        \"title\": \"Dune\""));
        for key in ["author", "publication_year", "genre"] {
            assert!(text.contains(&format!("\"{key}\"")), "missing key {key}");
        }
        assert!(text.contains("\"read_status\": true"));
    }

    #[test]
    fn malformed_content_is_reported_as_corruption() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, "{ not json").unwrap();

        let err = read_books(&path).unwrap_err();
        assert!(err.is_corruption());
        // The broken file is left for the user to inspect.
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn wrong_shape_is_reported_as_corruption() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, r#"{"title": "Dune"}"#).unwrap();
        assert!(read_books(&path).unwrap_err().is_corruption());
    }

    #[test]
    fn unreadable_path_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        // A directory exists but cannot be read as a file.
        let err = read_books(dir.path()).unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent").join("library.json");
        let err = write_books(&path, &sample()).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
    }
}
