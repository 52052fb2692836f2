use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{read_books, write_books, StoreError};
use crate::models::{normalize, Book, SearchField, Statistics};

/// Result of a removal request.
#[derive(Debug)]
pub enum Removal {
    /// No title matched; nothing was written.
    NotFound,
    /// `count` records were dropped from memory. `saved` carries the outcome of
    /// the follow-up write.
    Removed {
        count: usize,
        saved: Result<(), StoreError>,
    },
}

/// The in-memory catalog plus the file it mirrors. Every mutation rewrites the
/// whole file, so after a successful call memory and disk hold the same list.
#[derive(Debug)]
pub struct LibraryStore {
    path: PathBuf,
    books: Vec<Book>,
}

impl LibraryStore {
    /// Load the catalog from `path`. This never fails: unreadable or corrupted
    /// files yield an empty library and the problem is handed back alongside
    /// it so the caller can warn the user.
    pub fn load(path: impl Into<PathBuf>) -> (Self, Option<StoreError>) {
        let path = path.into();
        match read_books(&path) {
            Ok(books) => {
                info!(path = %path.display(), count = books.len(), "loaded library");
                (Self { path, books }, None)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "starting with an empty library");
                (Self::empty(path), Some(err))
            }
        }
    }

    /// An empty store bound to `path`. Nothing is written until the first
    /// mutation.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            books: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Overwrite the file with the current list.
    pub fn save(&self) -> Result<(), StoreError> {
        match write_books(&self.path, &self.books) {
            Ok(()) => {
                debug!(path = %self.path.display(), count = self.books.len(), "saved library");
                Ok(())
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to save library");
                Err(err)
            }
        }
    }

    /// Append a book and persist. The book stays in memory even when the save
    /// fails; the error only reports that disk is now behind.
    pub fn add(&mut self, book: Book) -> Result<(), StoreError> {
        info!(title = %book.title, "adding book");
        self.books.push(book);
        self.save()
    }

    /// Drop every book whose trimmed, lower-cased title equals the trimmed,
    /// lower-cased `title`. The file is only rewritten when something matched.
    pub fn remove(&mut self, title: &str) -> Removal {
        let key = normalize(title);
        let before = self.books.len();
        self.books.retain(|book| book.title_key() != key);
        let count = before - self.books.len();

        if count == 0 {
            debug!(title = %title.trim(), "no book to remove");
            return Removal::NotFound;
        }

        info!(title = %title.trim(), count, "removed books");
        Removal::Removed {
            count,
            saved: self.save(),
        }
    }

    /// Lazily yield the books whose `field` contains `term`, ignoring case and
    /// surrounding whitespace. Each call rescans the list in order.
    pub fn search<'a>(
        &'a self,
        field: SearchField,
        term: &str,
    ) -> impl Iterator<Item = &'a Book> + 'a {
        let needle = normalize(term);
        self.books
            .iter()
            .filter(move |book| normalize(field.value_of(book)).contains(&needle))
    }

    /// Every book in insertion order.
    pub fn list_all(&self) -> std::slice::Iter<'_, Book> {
        self.books.iter()
    }

    pub fn statistics(&self) -> Statistics {
        Statistics {
            total: self.books.len(),
            read: self.books.iter().filter(|book| book.read_status).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> LibraryStore {
        LibraryStore::empty(dir.path().join("library.json"))
    }

    fn on_disk(store: &LibraryStore) -> Vec<Book> {
        read_books(store.path()).unwrap()
    }

    #[test]
    fn add_appends_and_persists() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store
            .add(Book::new("Dune", "Frank Herbert", "1965", "Sci-Fi", true))
            .unwrap();
        store.add(Book::new("", "", "", "", false)).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.books()[1], Book::default());
        assert_eq!(on_disk(&store), store.books());
    }

    #[test]
    fn add_keeps_book_in_memory_when_save_fails() {
        let dir = TempDir::new().unwrap();
        let mut store = LibraryStore::empty(dir.path().join("missing").join("library.json"));
        let err = store
            .add(Book::new("Dune", "Frank Herbert", "1965", "Sci-Fi", true))
            .unwrap_err();

        assert!(matches!(err, StoreError::Write { .. }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_drops_every_case_and_whitespace_variant() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.add(Book::new("Dune", "A", "", "", false)).unwrap();
        store.add(Book::new("Emma", "B", "", "", false)).unwrap();
        store.add(Book::new("  DUNE ", "C", "", "", true)).unwrap();

        match store.remove(" dune") {
            Removal::Removed { count, saved } => {
                assert_eq!(count, 2);
                assert!(saved.is_ok());
            }
            Removal::NotFound => panic!("expected a removal"),
        }
        assert_eq!(store.len(), 1);
        assert_eq!(store.books()[0].title, "Emma");
        assert_eq!(on_disk(&store), store.books());
    }

    #[test]
    fn remove_is_exact_not_substring() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.add(Book::new("Dune Messiah", "", "", "", false)).unwrap();
        assert!(matches!(store.remove("Dune"), Removal::NotFound));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_of_absent_title_does_not_write() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        assert!(matches!(store.remove("Dune"), Removal::NotFound));
        assert!(!store.path().exists());
    }

    #[test]
    fn search_matches_substrings_case_insensitively() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store
            .add(Book::new("The Hobbit", "J.R.R. Tolkien", "1937", "Fantasy", false))
            .unwrap();
        store
            .add(Book::new("Dune", "Frank Herbert", "1965", "Sci-Fi", true))
            .unwrap();

        let titles = |field: SearchField, term: &str| -> Vec<String> {
            store
                .search(field, term)
                .map(|book| book.title.clone())
                .collect()
        };

        assert_eq!(titles(SearchField::Title, "Hobbit"), vec!["The Hobbit"]);
        assert_eq!(titles(SearchField::Title, " hobbit "), vec!["The Hobbit"]);
        assert_eq!(titles(SearchField::Author, "herbert"), vec!["Dune"]);
        assert!(titles(SearchField::Author, "hobbit").is_empty());
        // An empty term matches everything, in order.
        assert_eq!(titles(SearchField::Title, ""), vec!["The Hobbit", "Dune"]);
    }

    #[test]
    fn read_only_operations_are_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.add(Book::new("Dune", "Frank Herbert", "1965", "Sci-Fi", true)).unwrap();

        let first: Vec<_> = store.list_all().cloned().collect();
        let second: Vec<_> = store.list_all().cloned().collect();
        assert_eq!(first, second);
        assert_eq!(store.statistics(), store.statistics());
        assert_eq!(
            store.search(SearchField::Title, "dune").count(),
            store.search(SearchField::Title, "dune").count()
        );
    }

    #[test]
    fn statistics_counts_read_books() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        for (idx, read) in [true, false, false, false].into_iter().enumerate() {
            store
                .add(Book::new(format!("Book {idx}"), "", "", "", read))
                .unwrap();
        }

        let stats = store.statistics();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.percentage_label(), "25.00%");
    }

    #[test]
    fn load_recovers_from_corruption_without_touching_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, "[{\"title\": ").unwrap();

        let (store, warning) = LibraryStore::load(&path);
        assert!(store.is_empty());
        assert!(warning.is_some_and(|err| err.is_corruption()));
        assert_eq!(fs::read_to_string(&path).unwrap(), "[{\"title\": ");
    }

    #[test]
    fn load_reads_previous_session() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.add(Book::new("Dune", "Frank Herbert", "1965", "Sci-Fi", true)).unwrap();

        let (reloaded, warning) = LibraryStore::load(store.path());
        assert!(warning.is_none());
        assert_eq!(reloaded.books(), store.books());
    }
}
