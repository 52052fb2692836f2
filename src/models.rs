//! Domain models shared by the store and the terminal UI. The types stay plain
//! data holders: persistence lives in `store`, presentation in `ui`. Blank
//! fields are kept blank on disk and only replaced by placeholders when a
//! record is formatted for display.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder shown for a blank title or author.
const UNKNOWN: &str = "Unknown";
/// Placeholder shown for a blank publication year.
const UNKNOWN_YEAR: &str = "Unknown Year";
/// Placeholder shown for a blank genre.
const UNKNOWN_GENRE: &str = "Unknown Genre";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// A single catalogued book. The serialized field names are the on-disk keys,
/// so renaming a field here changes the storage format.
pub struct Book {
    /// Free text; doubles as the lookup key for removal.
    pub title: String,
    pub author: String,
    /// Kept as text because users type things like "c. 1600" or leave it empty.
    pub publication_year: String,
    pub genre: String,
    /// `true` once the book has been read.
    pub read_status: bool,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        publication_year: impl Into<String>,
        genre: impl Into<String>,
        read_status: bool,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            publication_year: publication_year.into(),
            genre: genre.into(),
            read_status,
        }
    }

    /// "Read" or "Unread", as shown at the end of every summary line.
    pub fn status_label(&self) -> &'static str {
        if self.read_status {
            "Read"
        } else {
            "Unread"
        }
    }

    /// Normalized title used for removal matching.
    pub(crate) fn title_key(&self) -> String {
        normalize(&self.title)
    }
}

impl fmt::Display for Book {
    /// `<title> by <author> - <year> - <genre> - <Read|Unread>`, the one-line
    /// summary used by listings and search results alike.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} - {} - {} - {}",
            or_placeholder(&self.title, UNKNOWN),
            or_placeholder(&self.author, UNKNOWN),
            or_placeholder(&self.publication_year, UNKNOWN_YEAR),
            or_placeholder(&self.genre, UNKNOWN_GENRE),
            self.status_label()
        )
    }
}

/// Placeholders only stand in for values that are absent; whitespace typed by
/// the user is shown as stored.
fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}

/// Trim and lower-case a value so comparisons ignore case and stray spaces.
pub(crate) fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Book fields that can be searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
}

impl SearchField {
    /// Borrow the value of this field from a book.
    pub fn value_of<'a>(&self, book: &'a Book) -> &'a str {
        match self {
            SearchField::Title => &book.title,
            SearchField::Author => &book.author,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Author => "author",
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when the user asks to search by anything other than title or author.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid search criteria '{0}'")]
pub struct InvalidCriteria(pub String);

impl FromStr for SearchField {
    type Err = InvalidCriteria;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match normalize(raw).as_str() {
            "title" => Ok(SearchField::Title),
            "author" => Ok(SearchField::Author),
            _ => Err(InvalidCriteria(raw.trim().to_string())),
        }
    }
}

/// Summary numbers for the statistics view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    pub total: usize,
    pub read: usize,
}

impl Statistics {
    /// Share of read books in percent. An empty library counts as 0%.
    pub fn percentage_read(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.read as f64 / self.total as f64 * 100.0
        }
    }

    /// Percentage rendered with two decimals, e.g. `25.00%`.
    pub fn percentage_label(&self) -> String {
        format!("{:.2}%", self.percentage_read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_summary_format() {
        let book = Book::new("Dune", "Frank Herbert", "1965", "Sci-Fi", true);
        assert_eq!(book.to_string(), "Dune by Frank Herbert - 1965 - Sci-Fi - Read");
    }

    #[test]
    fn display_substitutes_placeholders_for_empty_fields() {
        let book = Book::new("", "", "", "", false);
        assert_eq!(
            book.to_string(),
            "Unknown by Unknown - Unknown Year - Unknown Genre - Unread"
        );
        // Placeholders never leak into the stored values.
        assert!(book.title.is_empty());
    }

    #[test]
    fn whitespace_only_fields_are_shown_as_stored() {
        let book = Book::new(" ", "Anon", "1999", "Poetry", true);
        assert_eq!(book.to_string(), "  by Anon - 1999 - Poetry - Read");
    }

    #[test]
    fn missing_keys_deserialize_to_blank_fields() {
        let book: Book = serde_json::from_str(r#"{"author": "Tolkien"}"#).unwrap();
        assert_eq!(book.title, "");
        assert_eq!(book.author, "Tolkien");
        assert!(!book.read_status);
    }

    #[test]
    fn search_field_parses_case_insensitively() {
        assert_eq!(" Title ".parse::<SearchField>(), Ok(SearchField::Title));
        assert_eq!("AUTHOR".parse::<SearchField>(), Ok(SearchField::Author));
        assert_eq!(
            "price".parse::<SearchField>(),
            Err(InvalidCriteria("price".to_string()))
        );
    }

    #[test]
    fn statistics_percentage() {
        let stats = Statistics { total: 4, read: 1 };
        assert_eq!(stats.percentage_label(), "25.00%");

        let empty = Statistics { total: 0, read: 0 };
        assert_eq!(empty.percentage_label(), "0.00%");

        let thirds = Statistics { total: 3, read: 1 };
        assert_eq!(thirds.percentage_label(), "33.33%");
    }
}
