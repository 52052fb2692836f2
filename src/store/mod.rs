//! Persistence layer split across logical submodules.

mod error;
mod file;
mod library;
mod location;

pub use error::StoreError;
pub use file::{read_books, write_books};
pub use library::{LibraryStore, Removal};
pub use location::{data_dir, ensure_data_dir, library_path, log_path};
