//! Core library surface for the personal library manager.
//!
//! The binary wires these pieces together; tests and other tooling can reuse
//! the store without the terminal UI.
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;

/// Domain types passed between the store and the UI.
pub use models::{Book, InvalidCriteria, SearchField, Statistics};

/// The persistence layer and its data location helpers.
pub use store::{ensure_data_dir, library_path, log_path, LibraryStore, Removal, StoreError};

/// The interactive application entry point and state container.
pub use ui::{run_app, App, FAREWELL};
