//! Ratatui front-end: a numbered menu, a prompt line for the answers each
//! action needs, and a scrolling pane with everything printed so far.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;

/// Printed to the restored terminal once the shell closes.
pub const FAREWELL: &str = "Library saved to file. Goodbye!";
