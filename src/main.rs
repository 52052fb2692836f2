//! Binary entry point that glues the JSON-backed library store to the TUI:
//! prepare the data directory and logging, load the catalog, and drive the
//! Ratatui event loop until the user exits.
use personal_library_manager::{
    ensure_data_dir, library_path, log_path, logging, run_app, App, LibraryStore, FAREWELL,
};

/// Only terminal setup problems are fatal. Storage trouble is shown inside the
/// UI, and a missing log file just means running without diagnostics.
fn main() -> anyhow::Result<()> {
    match ensure_data_dir() {
        Ok(_) => {
            if let Err(err) = logging::init(&log_path()) {
                eprintln!("logging disabled: {err:#}");
            }
        }
        Err(err) => eprintln!("{err:#}"),
    }

    let (store, load_warning) = LibraryStore::load(library_path());
    let mut app = App::new(store, load_warning);
    run_app(&mut app)?;

    println!("{FAREWELL}");
    Ok(())
}
