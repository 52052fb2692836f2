use std::error::Error;

use ratatui::style::{Color, Modifier, Style};

/// Extract the most relevant message from a chained error: the innermost
/// cause usually says what actually went wrong (for example the OS error).
pub(crate) fn surface_error(err: &(dyn Error + 'static)) -> String {
    let mut cause = err;
    while let Some(next) = cause.source() {
        cause = next;
    }
    cause.to_string()
}

/// Style used for key hints in the footer and the input marker.
pub(crate) fn key_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}
