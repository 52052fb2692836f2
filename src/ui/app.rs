use std::cmp::min;
use std::mem;

use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use tracing::{debug, info};

use crate::models::{Book, SearchField};
use crate::store::{LibraryStore, Removal, StoreError};

use super::forms::{LineInput, PromptSequence, Request, Step, Submission};
use super::helpers::{key_style, surface_error};

/// Menu entries, numbered the way the user selects them.
const MENU_ITEMS: [&str; 6] = [
    "1. Add a book",
    "2. Remove a book",
    "3. Search for a book",
    "4. Display all books",
    "5. Display statistics",
    "6. Exit",
];
const WELCOME: &str = "Welcome to your Personal Library Manager!";
const CHOICE_PROMPT: &str = "Enter your choice";
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
const INPUT_HEIGHT: u16 = 3;
const MENU_WIDTH: u16 = 45;
/// Oldest output lines are dropped past this many.
const OUTPUT_HISTORY: usize = 1000;
const SCROLL_STEP: usize = 5;

/// Either waiting for a menu choice or collecting answers for a request.
enum Mode {
    Menu(LineInput),
    Prompting(PromptSequence),
}

/// Severity of an output line or status message.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum MessageKind {
    Plain,
    Info,
    Warning,
    Error,
}

impl MessageKind {
    fn style(&self) -> Style {
        match self {
            MessageKind::Plain => Style::default(),
            MessageKind::Info => Style::default().fg(Color::Green),
            MessageKind::Warning => Style::default().fg(Color::Yellow),
            MessageKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// One line of the scrolling output pane.
struct OutputLine {
    text: String,
    kind: MessageKind,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: MessageKind,
}

/// Application state for the menu-driven shell. The store is the only
/// persistent piece; everything else here is presentation.
pub struct App {
    store: LibraryStore,
    mode: Mode,
    /// Transcript of prompts, answers and results, newest last.
    output: Vec<OutputLine>,
    /// How many lines the output pane is scrolled up from the bottom.
    scroll: usize,
    status: Option<StatusMessage>,
}

impl App {
    /// Wrap a loaded store. A problem reported by `LibraryStore::load` is shown
    /// straight away so the user knows why the library is empty.
    pub fn new(store: LibraryStore, load_warning: Option<StoreError>) -> Self {
        let mut app = Self {
            store,
            mode: Mode::Menu(LineInput::default()),
            output: Vec::new(),
            scroll: 0,
            status: None,
        };
        if let Some(err) = load_warning {
            app.report_load_problem(&err);
        }
        app
    }

    pub fn store(&self) -> &LibraryStore {
        &self.store
    }

    /// Top-level key dispatcher. Scrolling works in every mode; everything
    /// else goes through the active `Mode`, which returns the next mode. The
    /// result tells the outer loop whether the user chose to exit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::PageUp => {
                self.scroll = min(self.scroll + SCROLL_STEP, self.output.len());
                return false;
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_sub(SCROLL_STEP);
                return false;
            }
            _ => {}
        }

        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Menu(LineInput::default()));
        self.mode = match mode {
            Mode::Menu(input) => self.handle_menu_key(code, input, &mut exit),
            Mode::Prompting(sequence) => self.handle_prompt_key(code, sequence),
        };
        exit
    }

    fn handle_menu_key(&mut self, code: KeyCode, mut input: LineInput, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Enter => {
                let choice = input.take();
                self.echo(CHOICE_PROMPT, &choice);
                return self.dispatch_choice(choice.trim(), exit);
            }
            KeyCode::Esc => input.clear(),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Home => self.scroll = self.output.len(),
            KeyCode::End => self.scroll = 0,
            KeyCode::Char(ch) => {
                input.push_char(ch);
            }
            _ => {}
        }
        Mode::Menu(input)
    }

    fn dispatch_choice(&mut self, choice: &str, exit: &mut bool) -> Mode {
        debug!(choice, "menu choice");
        self.clear_status();
        self.scroll = 0;

        match choice {
            "1" => return Mode::Prompting(PromptSequence::new(Request::AddBook)),
            "2" => return Mode::Prompting(PromptSequence::new(Request::RemoveBook)),
            "3" => return Mode::Prompting(PromptSequence::new(Request::Search)),
            "4" => self.display_all_books(),
            "5" => self.display_statistics(),
            "6" => {
                info!("exit requested");
                *exit = true;
            }
            _ => self.report(
                "Invalid choice. Please enter a number between 1 and 6.",
                MessageKind::Error,
            ),
        }
        Mode::Menu(LineInput::default())
    }

    /// Keys while a request is collecting answers. Enter confirms the current
    /// prompt, Esc abandons the whole request without touching the library.
    fn handle_prompt_key(&mut self, code: KeyCode, mut sequence: PromptSequence) -> Mode {
        match code {
            KeyCode::Esc => {
                self.report(
                    format!("{} cancelled.", sequence.request.label()),
                    MessageKind::Info,
                );
                return Mode::Menu(LineInput::default());
            }
            KeyCode::Backspace => sequence.input.backspace(),
            KeyCode::Enter => {
                self.echo(&sequence.prompt(), sequence.input.value());
                match sequence.submit() {
                    Step::Continue => {}
                    Step::Complete(submission) => {
                        self.complete(submission);
                        return Mode::Menu(LineInput::default());
                    }
                    Step::Rejected(err) => {
                        debug!(error = %err, "search rejected");
                        self.report(
                            "Invalid search criteria. Please choose 'title' or 'author'.",
                            MessageKind::Error,
                        );
                        return Mode::Menu(LineInput::default());
                    }
                }
            }
            KeyCode::Char(ch) => {
                sequence.input.push_char(ch);
            }
            _ => {}
        }
        Mode::Prompting(sequence)
    }

    fn complete(&mut self, submission: Submission) {
        match submission {
            Submission::AddBook(book) => self.add_book(book),
            Submission::RemoveBook { title } => self.remove_book(&title),
            Submission::Search { field, term } => self.search_library(field, &term),
        }
    }

    fn add_book(&mut self, book: Book) {
        let title = book.title.clone();
        let message = format!("Book '{title}' added successfully!");
        match self.store.add(book) {
            Ok(()) => self.report(message, MessageKind::Info),
            Err(err) => {
                // The book is kept in memory, so the add still succeeded.
                self.report_save_failure(&err);
                self.push_output(message, MessageKind::Info);
            }
        }
    }

    fn remove_book(&mut self, title: &str) {
        match self.store.remove(title) {
            Removal::NotFound => {
                self.report(format!("Book '{title}' not found."), MessageKind::Error)
            }
            Removal::Removed { count, saved } => {
                let message = if count == 1 {
                    format!("Book '{title}' removed successfully!")
                } else {
                    format!("Book '{title}' removed successfully! ({count} copies)")
                };
                self.report(message, MessageKind::Info);
                if let Err(err) = saved {
                    self.report_save_failure(&err);
                }
            }
        }
    }

    fn search_library(&mut self, field: SearchField, term: &str) {
        let matches: Vec<String> = self
            .store
            .search(field, term)
            .map(|book| format!("Matching Book: {book}"))
            .collect();

        if matches.is_empty() {
            self.report(
                format!("No matching books found for '{term}' in the {field} field."),
                MessageKind::Warning,
            );
            return;
        }

        let count = matches.len();
        for line in matches {
            self.push_output(line, MessageKind::Plain);
        }
        self.set_status(format!("{count} matching book(s)."), MessageKind::Info);
    }

    fn display_all_books(&mut self) {
        if self.store.is_empty() {
            self.report("The library is empty.", MessageKind::Info);
            return;
        }

        let lines: Vec<String> = self.store.list_all().map(ToString::to_string).collect();
        for line in lines {
            self.push_output(line, MessageKind::Plain);
        }
        self.set_status(
            format!("{} book(s) in the library.", self.store.len()),
            MessageKind::Info,
        );
    }

    fn display_statistics(&mut self) {
        let stats = self.store.statistics();
        self.push_output(format!("Total books: {}", stats.total), MessageKind::Plain);
        self.push_output(
            format!("Percentage read: {}", stats.percentage_label()),
            MessageKind::Plain,
        );
    }

    fn report_load_problem(&mut self, err: &StoreError) {
        let message = if err.is_corruption() {
            format!("Error: {err}. Starting with an empty library.")
        } else {
            format!(
                "An unexpected error occurred while loading the library: {}",
                surface_error(err)
            )
        };
        self.report(message, MessageKind::Warning);
    }

    fn report_save_failure(&mut self, err: &StoreError) {
        self.report(
            format!(
                "An error occurred while saving the library: {}",
                surface_error(err)
            ),
            MessageKind::Error,
        );
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(INPUT_HEIGHT),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(MENU_WIDTH), Constraint::Min(0)])
            .split(chunks[0]);

        self.draw_menu(frame, body[0]);
        self.draw_output(frame, body[1]);
        self.draw_input(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_menu(&self, frame: &mut Frame, area: Rect) {
        let active = match &self.mode {
            Mode::Prompting(sequence) => Some(sequence.request.menu_index()),
            Mode::Menu(_) => None,
        };

        let mut lines = vec![
            Line::from(Span::styled(
                WELCOME,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (idx, item) in MENU_ITEMS.iter().enumerate() {
            let style = if active == Some(idx) {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(*item, style)));
        }

        let block = Block::default().title("Menu").borders(Borders::ALL);
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_output(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!("Library ({} books)", self.store.len()))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let height = inner.height as usize;
        let total = self.output.len();
        let start = total
            .saturating_sub(height)
            .saturating_sub(self.scroll);
        let end = min(start + height, total);

        let lines: Vec<Line> = self.output[start..end]
            .iter()
            .map(|line| Line::from(Span::styled(line.text.clone(), line.kind.style())))
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn draw_input(&self, frame: &mut Frame, area: Rect) {
        let (title, input) = match &self.mode {
            Mode::Menu(input) => (CHOICE_PROMPT.to_string(), input),
            Mode::Prompting(sequence) => (sequence.prompt(), &sequence.input),
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        let line = Line::from(vec![
            Span::styled("> ", key_style()),
            Span::raw(input.value().to_string()),
        ]);
        frame.render_widget(Paragraph::new(line).block(block), area);

        if inner.width > 0 && inner.height > 0 {
            let typed = u16::try_from(input.len()).unwrap_or(u16::MAX);
            let cursor_x = inner
                .x
                .saturating_add(2)
                .saturating_add(typed)
                .min(inner.right().saturating_sub(1));
            frame.set_cursor_position((cursor_x, inner.y));
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = key_style();
        match &self.mode {
            Mode::Menu(_) => Line::from(vec![
                Span::styled("[1-6]", key_style),
                Span::raw(" Choose   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Confirm   "),
                Span::styled("[PgUp/PgDn]", key_style),
                Span::raw(" Scroll   "),
                Span::styled("[Ctrl-C]", key_style),
                Span::raw(" Quit"),
            ]),
            Mode::Prompting(_) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Next   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel   "),
                Span::styled("[PgUp/PgDn]", key_style),
                Span::raw(" Scroll"),
            ]),
        }
    }

    /// Record a prompt and the answer given to it in the output pane.
    fn echo(&mut self, prompt: &str, answer: &str) {
        self.push_output(format!("{prompt}: {answer}"), MessageKind::Plain);
    }

    /// Show a message in the output pane and mirror it in the footer.
    fn report<S: Into<String>>(&mut self, text: S, kind: MessageKind) {
        let text = text.into();
        self.push_output(text.clone(), kind);
        self.set_status(text, kind);
    }

    fn push_output(&mut self, text: String, kind: MessageKind) {
        self.output.push(OutputLine { text, kind });
        if self.output.len() > OUTPUT_HISTORY {
            let overflow = self.output.len() - OUTPUT_HISTORY;
            self.output.drain(..overflow);
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: MessageKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}
