use crate::models::{Book, InvalidCriteria, SearchField};

/// Single-line text entry used for the menu choice and for every prompt.
#[derive(Default, Clone, Debug)]
pub(crate) struct LineInput {
    value: String,
}

impl LineInput {
    pub(crate) fn value(&self) -> &str {
        &self.value
    }

    /// Append a printable character. Control characters are ignored.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.value.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.value.pop();
    }

    pub(crate) fn clear(&mut self) {
        self.value.clear();
    }

    /// Hand back the typed text and reset the field.
    pub(crate) fn take(&mut self) -> String {
        std::mem::take(&mut self.value)
    }

    /// Character count, used to place the cursor.
    pub(crate) fn len(&self) -> usize {
        self.value.chars().count()
    }
}

/// Menu actions that need answers from the user before they can run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Request {
    AddBook,
    RemoveBook,
    Search,
}

impl Request {
    /// Zero-based position of the action in the menu.
    pub(crate) fn menu_index(&self) -> usize {
        match self {
            Request::AddBook => 0,
            Request::RemoveBook => 1,
            Request::Search => 2,
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Request::AddBook => "Add book",
            Request::RemoveBook => "Remove book",
            Request::Search => "Search",
        }
    }
}

/// Prompts shown while adding a book, in order.
const ADD_PROMPTS: [&str; 5] = [
    "Enter the book title",
    "Enter the author",
    "Enter the publication year",
    "Enter the genre",
    "Have you read this book? (yes/no)",
];

/// A request whose answers have all been collected.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Submission {
    AddBook(Book),
    RemoveBook { title: String },
    Search { field: SearchField, term: String },
}

/// What happened after the user confirmed an answer.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// Another prompt follows.
    Continue,
    Complete(Submission),
    /// The answer made the request impossible; nothing should run.
    Rejected(InvalidCriteria),
}

/// Asks the questions for one request, one prompt at a time. Answers are
/// trimmed before they are stored.
#[derive(Debug)]
pub(crate) struct PromptSequence {
    pub(crate) request: Request,
    pub(crate) input: LineInput,
    answers: Vec<String>,
    field: Option<SearchField>,
}

impl PromptSequence {
    pub(crate) fn new(request: Request) -> Self {
        Self {
            request,
            input: LineInput::default(),
            answers: Vec::new(),
            field: None,
        }
    }

    /// Text of the question currently being asked.
    pub(crate) fn prompt(&self) -> String {
        match self.request {
            Request::AddBook => {
                let idx = self.answers.len().min(ADD_PROMPTS.len() - 1);
                ADD_PROMPTS[idx].to_string()
            }
            Request::RemoveBook => "Enter the title of the book to remove".to_string(),
            Request::Search => match self.field {
                None => "Search by (title/author)".to_string(),
                Some(field) => format!("Enter the {field}"),
            },
        }
    }

    /// Accept the current input as the answer to `prompt()`.
    pub(crate) fn submit(&mut self) -> Step {
        let answer = self.input.take().trim().to_string();

        match self.request {
            Request::AddBook => {
                self.answers.push(answer);
                if self.answers.len() < ADD_PROMPTS.len() {
                    return Step::Continue;
                }
                let mut answers = std::mem::take(&mut self.answers).into_iter();
                let mut next = || answers.next().unwrap_or_default();
                let (title, author, year, genre) = (next(), next(), next(), next());
                let read_status = next().eq_ignore_ascii_case("yes");
                Step::Complete(Submission::AddBook(Book::new(
                    title,
                    author,
                    year,
                    genre,
                    read_status,
                )))
            }
            Request::RemoveBook => Step::Complete(Submission::RemoveBook { title: answer }),
            Request::Search => match self.field {
                None => match answer.parse::<SearchField>() {
                    Ok(field) => {
                        self.field = Some(field);
                        Step::Continue
                    }
                    Err(err) => Step::Rejected(err),
                },
                Some(field) => Step::Complete(Submission::Search {
                    field,
                    term: answer,
                }),
            },
        }
    }
}
