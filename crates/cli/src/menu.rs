//! Numbered text menu driving a [`Catalog`].
//!
//! Every mutating command is followed by a save. End of input behaves like
//! the exit command so the catalog is always written before the process ends.

use std::io::{self, BufRead, Write};

use libris_core::{Book, Catalog, Circulation};

const BANNER: &str = "========== Library Menu ==========";
const RULE: &str = "==================================";

/// A top-level menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddBook,
    IssueBook,
    ReturnBook,
    ViewAll,
    Search,
    Exit,
}

impl MenuChoice {
    const ALL: [MenuChoice; 6] = [
        Self::AddBook,
        Self::IssueBook,
        Self::ReturnBook,
        Self::ViewAll,
        Self::Search,
        Self::Exit,
    ];

    fn number(&self) -> i64 {
        match self {
            Self::AddBook => 1,
            Self::IssueBook => 2,
            Self::ReturnBook => 3,
            Self::ViewAll => 4,
            Self::Search => 5,
            Self::Exit => 6,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::AddBook => "Add Book",
            Self::IssueBook => "Issue Book",
            Self::ReturnBook => "Return Book",
            Self::ViewAll => "View All Books",
            Self::Search => "Search Book",
            Self::Exit => "Exit",
        }
    }
}

/// Why a choice line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceError {
    NotANumber,
    UnknownChoice,
}

/// Parse the text typed at the choice prompt.
pub fn parse_choice(input: &str) -> Result<MenuChoice, ChoiceError> {
    let number: i64 = input.trim().parse().map_err(|_| ChoiceError::NotANumber)?;
    MenuChoice::ALL
        .into_iter()
        .find(|c| c.number() == number)
        .ok_or(ChoiceError::UnknownChoice)
}

/// Whether the session should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Quit,
}

/// Interactive menu over a line-oriented input and an output stream.
pub struct Menu<'a, R, W> {
    catalog: &'a mut Catalog,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(catalog: &'a mut Catalog, input: R, output: W) -> Self {
        Self {
            catalog,
            input,
            output,
        }
    }

    /// Run until the user exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.print_menu()?;
            let Some(line) = self.prompt("Enter choice: ")? else {
                return self.exit();
            };

            let choice = match parse_choice(&line) {
                Ok(choice) => choice,
                Err(ChoiceError::NotANumber) => {
                    writeln!(self.output, "Invalid input. Enter numbers only.\n")?;
                    continue;
                }
                Err(ChoiceError::UnknownChoice) => {
                    writeln!(self.output, "Invalid choice. Try again.")?;
                    continue;
                }
            };
            tracing::debug!("Menu choice: {:?}", choice);

            let step = match choice {
                MenuChoice::AddBook => self.add_book()?,
                MenuChoice::IssueBook => self.issue_book()?,
                MenuChoice::ReturnBook => self.return_book()?,
                MenuChoice::ViewAll => self.view_all()?,
                MenuChoice::Search => self.search()?,
                MenuChoice::Exit => Step::Quit,
            };

            if step == Step::Quit {
                return self.exit();
            }
        }
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n{BANNER}")?;
        for choice in MenuChoice::ALL {
            writeln!(self.output, "{}. {}", choice.number(), choice.label())?;
        }
        writeln!(self.output, "{RULE}")
    }

    /// Print `label` and read one line without its terminator.
    /// Returns `None` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn save(&mut self) -> io::Result<()> {
        if let Err(e) = self.catalog.save() {
            writeln!(self.output, "Warning: Could not save book data: {e}")?;
        }
        Ok(())
    }

    fn add_book(&mut self) -> io::Result<Step> {
        let Some(title) = self.prompt("Enter title: ")? else {
            return Ok(Step::Quit);
        };
        let Some(author) = self.prompt("Enter author: ")? else {
            return Ok(Step::Quit);
        };
        let Some(isbn) = self.prompt("Enter ISBN: ")? else {
            return Ok(Step::Quit);
        };

        self.catalog.add_book(Book::new(title, author, isbn));
        writeln!(self.output, "Book added successfully.\n")?;
        self.save()?;
        Ok(Step::Continue)
    }

    fn issue_book(&mut self) -> io::Result<Step> {
        let Some(isbn) = self.prompt("Enter ISBN to issue: ")? else {
            return Ok(Step::Quit);
        };

        let message = match self.catalog.issue(&isbn) {
            Circulation::Completed { .. } => "Book issued successfully.",
            Circulation::Unchanged => "Book already issued.",
            Circulation::NotFound => "Book not found.",
        };
        writeln!(self.output, "{message}")?;
        self.save()?;
        Ok(Step::Continue)
    }

    fn return_book(&mut self) -> io::Result<Step> {
        let Some(isbn) = self.prompt("Enter ISBN to return: ")? else {
            return Ok(Step::Quit);
        };

        let message = match self.catalog.return_book(&isbn) {
            Circulation::Completed { .. } => "Book returned successfully.",
            Circulation::Unchanged => "Book was not issued.",
            Circulation::NotFound => "Book not found.",
        };
        writeln!(self.output, "{message}")?;
        self.save()?;
        Ok(Step::Continue)
    }

    fn view_all(&mut self) -> io::Result<Step> {
        writeln!(self.output, "\n--- All Books ---")?;
        for line in self.catalog.display_all() {
            writeln!(self.output, "{line}")?;
        }
        Ok(Step::Continue)
    }

    /// ISBN match first, then title substring.
    fn search(&mut self) -> io::Result<Step> {
        let Some(keyword) = self.prompt("Enter title or ISBN: ")? else {
            return Ok(Step::Quit);
        };

        if let Some(book) = self.catalog.search_by_isbn(&keyword) {
            writeln!(self.output, "\nBook Found:\n{book}")?;
            return Ok(Step::Continue);
        }

        let results = self.catalog.search_by_title(&keyword);
        if results.is_empty() {
            writeln!(self.output, "No books found.")?;
        } else {
            writeln!(self.output, "\nSearch Results:")?;
            for book in results {
                writeln!(self.output, "{book}")?;
            }
        }
        Ok(Step::Continue)
    }

    fn exit(&mut self) -> io::Result<()> {
        writeln!(self.output, "Saving and exiting... Goodbye!")?;
        self.save()
    }
}
