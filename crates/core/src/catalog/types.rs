//! Types for the book catalog.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field separator used by the line encoding.
///
/// Field values are written verbatim. A value containing this character
/// produces a row that no longer splits into four fields on reload.
pub const FIELD_DELIMITER: char = '|';

/// Circulation status of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    /// On the shelf.
    #[default]
    Available,
    /// Lent out.
    Issued,
}

impl BookStatus {
    /// Literal used in the catalog file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Issued => "issued",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown status literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown book status: {0:?}")]
pub struct ParseStatusError(pub String);

impl FromStr for BookStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "issued" => Ok(Self::Issued),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    /// Opaque identifier. Uniqueness is not enforced.
    pub isbn: String,
    pub status: BookStatus,
}

impl Book {
    /// Create a new, available book. Any text is accepted verbatim.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
    ) -> Self {
        Self::with_status(title, author, isbn, BookStatus::Available)
    }

    pub fn with_status(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
        status: BookStatus,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            status,
        }
    }

    /// Encode as a single catalog line, without the trailing newline.
    pub fn to_line(&self) -> String {
        let delim = FIELD_DELIMITER;
        format!(
            "{}{delim}{}{delim}{}{delim}{}",
            self.title, self.author, self.isbn, self.status
        )
    }

    /// Decode a catalog line.
    ///
    /// Returns `None` unless the line splits into exactly four fields and the
    /// last one is a known status. Whitespace around the status is ignored;
    /// title, author and ISBN are kept verbatim.
    pub fn from_line(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\n', '\r']);
        let parts: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        let [title, author, isbn, status] = parts.as_slice() else {
            return None;
        };
        let status = status.trim().parse().ok()?;
        Some(Self::with_status(*title, *author, *isbn, status))
    }

    /// Lend the book out. Returns false if it was already issued.
    pub fn issue(&mut self) -> bool {
        if self.status == BookStatus::Available {
            self.status = BookStatus::Issued;
            return true;
        }
        false
    }

    /// Bring the book back. Returns false if it was not issued.
    pub fn return_book(&mut self) -> bool {
        if self.status == BookStatus::Issued {
            self.status = BookStatus::Available;
            return true;
        }
        false
    }

    pub fn is_available(&self) -> bool {
        self.status == BookStatus::Available
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} | ISBN: {} | Status: {}",
            self.title, self.author, self.isbn, self.status
        )
    }
}

/// Outcome of an issue or return request against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Circulation {
    /// The status changed.
    Completed { title: String },
    /// The book exists but was already in the requested state.
    Unchanged,
    /// No book with that ISBN.
    NotFound,
}

impl Circulation {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Summary of a catalog load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records decoded and kept.
    pub loaded: usize,
    /// Lines dropped because they did not decode.
    pub skipped: usize,
    /// The backing file did not exist.
    pub file_missing: bool,
}

/// Errors for catalog persistence.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write catalog file {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
