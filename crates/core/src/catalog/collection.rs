//! The in-memory catalog.

use super::{Book, CatalogError, CatalogStore, Circulation, LoadReport};
use crate::audit::{AuditEvent, AuditHandle};

/// Notice produced by [`Catalog::display_all`] for an empty catalog.
pub const EMPTY_CATALOG_NOTICE: &str = "No books available.";

/// Ordered collection of books plus the store that persists it.
///
/// Insertion order is the display and search order. Mutations only touch
/// memory; callers persist with [`Catalog::save`].
pub struct Catalog {
    books: Vec<Book>,
    store: Box<dyn CatalogStore>,
    audit: AuditHandle,
}

impl Catalog {
    /// Create an empty catalog. Call [`Catalog::load`] once to read the store.
    pub fn new(store: Box<dyn CatalogStore>, audit: AuditHandle) -> Self {
        Self {
            books: Vec::new(),
            store,
            audit,
        }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Location of the backing store.
    pub fn location(&self) -> String {
        self.store.location()
    }

    /// Append a book. Duplicate ISBNs are allowed.
    pub fn add_book(&mut self, book: Book) {
        self.audit.emit(AuditEvent::BookAdded {
            title: book.title.clone(),
            isbn: book.isbn.clone(),
        });
        self.books.push(book);
    }

    /// Case-insensitive substring match on the title, in catalog order.
    pub fn search_by_title(&self, query: &str) -> Vec<&Book> {
        let query = query.to_lowercase();
        self.books
            .iter()
            .filter(|b| b.title.to_lowercase().contains(&query))
            .collect()
    }

    /// First book whose ISBN equals `isbn` exactly.
    pub fn search_by_isbn(&self, isbn: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.isbn == isbn)
    }

    fn search_by_isbn_mut(&mut self, isbn: &str) -> Option<&mut Book> {
        self.books.iter_mut().find(|b| b.isbn == isbn)
    }

    /// Issue the first book with this ISBN.
    pub fn issue(&mut self, isbn: &str) -> Circulation {
        let Some(book) = self.search_by_isbn_mut(isbn) else {
            return Circulation::NotFound;
        };
        if !book.issue() {
            return Circulation::Unchanged;
        }

        let title = book.title.clone();
        self.audit.emit(AuditEvent::BookIssued {
            title: title.clone(),
            isbn: isbn.to_string(),
        });
        Circulation::Completed { title }
    }

    /// Return the first book with this ISBN.
    pub fn return_book(&mut self, isbn: &str) -> Circulation {
        let Some(book) = self.search_by_isbn_mut(isbn) else {
            return Circulation::NotFound;
        };
        if !book.return_book() {
            return Circulation::Unchanged;
        }

        let title = book.title.clone();
        self.audit.emit(AuditEvent::BookReturned {
            title: title.clone(),
            isbn: isbn.to_string(),
        });
        Circulation::Completed { title }
    }

    /// Display line of every book, or a single notice when empty.
    pub fn display_all(&self) -> Vec<String> {
        if self.books.is_empty() {
            return vec![EMPTY_CATALOG_NOTICE.to_string()];
        }
        self.books.iter().map(Book::to_string).collect()
    }

    /// Write every book to the store.
    ///
    /// Failures are recorded in the audit log and returned; the in-memory
    /// catalog is untouched either way.
    pub fn save(&self) -> Result<(), CatalogError> {
        match self.store.save(&self.books) {
            Ok(()) => {
                self.audit.emit(AuditEvent::CatalogSaved {
                    records: self.books.len(),
                });
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to save catalog: {}", e);
                self.audit.emit(AuditEvent::SaveFailed {
                    location: self.store.location(),
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Replace the in-memory books with the store's contents.
    ///
    /// A missing store leaves the catalog empty and is not audited. On an
    /// I/O failure the books read so far are kept, the failure is audited
    /// and returned so the caller can warn that data may be incomplete.
    pub fn load(&mut self) -> Result<LoadReport, CatalogError> {
        self.books.clear();
        match self.store.load_into(&mut self.books) {
            Ok(report) => {
                if !report.file_missing {
                    tracing::info!(
                        "Loaded {} books from {} ({} malformed lines skipped)",
                        report.loaded,
                        self.store.location(),
                        report.skipped
                    );
                    self.audit.emit(AuditEvent::CatalogLoaded {
                        records: report.loaded,
                        skipped: report.skipped,
                    });
                }
                Ok(report)
            }
            Err(e) => {
                tracing::error!("Failed to load catalog: {}", e);
                self.audit.emit(AuditEvent::LoadFailed {
                    location: self.store.location(),
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("books", &self.books)
            .field("location", &self.store.location())
            .finish()
    }
}
