//! In-memory catalog store.

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::catalog::{Book, CatalogError, CatalogStore, LoadReport};

#[derive(Debug, Default)]
struct Inner {
    /// `None` models a missing backing file.
    lines: Option<Vec<String>>,
    /// Fail a load after this many lines have been read.
    fail_load_after: Option<usize>,
    fail_save: bool,
    saves: usize,
}

/// Catalog store holding encoded lines in memory.
///
/// Clones share state, so a test can keep one clone for assertions after
/// handing another to a [`Catalog`](crate::catalog::Catalog).
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalogStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryCatalogStore {
    /// A store with no backing file yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose backing file holds the given raw lines.
    pub fn with_lines(lines: &[&str]) -> Self {
        let store = Self::new();
        store.inner.lock().unwrap().lines = Some(lines.iter().map(|l| l.to_string()).collect());
        store
    }

    /// Make the next loads fail with an I/O error after `lines` lines.
    pub fn fail_load_after(&self, lines: usize) {
        self.inner.lock().unwrap().fail_load_after = Some(lines);
    }

    pub fn set_fail_save(&self, fail: bool) {
        self.inner.lock().unwrap().fail_save = fail;
    }

    /// Current raw lines, or `None` if nothing was ever saved.
    pub fn lines(&self) -> Option<Vec<String>> {
        self.inner.lock().unwrap().lines.clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.inner.lock().unwrap().saves
    }
}

impl CatalogStore for MemoryCatalogStore {
    fn location(&self) -> String {
        "memory".to_string()
    }

    fn load_into(&self, books: &mut Vec<Book>) -> Result<LoadReport, CatalogError> {
        let inner = self.inner.lock().unwrap();
        let Some(lines) = &inner.lines else {
            return Ok(LoadReport {
                file_missing: true,
                ..LoadReport::default()
            });
        };

        let mut report = LoadReport::default();
        for (index, line) in lines.iter().enumerate() {
            if inner.fail_load_after == Some(index) {
                return Err(CatalogError::Load {
                    path: PathBuf::from("memory"),
                    source: io::Error::new(io::ErrorKind::InvalidData, "mock read failure"),
                });
            }
            match Book::from_line(line) {
                Some(book) => {
                    books.push(book);
                    report.loaded += 1;
                }
                None => report.skipped += 1,
            }
        }
        Ok(report)
    }

    fn save(&self, books: &[Book]) -> Result<(), CatalogError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_save {
            return Err(CatalogError::Save {
                path: PathBuf::from("memory"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "mock write failure"),
            });
        }
        inner.lines = Some(books.iter().map(Book::to_line).collect());
        inner.saves += 1;
        Ok(())
    }
}
