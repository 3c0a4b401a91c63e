//! In-memory test doubles for the catalog and audit seams.
//!
//! # Example
//!
//! ```rust,ignore
//! use libris_core::testing::{MemoryAuditStore, MemoryCatalogStore};
//!
//! let audit = Arc::new(MemoryAuditStore::new());
//! let store = MemoryCatalogStore::with_lines(&["Dune|Herbert|111|available"]);
//! let mut catalog = Catalog::new(Box::new(store.clone()), AuditHandle::new(audit.clone()));
//! catalog.load()?;
//! ```

mod memory_audit;
mod memory_catalog;

pub use memory_audit::MemoryAuditStore;
pub use memory_catalog::MemoryCatalogStore;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{Book, BookStatus};

    /// A small shelf with one issued book.
    pub fn sample_books() -> Vec<Book> {
        vec![
            Book::new("Dune", "Frank Herbert", "111"),
            Book::with_status("Emma", "Jane Austen", "222", BookStatus::Issued),
            Book::new("Dune Messiah", "Frank Herbert", "333"),
        ]
    }
}
