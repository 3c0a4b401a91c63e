//! Book catalog - the in-memory collection of books and its backing store.
//!
//! The [`Catalog`] is the source of truth during a run. A [`CatalogStore`]
//! only provides durability: every save rewrites the whole store from the
//! in-memory sequence.

mod collection;
mod text_file;
mod types;

pub use collection::{Catalog, EMPTY_CATALOG_NOTICE};
pub use text_file::TextFileStore;
pub use types::*;

/// Trait for catalog persistence.
pub trait CatalogStore: Send + Sync {
    /// Human-readable location of the store, used in log and audit messages.
    fn location(&self) -> String;

    /// Decode every stored record into `books`, in stored order.
    ///
    /// Undecodable lines are skipped and counted. A missing store is not an
    /// error. On an I/O error, records decoded before the failure have
    /// already been pushed.
    fn load_into(&self, books: &mut Vec<Book>) -> Result<LoadReport, CatalogError>;

    /// Replace the stored contents with `books`.
    fn save(&self, books: &[Book]) -> Result<(), CatalogError>;
}
