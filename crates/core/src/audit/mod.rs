//! Audit trail of catalog activity.
//!
//! Events are emitted through an [`AuditHandle`] that callers receive at
//! construction time and written by an [`AuditStore`].

mod events;
mod file;
mod handle;
mod store;

pub use events::*;
pub use file::*;
pub use handle::*;
pub use store::*;
