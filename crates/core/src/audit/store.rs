use thiserror::Error;

use super::AuditRecord;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Trait for audit event storage
///
/// Stores are append-only. Records are never rewritten or removed.
pub trait AuditStore: Send + Sync {
    /// Append one record
    fn append(&self, record: &AuditRecord) -> Result<(), AuditError>;
}
