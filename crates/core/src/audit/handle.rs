use std::sync::Arc;

use chrono::Utc;

use super::{AuditEvent, AuditRecord, AuditStore};

/// Handle for emitting audit events
///
/// This is cheaply cloneable. Every component that records events holds its
/// own clone; there is no process-wide logger.
#[derive(Clone)]
pub struct AuditHandle {
    store: Arc<dyn AuditStore>,
}

impl AuditHandle {
    /// Create a new audit handle writing to the given store
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Record an event
    ///
    /// If the store fails, the error is logged but the caller is not failed.
    pub fn emit(&self, event: AuditEvent) {
        let record = AuditRecord::new(Utc::now(), event);
        if let Err(e) = self.store.append(&record) {
            tracing::error!("Failed to write audit event {}: {}", record.event_type, e);
        }
    }
}

impl std::fmt::Debug for AuditHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditHandle").finish_non_exhaustive()
    }
}
