//! In-memory audit store.

use std::sync::Mutex;

use crate::audit::{AuditError, AuditRecord, AuditStore};

/// Audit store that keeps records in memory for assertions.
#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    records: Mutex<Vec<AuditRecord>>,
    should_fail: bool,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every append fails.
    pub fn failing() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            should_fail: true,
        }
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Event types in the order they were appended.
    pub fn event_types(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.event_type.clone())
            .collect()
    }
}

impl AuditStore for MemoryAuditStore {
    fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        if self.should_fail {
            return Err(AuditError::Io(std::io::Error::other("mock failure")));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}
