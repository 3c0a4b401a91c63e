use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity attached to every audit record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditLevel {
    Info,
    Error,
}

impl AuditLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for AuditLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit event types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEvent {
    // Session events
    SessionStarted {
        version: String,
        config_hash: String,
    },
    SessionEnded,

    // Circulation
    BookAdded {
        title: String,
        isbn: String,
    },
    BookIssued {
        title: String,
        isbn: String,
    },
    BookReturned {
        title: String,
        isbn: String,
    },

    // Persistence
    CatalogLoaded {
        /// Records kept
        records: usize,
        /// Malformed lines dropped
        skipped: usize,
    },
    CatalogSaved {
        records: usize,
    },
    LoadFailed {
        /// Where the catalog was read from
        location: String,
        error: String,
    },
    SaveFailed {
        /// Where the catalog was written to
        location: String,
        error: String,
    },
}

impl AuditEvent {
    /// Returns the event type as a string for storage
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SessionStarted { .. } => "session_started",
            Self::SessionEnded => "session_ended",
            Self::BookAdded { .. } => "book_added",
            Self::BookIssued { .. } => "book_issued",
            Self::BookReturned { .. } => "book_returned",
            Self::CatalogLoaded { .. } => "catalog_loaded",
            Self::CatalogSaved { .. } => "catalog_saved",
            Self::LoadFailed { .. } => "load_failed",
            Self::SaveFailed { .. } => "save_failed",
        }
    }

    pub fn level(&self) -> AuditLevel {
        match self {
            Self::LoadFailed { .. } | Self::SaveFailed { .. } => AuditLevel::Error,
            _ => AuditLevel::Info,
        }
    }

    /// Human-readable line for the text log
    pub fn message(&self) -> String {
        match self {
            Self::SessionStarted {
                version,
                config_hash,
            } => format!("Session started (version {version}, config {config_hash})"),
            Self::SessionEnded => "Session ended".to_string(),
            Self::BookAdded { title, .. } => format!("Book added: {title}"),
            Self::BookIssued { title, .. } => format!("Issued: {title}"),
            Self::BookReturned { title, .. } => format!("Returned: {title}"),
            Self::CatalogLoaded { records, skipped } => {
                format!("Books loaded from text file ({records} records, {skipped} skipped)")
            }
            Self::CatalogSaved { records } => {
                format!("Books saved to text file ({records} records)")
            }
            Self::LoadFailed { error, .. } => format!("Error loading file: {error}"),
            Self::SaveFailed { error, .. } => format!("Error saving books: {error}"),
        }
    }
}

/// A stored audit record with metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub level: AuditLevel,
    pub event_type: String,
    pub data: AuditEvent,
}

impl AuditRecord {
    pub fn new(timestamp: DateTime<Utc>, event: AuditEvent) -> Self {
        Self {
            timestamp,
            level: event.level(),
            event_type: event.event_type().to_string(),
            data: event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_names() {
        assert_eq!(AuditEvent::SessionEnded.event_type(), "session_ended");
        assert_eq!(
            AuditEvent::BookAdded {
                title: "Dune".to_string(),
                isbn: "111".to_string(),
            }
            .event_type(),
            "book_added"
        );
        assert_eq!(
            AuditEvent::SaveFailed {
                location: "books.txt".to_string(),
                error: "denied".to_string(),
            }
            .event_type(),
            "save_failed"
        );
    }

    #[test]
    fn test_serialization_is_tagged() {
        let event = AuditEvent::BookIssued {
            title: "Dune".to_string(),
            isbn: "111".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"book_issued\""));
        assert!(json.contains("\"isbn\":\"111\""));

        let parsed: AuditEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_levels() {
        assert_eq!(
            AuditEvent::LoadFailed {
                location: "books.txt".to_string(),
                error: "boom".to_string(),
            }
            .level(),
            AuditLevel::Error
        );
        assert_eq!(
            AuditEvent::CatalogLoaded {
                records: 3,
                skipped: 1
            }
            .level(),
            AuditLevel::Info
        );
        assert_eq!(
            AuditEvent::CatalogLoaded {
                records: 3,
                skipped: 0
            }
            .level(),
            AuditLevel::Info
        );
        assert_eq!(AuditEvent::SessionEnded.level(), AuditLevel::Info);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            AuditEvent::BookAdded {
                title: "Dune".to_string(),
                isbn: "111".to_string(),
            }
            .message(),
            "Book added: Dune"
        );
        assert_eq!(
            AuditEvent::BookReturned {
                title: "Dune".to_string(),
                isbn: "111".to_string(),
            }
            .message(),
            "Returned: Dune"
        );
        assert_eq!(
            AuditEvent::SaveFailed {
                location: "books.txt".to_string(),
                error: "disk full".to_string(),
            }
            .message(),
            "Error saving books: disk full"
        );
    }

    #[test]
    fn test_record_takes_level_and_type_from_event() {
        let record = AuditRecord::new(
            Utc::now(),
            AuditEvent::SaveFailed {
                location: "books.txt".to_string(),
                error: "denied".to_string(),
            },
        );
        assert_eq!(record.level, AuditLevel::Error);
        assert_eq!(record.event_type, "save_failed");

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"level\":\"ERROR\""));
    }
}
