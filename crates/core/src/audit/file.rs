use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::{AuditError, AuditRecord, AuditStore};

/// Timestamp layout of the text format, e.g. `2024-05-01 13:45:12,034`
const TEXT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Line format of the audit file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditFormat {
    /// `<timestamp> - <LEVEL> - <message>`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Append-only file audit store
pub struct FileAuditStore {
    path: PathBuf,
    format: AuditFormat,
    file: Mutex<File>,
}

impl FileAuditStore {
    /// Open (or create) the audit file for appending
    pub fn new(path: &Path, format: AuditFormat) -> Result<Self, AuditError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            format,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn render(&self, record: &AuditRecord) -> Result<String, AuditError> {
        match self.format {
            AuditFormat::Text => Ok(format!(
                "{} - {} - {}",
                record.timestamp.format(TEXT_TIMESTAMP_FORMAT),
                record.level,
                record.data.message()
            )),
            AuditFormat::Json => serde_json::to_string(record)
                .map_err(|e| AuditError::Serialization(e.to_string())),
        }
    }
}

impl AuditStore for FileAuditStore {
    fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let line = self.render(record)?;
        let mut file = self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(file, "{line}")?;
        file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditEvent, AuditLevel};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn book_added(title: &str) -> AuditRecord {
        AuditRecord::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 13, 45, 12).unwrap(),
            AuditEvent::BookAdded {
                title: title.to_string(),
                isbn: "111".to_string(),
            },
        )
    }

    #[test]
    fn test_text_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("audit.log");
        let store = FileAuditStore::new(&path, AuditFormat::Text).unwrap();

        store.append(&book_added("Dune")).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "2024-05-01 13:45:12,000 - INFO - Book added: Dune\n");
    }

    #[test]
    fn test_json_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("audit.jsonl");
        let store = FileAuditStore::new(&path, AuditFormat::Json).unwrap();

        store.append(&book_added("Dune")).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let record: AuditRecord = serde_json::from_str(contents.trim_end()).unwrap();
        assert_eq!(record.event_type, "book_added");
        assert_eq!(record.level, AuditLevel::Info);
    }

    #[test]
    fn test_appends_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("audit.log");

        FileAuditStore::new(&path, AuditFormat::Text)
            .unwrap()
            .append(&book_added("Dune"))
            .unwrap();
        FileAuditStore::new(&path, AuditFormat::Text)
            .unwrap()
            .append(&book_added("Emma"))
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Book added: Dune"));
        assert!(lines[1].ends_with("Book added: Emma"));
    }

    #[test]
    fn test_open_in_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("audit.log");
        let result = FileAuditStore::new(&path, AuditFormat::Text);
        assert!(matches!(result, Err(AuditError::Io(_))));
    }

    #[test]
    fn test_format_deserialization() {
        #[derive(Deserialize)]
        struct Wrapper {
            format: AuditFormat,
        }
        let parsed: Wrapper = toml::from_str(r#"format = "json""#).unwrap();
        assert_eq!(parsed.format, AuditFormat::Json);
        assert_eq!(AuditFormat::default(), AuditFormat::Text);
    }
}
