pub mod audit;
pub mod catalog;
pub mod config;
pub mod testing;

pub use audit::{
    AuditError, AuditEvent, AuditFormat, AuditHandle, AuditLevel, AuditRecord, AuditStore,
    FileAuditStore,
};
pub use catalog::{
    Book, BookStatus, Catalog, CatalogError, CatalogStore, Circulation, LoadReport,
    ParseStatusError, TextFileStore, FIELD_DELIMITER,
};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, AuditConfig,
    CatalogConfig, Config, ConfigError,
};
