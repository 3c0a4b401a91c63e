use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Catalog path is not empty
/// - Audit path is not empty and differs from the catalog path
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.catalog.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "catalog.path cannot be empty".to_string(),
        ));
    }

    if config.audit.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "audit.path cannot be empty".to_string(),
        ));
    }

    // Saving rewrites the catalog file, which would wipe an audit log sharing it.
    if config.audit.path == config.catalog.path {
        return Err(ConfigError::ValidationError(
            "audit.path must differ from catalog.path".to_string(),
        ));
    }

    Ok(())
}
