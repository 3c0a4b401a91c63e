mod menu;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use libris_core::{
    load_config, load_config_or_default, validate_config, AuditEvent, AuditHandle, Catalog,
    Config, FileAuditStore, TextFileStore,
};

use menu::Menu;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable naming an explicit config file
const CONFIG_ENV: &str = "LIBRIS_CONFIG";

/// Config file looked up in the working directory when none is named
const DEFAULT_CONFIG_FILE: &str = "config.toml";

fn main() {
    if let Err(e) = run() {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Diagnostics go to stderr so they never interleave with the menu.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let config = resolve_config()?;
    validate_config(&config).context("Configuration validation failed")?;

    let audit_store = FileAuditStore::new(&config.audit.path, config.audit.format)
        .with_context(|| format!("Failed to open audit log {:?}", config.audit.path))?;
    info!(
        "Audit log: {:?} ({:?})",
        audit_store.path(),
        config.audit.format
    );
    let audit = AuditHandle::new(Arc::new(audit_store));

    audit.emit(AuditEvent::SessionStarted {
        version: VERSION.to_string(),
        config_hash: config_hash(&config),
    });

    let store = TextFileStore::new(&config.catalog.path);
    let mut catalog = Catalog::new(Box::new(store), audit.clone());
    match catalog.load() {
        Ok(report) => info!(
            "Catalog {}: {} books, {} lines skipped",
            catalog.location(),
            report.loaded,
            report.skipped
        ),
        Err(_) => println!("Warning: Could not load book data. File may be corrupted.\n"),
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    Menu::new(&mut catalog, stdin.lock(), stdout.lock())
        .run()
        .context("Terminal I/O failed")?;

    audit.emit(AuditEvent::SessionEnded);
    info!("Session ended with {} books", catalog.len());

    Ok(())
}

/// An explicitly named config file must exist; the default one is optional.
fn resolve_config() -> Result<Config> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            let path = PathBuf::from(path);
            info!("Loading configuration from {:?}", path);
            load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))
        }
        Err(_) => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            load_config_or_default(&path)
                .with_context(|| format!("Failed to load config from {:?}", path))
        }
    }
}

/// Short SHA-256 of the effective configuration, recorded at session start.
fn config_hash(config: &Config) -> String {
    let config_json = serde_json::to_string(config).unwrap_or_default();
    let digest = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    digest[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_hash_is_short_and_stable() {
        let config = Config::default();
        let first = config_hash(&config);
        assert_eq!(first.len(), 16);
        assert_eq!(first, config_hash(&config));
    }

    #[test]
    fn test_config_hash_changes_with_config() {
        let mut other = Config::default();
        other.catalog.path = PathBuf::from("elsewhere.txt");
        assert_ne!(config_hash(&Config::default()), config_hash(&other));
    }
}
