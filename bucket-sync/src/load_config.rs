//! `load_config` module: loads a static YAML config file into the validated
//! internal [`SyncConfig`].
//!
//! This is the only place where untrusted YAML is parsed and mapped to the
//! strongly typed configuration the core pipeline consumes. The file mirrors
//! the external schema: a `storage` group (endpoint, credentials, secure
//! flag, bucket) and a `settings` group (scan dir, report path and the three
//! comma-separated rule lists).
//!
//! # Errors
//! All errors here use `anyhow::Error` for context-rich diagnostics at the
//! CLI boundary, wrapping the core's `ConfigError` for validation failures.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use bucket_sync_core::config::{FilterRules, StorageConfig, SyncConfig};

#[derive(Debug, Deserialize)]
struct RawConfig {
    storage: RawStorage,
    settings: RawSettings,
}

#[derive(Debug, Deserialize)]
struct RawStorage {
    endpoint: String,
    access_key: String,
    secret_key: String,
    #[serde(default)]
    secure: bool,
    bucket: String,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    scan_dir: PathBuf,
    report_path: PathBuf,
    /// Comma-separated extensions, each beginning with `.`.
    #[serde(default)]
    allowed_extensions: String,
    #[serde(default)]
    exclude_path_contains: String,
    #[serde(default)]
    exclude_name_contains: String,
}

/// Load, parse and validate the YAML config file at `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SyncConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = fs::read_to_string(path_ref)
        .with_context(|| format!("Failed to read config file {path_ref:?}"))?;

    let raw: RawConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    let rules = FilterRules::from_comma_lists(
        &raw.settings.allowed_extensions,
        &raw.settings.exclude_path_contains,
        &raw.settings.exclude_name_contains,
    )
    .context("Invalid filter rules in config")?;

    let config = SyncConfig {
        storage: StorageConfig {
            endpoint: raw.storage.endpoint,
            access_key: raw.storage.access_key,
            secret_key: raw.storage.secret_key,
            secure: raw.storage.secure,
            bucket: raw.storage.bucket,
        },
        scan_dir: raw.settings.scan_dir,
        report_path: raw.settings.report_path,
        rules,
    };
    config.validate().context("Invalid configuration")?;
    config.trace_loaded();
    Ok(config)
}
