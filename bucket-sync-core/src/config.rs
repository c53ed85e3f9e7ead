//! Typed run configuration for the synchronisation pipeline.
//!
//! The pipeline is configured once per run with a validated [`SyncConfig`];
//! nothing in the core re-reads configuration after start. Rule lists arrive
//! from the outside world as comma-separated strings (see the CLI crate's
//! config loader) and are normalised here: entries trimmed, empties dropped,
//! extensions lower-cased and required to carry their leading dot.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Connection parameters for the object store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// `host:port` of the store endpoint, no scheme.
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    /// Use TLS for the store connection and `https` in manifest URLs.
    #[serde(default)]
    pub secure: bool,
    pub bucket: String,
}

/// Admission rules applied to every discovered file.
///
/// An empty `allowed_extensions` list admits nothing (fail closed); empty
/// exclusion lists exclude nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterRules {
    /// Lower-cased extensions including the leading dot, e.g. `.txt`.
    pub allowed_extensions: Vec<String>,
    /// Substrings that reject a candidate when found anywhere in its path.
    pub exclude_path_contains: Vec<String>,
    /// Substrings that reject a candidate when found in its base filename.
    pub exclude_name_contains: Vec<String>,
}

impl FilterRules {
    /// Build rules from the three comma-separated lists of the external
    /// config schema.
    pub fn from_comma_lists(
        allowed_extensions: &str,
        exclude_path_contains: &str,
        exclude_name_contains: &str,
    ) -> Result<Self, ConfigError> {
        let allowed_extensions = split_list(allowed_extensions)
            .map(|entry| {
                let entry = entry.to_lowercase();
                if entry.starts_with('.') {
                    Ok(entry)
                } else {
                    Err(ConfigError::MalformedExtension(entry))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FilterRules {
            allowed_extensions,
            exclude_path_contains: split_list(exclude_path_contains)
                .map(str::to_owned)
                .collect(),
            exclude_name_contains: split_list(exclude_name_contains)
                .map(str::to_owned)
                .collect(),
        })
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|entry| !entry.is_empty())
}

/// The full, immutable per-run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub storage: StorageConfig,
    /// Root directory of the recursive scan.
    pub scan_dir: PathBuf,
    /// Destination path of the persisted manifest.
    pub report_path: PathBuf,
    pub rules: FilterRules,
}

impl SyncConfig {
    /// Reject configurations with missing required fields before any I/O.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("storage.endpoint", &self.storage.endpoint),
            ("storage.access_key", &self.storage.access_key),
            ("storage.secret_key", &self.storage.secret_key),
            ("storage.bucket", &self.storage.bucket),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField(field));
            }
        }
        if self.scan_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("settings.scan_dir"));
        }
        if self.report_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("settings.report_path"));
        }
        Ok(())
    }

    pub fn trace_loaded(&self) {
        info!(
            endpoint = %self.storage.endpoint,
            bucket = %self.storage.bucket,
            secure = self.storage.secure,
            scan_dir = %self.scan_dir.display(),
            report_path = %self.report_path.display(),
            allowed_extensions = self.rules.allowed_extensions.len(),
            "Loaded SyncConfig"
        );
        // Credentials deliberately kept out of the debug line.
        debug!(rules = ?self.rules, "SyncConfig rules (full debug)");
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required configuration field '{0}'")]
    MissingField(&'static str),
    #[error("allowed extension '{0}' must begin with '.'")]
    MalformedExtension(String),
}
