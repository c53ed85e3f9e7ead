//! Run manifest assembly and persistence.
//!
//! The [`ReportBuilder`] accumulates one [`UploadOutcome`] per processed
//! candidate, in call order; [`ReportBuilder::finalize`] freezes it into a
//! [`Manifest`]. Entries are never removed or reordered after being recorded.
//!
//! Only successful outcomes are serialised into the persisted report, exactly
//! as consumers of the report expect; failures are carried in memory for the
//! run summary and surfaced as diagnostic log lines by the orchestrator.
//! The serialised field names (`file`, `link`, `hash`, `s3code`, `date`) are
//! the report's wire format and must not change without versioning it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::upload::UploadOutcome;

/// One successfully uploaded file in the persisted report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Local path of the uploaded file.
    #[serde(rename = "file")]
    pub local_path: PathBuf,
    /// Public URL of the stored object.
    #[serde(rename = "link")]
    pub url: String,
    /// Hex-encoded content fingerprint.
    #[serde(rename = "hash")]
    pub digest: String,
    /// Remote object key within the bucket.
    #[serde(rename = "s3code")]
    pub remote_key: String,
    /// Completion time of processing for this file.
    #[serde(rename = "date")]
    pub completed_at: DateTime<Utc>,
}

/// A per-file failure, kept for diagnostics and summary counts only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUpload {
    pub local_path: PathBuf,
    pub reason: String,
}

/// The accumulated, read-only result of a run.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Successful outcomes in discovery order.
    pub entries: Vec<ManifestEntry>,
    /// Per-file failures, excluded from the persisted report.
    pub failed: Vec<FailedUpload>,
}

impl Manifest {
    /// Serialise the success entries as a pretty-printed JSON array at `path`.
    pub fn write_json(&self, path: &Path) -> Result<(), ReportWriteError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path, json).map_err(|source| ReportWriteError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Error)]
pub enum ReportWriteError {
    #[error("failed to serialise manifest: {0}")]
    Serialise(#[from] serde_json::Error),
    #[error("failed to write manifest to {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Accumulates outcomes during a run.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    entries: Vec<ManifestEntry>,
    failed: Vec<FailedUpload>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one outcome; call order is preserved.
    pub fn record(&mut self, outcome: UploadOutcome) {
        match outcome {
            UploadOutcome::Uploaded(entry) => self.entries.push(entry),
            UploadOutcome::Failed { local_path, reason } => {
                self.failed.push(FailedUpload { local_path, reason })
            }
        }
    }

    pub fn finalize(self) -> Manifest {
        Manifest {
            entries: self.entries,
            failed: self.failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> ManifestEntry {
        ManifestEntry {
            local_path: PathBuf::from(format!("data/{name}")),
            url: format!("http://localhost:9000/files/{name}"),
            digest: "ef46db3751d8e999".into(),
            remote_key: name.into(),
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn record_preserves_call_order() {
        let mut builder = ReportBuilder::new();
        builder.record(UploadOutcome::Uploaded(entry("first.txt")));
        builder.record(UploadOutcome::Failed {
            local_path: PathBuf::from("data/broken.txt"),
            reason: "simulated".into(),
        });
        builder.record(UploadOutcome::Uploaded(entry("second.txt")));

        let manifest = builder.finalize();
        assert_eq!(manifest.entries.len(), 2);
        assert_eq!(manifest.entries[0].remote_key, "first.txt");
        assert_eq!(manifest.entries[1].remote_key, "second.txt");
        assert_eq!(manifest.failed.len(), 1);
        assert_eq!(manifest.failed[0].reason, "simulated");
    }

    #[test]
    fn persisted_report_uses_wire_field_names_and_omits_failures() {
        let dir = tempfile::tempdir().unwrap();
        let report_path = dir.path().join("report.json");

        let mut builder = ReportBuilder::new();
        builder.record(UploadOutcome::Uploaded(entry("a.txt")));
        builder.record(UploadOutcome::Failed {
            local_path: PathBuf::from("data/b.txt"),
            reason: "simulated".into(),
        });
        builder.finalize().write_json(&report_path).unwrap();

        let raw = fs::read_to_string(&report_path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let array = parsed.as_array().unwrap();
        assert_eq!(array.len(), 1);
        let record = &array[0];
        for field in ["file", "link", "hash", "s3code", "date"] {
            assert!(record.get(field).is_some(), "missing field {field}");
        }
        assert!(!raw.contains("b.txt"));
    }

    #[test]
    fn write_json_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = ReportBuilder::new().finalize();
        let err = manifest
            .write_json(&dir.path().join("no-such-dir/report.json"))
            .unwrap_err();
        assert!(matches!(err, ReportWriteError::Io { .. }));
    }
}
