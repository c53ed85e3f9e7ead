//! High-level pipeline: orchestrates walk → filter → upload → report.
//!
//! [`synchronise`] is the single entrypoint for a run. It:
//!   - ensures the destination bucket exists (creating it if absent),
//!   - walks the scan root, admitting candidates through the filter rules,
//!   - processes each admitted file through the upload coordinator,
//!   - records every outcome on the report builder,
//!   - persists the manifest and returns the run summary.
//!
//! # Error Handling
//! Only two conditions are fatal: the bucket precondition and persisting the
//! manifest (losing it would silently discard all accumulated outcomes).
//! Everything per-file is recorded as a failure outcome and logged; the walk
//! continues.
//!
//! # Concurrency
//! Candidates are processed sequentially, a deliberate simplicity choice —
//! per-file processing has no cross-file ordering dependency, and the report
//! builder is the only accumulator, so a bounded worker pool can be
//! introduced later without changing this module's contract.

use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::SyncConfig;
use crate::contract::{ObjectStore, StoreError};
use crate::filter;
use crate::report::{ReportBuilder, ReportWriteError};
use crate::upload::{self, UploadOutcome};
use crate::walk::walk;

/// Summary of one completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Files uploaded and recorded in the manifest.
    pub uploaded: usize,
    /// Files that failed and were excluded from the manifest.
    pub failed: usize,
    /// Where the manifest was written.
    pub report_path: PathBuf,
}

/// Fatal pipeline errors. Per-file failures never surface here.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("bucket precondition failed for '{bucket}': {source}")]
    BucketPrecondition {
        bucket: String,
        #[source]
        source: StoreError,
    },
    #[error(transparent)]
    ReportWrite(#[from] ReportWriteError),
}

/// Ensure `bucket` exists, creating it when absent. Creation is idempotent
/// on the store side, so racing another run is safe.
pub async fn ensure_bucket<S>(store: &S, bucket: &str) -> Result<(), SyncError>
where
    S: ObjectStore + ?Sized,
{
    let precondition = |source| SyncError::BucketPrecondition {
        bucket: bucket.to_owned(),
        source,
    };

    if store.bucket_exists(bucket).await.map_err(precondition)? {
        debug!(bucket, "Bucket already exists");
        return Ok(());
    }
    info!(bucket, "Bucket absent, creating");
    store.create_bucket(bucket).await.map_err(precondition)
}

/// Run the full synchronisation pipeline for `config` against `store`.
pub async fn synchronise<S>(config: &SyncConfig, store: &S) -> Result<SyncReport, SyncError>
where
    S: ObjectStore + ?Sized,
{
    info!(
        scan_dir = %config.scan_dir.display(),
        bucket = %config.storage.bucket,
        "Starting synchronisation run"
    );

    ensure_bucket(store, &config.storage.bucket).await?;

    let mut report = ReportBuilder::new();
    for candidate in walk(&config.scan_dir) {
        if !filter::admit(&candidate, &config.rules) {
            debug!(file = %candidate.local_path.display(), "Candidate rejected by filter rules");
            continue;
        }

        let outcome = upload::process(&candidate, &config.storage, store).await;
        match &outcome {
            UploadOutcome::Uploaded(entry) => {
                info!(
                    file = %entry.local_path.display(),
                    key = %entry.remote_key,
                    hash = %entry.digest,
                    "Uploaded"
                );
            }
            UploadOutcome::Failed { local_path, reason } => {
                error!(file = %local_path.display(), reason = %reason, "Processing failed, continuing with next file");
            }
        }
        report.record(outcome);
    }

    let manifest = report.finalize();
    let uploaded = manifest.entries.len();
    let failed = manifest.failed.len();
    manifest.write_json(&config.report_path)?;

    info!(
        uploaded,
        failed,
        report_path = %config.report_path.display(),
        "Synchronisation run complete"
    );
    Ok(SyncReport {
        uploaded,
        failed,
        report_path: config.report_path.clone(),
    })
}
