//! Per-file upload coordination.
//!
//! [`process`] drives a single admitted candidate through key derivation,
//! object put, content fingerprinting and URL construction, and always
//! returns an [`UploadOutcome`] — failures are data, not control flow, so a
//! broken file can never abort the surrounding run.
//!
//! The store client and the fingerprint read the file independently, so the
//! recorded hash must be proven to describe the bytes that were uploaded: a
//! size/mtime snapshot taken before the put is re-checked after the
//! fingerprint read, and any change fails the candidate.

use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, error};

use crate::config::StorageConfig;
use crate::contract::ObjectStore;
use crate::fingerprint::fingerprint;
use crate::report::ManifestEntry;
use crate::walk::CandidateFile;

/// The result of processing one candidate. Immutable once created; owned by
/// the report builder thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded(ManifestEntry),
    Failed {
        local_path: PathBuf,
        reason: String,
    },
}

/// Render the relative path as a remote object key with `/` separators,
/// regardless of host path conventions.
pub fn remote_key(candidate: &CandidateFile) -> String {
    candidate
        .relative
        .iter()
        .map(|component| component.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Public URL of an object: `{scheme}://{endpoint}/{bucket}/{key}`, with
/// `https` iff secure transport is configured.
pub fn object_url(storage: &StorageConfig, key: &str) -> String {
    let scheme = if storage.secure { "https" } else { "http" };
    format!("{scheme}://{}/{}/{key}", storage.endpoint, storage.bucket)
}

/// Size and mtime of a file, captured around the two reads to detect
/// concurrent external modification.
fn stat_snapshot(path: &Path) -> std::io::Result<(u64, Option<SystemTime>)> {
    let metadata = std::fs::metadata(path)?;
    Ok((metadata.len(), metadata.modified().ok()))
}

/// Upload one candidate and fingerprint its content.
///
/// The fingerprint is read from the same path immediately after the put. The
/// file's size and mtime are snapshotted before the put and verified after
/// the fingerprint read; a mismatch fails the candidate rather than record a
/// hash of bytes that were never uploaded. Any failure (read, store,
/// transport, snapshot mismatch) yields `UploadOutcome::Failed` for this
/// file only.
pub async fn process<S>(
    candidate: &CandidateFile,
    storage: &StorageConfig,
    store: &S,
) -> UploadOutcome
where
    S: ObjectStore + ?Sized,
{
    let key = remote_key(candidate);
    debug!(file = %candidate.local_path.display(), key = %key, "Uploading candidate");

    let failed = |reason: String| UploadOutcome::Failed {
        local_path: candidate.local_path.clone(),
        reason,
    };

    let before = match stat_snapshot(&candidate.local_path) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!(file = %candidate.local_path.display(), error = %e, "Could not stat candidate before upload");
            return failed(format!("failed to stat file before upload: {e}"));
        }
    };

    if let Err(e) = store
        .put_object(&storage.bucket, &key, &candidate.local_path)
        .await
    {
        error!(file = %candidate.local_path.display(), error = %e, "Upload failed");
        return failed(format!("upload failed: {e}"));
    }

    let digest = match fingerprint(&candidate.local_path) {
        Ok(digest) => digest,
        Err(e) => {
            error!(file = %candidate.local_path.display(), error = %e, "Fingerprinting failed");
            return failed(e.to_string());
        }
    };

    match stat_snapshot(&candidate.local_path) {
        Ok(after) if after == before => {}
        Ok(_) => {
            error!(file = %candidate.local_path.display(), "File changed between upload and fingerprint");
            return failed("file changed while it was being processed; hash would not describe the uploaded bytes".into());
        }
        Err(e) => {
            error!(file = %candidate.local_path.display(), error = %e, "Could not stat candidate after fingerprinting");
            return failed(format!("failed to stat file after fingerprinting: {e}"));
        }
    }

    UploadOutcome::Uploaded(ManifestEntry {
        local_path: candidate.local_path.clone(),
        url: object_url(storage, &key),
        digest,
        remote_key: key,
        completed_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn candidate(relative: &str) -> CandidateFile {
        CandidateFile {
            local_path: Path::new("/data").join(relative),
            relative: PathBuf::from(relative),
        }
    }

    fn storage(secure: bool) -> StorageConfig {
        StorageConfig {
            endpoint: "localhost:9000".into(),
            access_key: "admin".into(),
            secret_key: "password123".into(),
            secure,
            bucket: "files".into(),
        }
    }

    #[test]
    fn remote_key_uses_forward_slashes() {
        let c = candidate("docs/inner/e.txt");
        assert_eq!(remote_key(&c), "docs/inner/e.txt");
    }

    #[test]
    fn object_url_scheme_follows_secure_flag() {
        assert_eq!(
            object_url(&storage(false), "a.txt"),
            "http://localhost:9000/files/a.txt"
        );
        assert_eq!(
            object_url(&storage(true), "a.txt"),
            "https://localhost:9000/files/a.txt"
        );
    }
}
