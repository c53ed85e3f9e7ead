//! Content fingerprinting for change detection and audit.
//!
//! Streams each file in 4 KiB chunks through xxh64 (seed 0) and renders the
//! digest as 16 lower-hex characters. The fingerprint is deterministic across
//! runs and platforms for identical byte content; it is not a cryptographic
//! hash and makes no claims against adversarial collisions.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use xxhash_rust::xxh64::Xxh64;

const CHUNK_SIZE: usize = 4096;

#[derive(Debug, Error)]
#[error("failed to read {path:?} for fingerprinting: {source}")]
pub struct FingerprintError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Compute the hex-encoded xxh64 digest of the file at `path`.
///
/// An I/O failure mid-stream surfaces as an error and aborts processing of
/// this file only.
pub fn fingerprint(path: &Path) -> Result<String, FingerprintError> {
    let wrap = |source| FingerprintError {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(wrap)?;
    let mut hasher = Xxh64::new(0);
    let mut chunk = [0u8; CHUNK_SIZE];
    loop {
        let read = file.read(&mut chunk).map_err(wrap)?;
        if read == 0 {
            break;
        }
        hasher.update(&chunk[..read]);
    }
    Ok(format!("{:016x}", hasher.digest()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use xxhash_rust::xxh64::xxh64;

    fn write_fixture(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn empty_file_matches_known_xxh64_vector() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "empty", b"");
        assert_eq!(fingerprint(&path).unwrap(), "ef46db3751d8e999");
    }

    #[test]
    fn identical_content_yields_identical_digests() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_fixture(&dir, "a", b"same bytes");
        let b = write_fixture(&dir, "b", b"same bytes");
        assert_eq!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
    }

    #[test]
    fn single_byte_difference_changes_digest() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_fixture(&dir, "a", b"same bytes");
        let b = write_fixture(&dir, "b", b"same bytez");
        assert_ne!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
    }

    #[test]
    fn streaming_matches_one_shot_across_chunk_boundaries() {
        // Content larger than one chunk, not a multiple of the chunk size.
        let content: Vec<u8> = (0..CHUNK_SIZE * 3 + 17).map(|i| (i % 251) as u8).collect();
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "big", &content);
        assert_eq!(
            fingerprint(&path).unwrap(),
            format!("{:016x}", xxh64(&content, 0))
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = fingerprint(&dir.path().join("gone")).unwrap_err();
        assert_eq!(err.path, dir.path().join("gone"));
    }
}
