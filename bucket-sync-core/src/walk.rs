//! Recursive enumeration of candidate files under the scan root.

use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// A file discovered during the walk, prior to filtering.
///
/// Created once by the walker, consumed by the filter and (if admitted) by
/// the upload coordinator; never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Full path as discovered, used for I/O and path-exclusion matching.
    pub local_path: PathBuf,
    /// Path relative to the scan root; source of the remote object key.
    pub relative: PathBuf,
}

/// Lazily walk `root`, yielding every regular file underneath it.
///
/// Unreadable subtrees (permission errors, broken or cyclic symlinks) are
/// logged as warnings and skipped; the walk itself never fails. Re-invoking
/// per run restarts from scratch.
pub fn walk(root: &Path) -> impl Iterator<Item = CandidateFile> + '_ {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(path = ?err.path(), error = %err, "Skipping unreadable entry during walk");
                    return None;
                }
            };
            if !entry.file_type().is_file() {
                return None;
            }
            let local_path = entry.into_path();
            let relative = match local_path.strip_prefix(root) {
                Ok(relative) => relative.to_path_buf(),
                Err(err) => {
                    warn!(path = %local_path.display(), error = %err, "Discovered file outside scan root, skipping");
                    return None;
                }
            };
            Some(CandidateFile {
                local_path,
                relative,
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn walk_finds_nested_files_with_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();
        fs::create_dir_all(dir.path().join("sub/inner")).unwrap();
        fs::write(dir.path().join("sub/inner/b.log"), b"b").unwrap();

        let mut relatives: Vec<_> = walk(dir.path()).map(|c| c.relative).collect();
        relatives.sort();
        assert_eq!(
            relatives,
            vec![PathBuf::from("a.txt"), PathBuf::from("sub/inner/b.log")]
        );
    }

    #[test]
    fn walk_skips_directories_themselves() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("empty/nested")).unwrap();
        assert_eq!(walk(dir.path()).count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn walk_skips_unreadable_subtree_without_failing() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("readable.txt"), b"ok").unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("hidden.txt"), b"no").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores permission bits; only assert the skip when the
        // restriction is effective for this process.
        let restricted = fs::read_dir(&locked).is_err();

        let relatives: Vec<_> = walk(dir.path()).map(|c| c.relative).collect();

        // Restore so the tempdir can be removed on drop.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(relatives.contains(&PathBuf::from("readable.txt")));
        if restricted {
            assert!(!relatives.contains(&PathBuf::from("locked/hidden.txt")));
        }
    }

    #[test]
    fn walk_of_missing_root_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        assert_eq!(walk(&missing).count(), 0);
    }
}
