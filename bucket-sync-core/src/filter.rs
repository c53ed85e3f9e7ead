//! Admission filtering of discovered files.
//!
//! Pure predicate over a candidate and the configured rules; no I/O, no side
//! effects. Checks run in a fixed order and all must pass:
//! 1. extension allow-list (an empty list admits nothing),
//! 2. path-substring exclusions,
//! 3. filename-substring exclusions.

use crate::config::FilterRules;
use crate::walk::CandidateFile;

/// Decide whether `candidate` enters the upload set.
pub fn admit(candidate: &CandidateFile, rules: &FilterRules) -> bool {
    // Extension check, fail closed: no allow-list means upload nothing.
    let extension = candidate
        .local_path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()));
    match extension {
        Some(ext) if rules.allowed_extensions.iter().any(|a| *a == ext) => {}
        _ => return false,
    }

    let path = candidate.local_path.to_string_lossy();
    if rules
        .exclude_path_contains
        .iter()
        .any(|needle| path.contains(needle.as_str()))
    {
        return false;
    }

    let name = candidate
        .local_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if rules
        .exclude_name_contains
        .iter()
        .any(|needle| name.contains(needle.as_str()))
    {
        return false;
    }

    true
}
