use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Modification time of the first candidate that exists and can be stat'ed.
///
/// Candidates are tried in order; one whose metadata can't be read is skipped.
/// `None` when nothing resolves.
pub fn last_index_refresh(candidates: &[PathBuf]) -> Option<DateTime<Utc>> {
    for path in candidates {
        if !path.exists() {
            continue;
        }
        match std::fs::metadata(path).and_then(|m| m.modified()) {
            Ok(mtime) => return Some(DateTime::<Utc>::from(mtime)),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "skipping freshness candidate");
            }
        }
    }
    None
}
