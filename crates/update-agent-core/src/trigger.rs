//! Manual refresh requests signaled by a marker file.

use crate::error::Result;
use crate::io::ensure_parent_dir;
use chrono::Utc;
use std::path::Path;

/// What happened when the trigger marker was looked at.
#[derive(Debug)]
pub enum TriggerOutcome {
    /// No marker present.
    Absent,
    /// Marker was present and has been deleted; a check should run.
    Consumed,
    /// Marker was present but could not be deleted. No check is forced; the
    /// caller decides how loudly to report it.
    Stuck(std::io::Error),
}

impl TriggerOutcome {
    pub fn requests_check(&self) -> bool {
        matches!(self, TriggerOutcome::Consumed)
    }
}

/// Delete the trigger marker if it exists.
///
/// A marker that disappears between the existence check and the delete was
/// consumed by someone else and counts as absent.
pub fn consume_trigger(path: &Path) -> TriggerOutcome {
    if !path.exists() {
        return TriggerOutcome::Absent;
    }
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::info!("Manual refresh triggered");
            TriggerOutcome::Consumed
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => TriggerOutcome::Absent,
        Err(e) => TriggerOutcome::Stuck(e),
    }
}

/// Create the trigger marker, stamped with the current time.
pub fn create_trigger(path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    std::fs::write(path, Utc::now().to_rfc3339())?;
    Ok(())
}
