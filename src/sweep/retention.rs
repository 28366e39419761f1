use std::io;
use std::time::{Duration, SystemTime};

use tokio::fs::remove_dir_all;
use tracing::{info, warn};

use crate::sweep::sessions::SessionEntry;

/// Remove every session whose idle age strictly exceeds `ceiling`.
///
/// Age-only and independent of storage usage: a mostly-empty session is
/// still purged once stale, which bounds how long uploaded data is kept at
/// all. The full list is scanned in one pass; a removal that fails is
/// logged and does not stop the scan. Returns the number removed.
pub async fn remove_expired(
    sessions: &[SessionEntry],
    now: SystemTime,
    ceiling: Duration,
) -> usize {
    let mut removed = 0;

    for session in sessions {
        // A modified time in the future counts as age zero.
        let age = now
            .duration_since(session.modified)
            .unwrap_or(Duration::ZERO);
        if age <= ceiling {
            continue;
        }

        match remove_dir_all(&session.path).await {
            Ok(()) => {
                removed += 1;
                info!(
                    session = %session.name,
                    idle_secs = age.as_secs(),
                    "removed stale session"
                );
            }
            // Already gone, someone else beat us to it.
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(session = %session.name, "failed to remove stale session: {err}");
            }
        }
    }

    removed
}
