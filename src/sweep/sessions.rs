use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tokio::fs::read_dir;
use tracing::{info, warn};

/// One session directory under the upload root, the unit of eviction.
#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub path: PathBuf,
    pub name: String,
    /// Last-modified time of the directory, used as the age proxy.
    /// Access time is not reliable across platforms, mtime is.
    pub modified: SystemTime,
}

/// List the immediate child directories of `root`, oldest-modified first.
///
/// Every oldest-first deletion decision in a sweep routes through this one
/// sorted view, so both strategies agree on eviction order. Entries that
/// cannot be stat'd between listing and inspection are dropped; a missing or
/// unlistable root degrades to an empty list.
pub async fn list_sessions(root: &Path) -> Vec<SessionEntry> {
    let mut entries = match read_dir(root).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            info!(
                "upload root {} does not exist yet, nothing to clean",
                root.display()
            );
            return Vec::new();
        }
        Err(err) => {
            warn!("failed to list upload root {}: {err}", root.display());
            return Vec::new();
        }
    };

    let mut sessions = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(err) => {
                warn!("failed to walk upload root {}: {err}", root.display());
                break;
            }
        };

        // The entry may have been deleted since the listing; skip quietly.
        let Ok(meta) = entry.metadata().await else {
            continue;
        };
        if !meta.is_dir() {
            continue;
        }
        let Ok(modified) = meta.modified() else {
            continue;
        };

        sessions.push(SessionEntry {
            path: entry.path(),
            name: entry.file_name().to_string_lossy().into_owned(),
            modified,
        });
    }

    sessions.sort_by_key(|session| session.modified);
    sessions
}
