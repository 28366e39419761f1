use std::io;
use std::path::Path;

use tokio::fs::remove_dir_all;
use tracing::{info, warn};

use crate::sweep::sessions::SessionEntry;
use crate::sweep::usage::dir_size;

/// Evict oldest sessions until total usage drops to `proactive_bytes`.
///
/// The whole tree is measured once up front; after each successful removal
/// the running total is decremented by that session's own measured size
/// instead of rescanning the root. A session whose removal fails reduces
/// nothing and the loop moves on to the next-oldest candidate, so a stuck
/// directory never stalls eviction of everything newer than it, and order
/// stays oldest-first even under partial failure. Returns the number
/// evicted.
pub async fn evict_to_threshold(
    root: &Path,
    sessions: &[SessionEntry],
    proactive_bytes: u64,
) -> usize {
    let mut usage = dir_size(root).await;
    if usage <= proactive_bytes {
        return 0;
    }

    info!(
        used_bytes = usage,
        threshold_bytes = proactive_bytes,
        "storage over proactive threshold, evicting oldest sessions"
    );

    let mut evicted = 0;
    for session in sessions {
        if usage <= proactive_bytes {
            break;
        }

        let session_bytes = dir_size(&session.path).await;
        match remove_dir_all(&session.path).await {
            Ok(()) => {
                evicted += 1;
                usage = usage.saturating_sub(session_bytes);
                info!(
                    session = %session.name,
                    freed_bytes = session_bytes,
                    "evicted session over capacity"
                );
            }
            // Removed by retention or vanished on its own; it no longer
            // occupies anything, so there is no size to credit either.
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(session = %session.name, "failed to evict session: {err}");
            }
        }
    }

    evicted
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::tempdir;

    async fn session_with_size(
        root: &Path,
        name: &str,
        seconds_ago: u64,
        bytes: usize,
    ) -> SessionEntry {
        let path = root.join(name);
        tokio::fs::create_dir(&path).await.unwrap();
        tokio::fs::write(path.join("upload.png"), vec![0u8; bytes])
            .await
            .unwrap();
        SessionEntry {
            path,
            name: name.to_string(),
            modified: SystemTime::now() - Duration::from_secs(seconds_ago),
        }
    }

    #[tokio::test]
    async fn noop_when_under_threshold() {
        let root = tempdir().unwrap();
        let sessions = vec![
            session_with_size(root.path(), "a", 300, 100).await,
            session_with_size(root.path(), "b", 200, 200).await,
        ];

        // usage 300 bytes, threshold 400 bytes
        let evicted = evict_to_threshold(root.path(), &sessions, 400).await;
        assert_eq!(evicted, 0);
        assert!(root.path().join("a").exists());
        assert!(root.path().join("b").exists());
    }

    #[tokio::test]
    async fn stops_as_soon_as_threshold_is_reached() {
        let root = tempdir().unwrap();
        // usage 450, threshold 400: removing the oldest 60-byte session is
        // enough (450 - 60 = 390), the other two must survive.
        let sessions = vec![
            session_with_size(root.path(), "oldest", 900, 60).await,
            session_with_size(root.path(), "middle", 600, 40).await,
            session_with_size(root.path(), "newest", 300, 350).await,
        ];

        let evicted = evict_to_threshold(root.path(), &sessions, 400).await;
        assert_eq!(evicted, 1);
        assert!(!root.path().join("oldest").exists());
        assert!(root.path().join("middle").exists());
        assert!(root.path().join("newest").exists());
    }

    #[tokio::test]
    async fn evicts_strictly_oldest_first() {
        let root = tempdir().unwrap();
        let sessions = vec![
            session_with_size(root.path(), "first", 900, 100).await,
            session_with_size(root.path(), "second", 600, 100).await,
            session_with_size(root.path(), "third", 300, 100).await,
        ];

        // usage 300, threshold 150: two oldest go, the newest stays.
        let evicted = evict_to_threshold(root.path(), &sessions, 150).await;
        assert_eq!(evicted, 2);
        assert!(!root.path().join("first").exists());
        assert!(!root.path().join("second").exists());
        assert!(root.path().join("third").exists());
    }

    #[tokio::test]
    async fn vanished_candidate_does_not_block_newer_ones() {
        let root = tempdir().unwrap();
        let ghost = SessionEntry {
            path: root.path().join("ghost"),
            name: "ghost".to_string(),
            modified: SystemTime::now() - Duration::from_secs(1200),
        };
        let sessions = vec![
            ghost,
            session_with_size(root.path(), "heavy", 600, 500).await,
        ];

        // usage 500, threshold 100: the ghost yields nothing, the heavy
        // session behind it must still be evicted.
        let evicted = evict_to_threshold(root.path(), &sessions, 100).await;
        assert_eq!(evicted, 1);
        assert!(!root.path().join("heavy").exists());
    }

    #[tokio::test]
    async fn failed_removal_gets_no_credit_and_does_not_block_newer_sessions() {
        let root = tempdir().unwrap();
        // A plain file in place of the oldest session makes remove_dir_all
        // fail with a real error (not NotFound), standing in for a locked
        // or unreadable directory without depending on process privileges.
        let stuck_path = root.path().join("stuck");
        tokio::fs::write(&stuck_path, vec![0u8; 50]).await.unwrap();
        let stuck = SessionEntry {
            path: stuck_path.clone(),
            name: "stuck".to_string(),
            modified: SystemTime::now() - Duration::from_secs(1200),
        };
        let sessions = vec![
            stuck,
            session_with_size(root.path(), "older", 900, 300).await,
            session_with_size(root.path(), "newer", 300, 300).await,
        ];

        // usage 650, threshold 400: the stuck entry frees nothing, so the
        // next-oldest real session must still go (650 - 300 = 350).
        let evicted = evict_to_threshold(root.path(), &sessions, 400).await;

        assert_eq!(evicted, 1);
        assert!(stuck_path.exists());
        assert!(!root.path().join("older").exists());
        assert!(root.path().join("newer").exists());
    }

    #[tokio::test]
    async fn exhausts_the_list_when_threshold_is_unreachable() {
        let root = tempdir().unwrap();
        let sessions = vec![
            session_with_size(root.path(), "a", 900, 100).await,
            session_with_size(root.path(), "b", 600, 100).await,
        ];
        // Stray file at the root keeps usage above zero forever.
        tokio::fs::write(root.path().join("stray.dat"), vec![0u8; 50])
            .await
            .unwrap();

        let evicted = evict_to_threshold(root.path(), &sessions, 10).await;
        assert_eq!(evicted, 2);
    }
}
