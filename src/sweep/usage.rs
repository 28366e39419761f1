use std::io;
use std::path::Path;

use tokio::fs::read_dir;
use tracing::warn;

/// Total bytes occupied by regular files under `root`, recursively.
///
/// This is the building block both eviction strategies lean on, so it never
/// fails: a missing root counts as 0, an entry that vanishes or cannot be
/// stat'd mid-scan contributes 0, and a directory that cannot be read is
/// logged and skipped, keeping the partial sum accumulated so far.
pub async fn dir_size(root: &Path) -> u64 {
    let mut total: u64 = 0;
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = match read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
            Err(err) => {
                warn!("failed to read directory {}: {err}", dir.display());
                continue;
            }
        };

        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    // file_type on the dir entry does not follow symlinks,
                    // so a link out of the tree is never traversed.
                    let Ok(file_type) = entry.file_type().await else {
                        continue;
                    };
                    if file_type.is_dir() {
                        pending.push(entry.path());
                    } else if file_type.is_file() {
                        if let Ok(meta) = entry.metadata().await {
                            total += meta.len();
                        }
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    warn!("failed to walk directory {}: {err}", dir.display());
                    break;
                }
            }
        }
    }

    total
}
