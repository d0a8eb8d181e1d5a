//! Startup reconciliation: load the persisted snapshot, then drop entries
//! whose files no longer exist in the download directory.
//!
//! Runs once, spawned at store construction. Callers may race ahead and use
//! the store before this finishes; see the accepted-race note on
//! [`super::ProvenanceStore`].

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use super::flush::FlushRequest;
use super::persist;
use super::StoreInner;

pub(super) async fn run_reconcile(inner: Arc<StoreInner>) {
    // Load whatever survived the last run. Unreadable state is the same as
    // no state; the store is a best-effort cache.
    match persist::read_snapshot(&inner.store_path) {
        Ok(Some(entries)) => {
            let count = entries.len();
            inner.index.lock().unwrap().replace(entries);
            tracing::debug!(count, "provenance store loaded");
        }
        Ok(None) => {}
        Err(err) => tracing::warn!("provenance store load failed: {err:#}"),
    }

    // Ground truth is the download directory listing.
    match list_file_names(&inner.download_dir).await {
        // Nothing on disk means nothing to remember. Deleting the store file
        // is the persistence step here; a flush would only recreate it.
        None => {
            let had_entries = {
                let mut index = inner.index.lock().unwrap();
                let count = index.len();
                index.clear();
                count > 0
            };
            if let Err(err) = persist::remove_snapshot(&inner.store_path) {
                tracing::warn!("provenance store delete failed: {err:#}");
            }
            if had_entries {
                tracing::info!("download directory is empty; dropped all provenance entries");
            }
        }
        // Drop entries for files deleted while we were not running. A cold,
        // unchanged store schedules no write at all.
        Some(live) => {
            let pruned = inner.index.lock().unwrap().prune_missing(&live);
            if pruned > 0 {
                tracing::info!(pruned, "dropped provenance entries for missing files");
                let _ = inner.flush_tx.send(FlushRequest::Schedule);
            }
        }
    }

    inner.ready_tx.send_replace(true);
}

/// Base names present in the download directory. `None` when the directory
/// is unreadable or contains nothing.
async fn list_file_names(dir: &Path) -> Option<HashSet<String>> {
    let mut read_dir = match tokio::fs::read_dir(dir).await {
        Ok(read_dir) => read_dir,
        Err(err) => {
            tracing::warn!(dir = %dir.display(), "download directory unreadable: {err}");
            return None;
        }
    };
    let mut names = HashSet::new();
    while let Ok(Some(entry)) = read_dir.next_entry().await {
        names.insert(entry.file_name().to_string_lossy().into_owned());
    }
    if names.is_empty() {
        None
    } else {
        Some(names)
    }
}
