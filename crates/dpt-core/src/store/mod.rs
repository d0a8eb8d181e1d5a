//! Download provenance store.
//!
//! Tracks which remote host supplied each file in the download directory: an
//! in-memory index behind a single mutex, persisted to a flat line-oriented
//! file with debounced write-back, and reconciled against the real directory
//! contents at startup. The store is a best-effort cache and the filesystem
//! stays authoritative, so persistence failures are logged and swallowed
//! rather than surfaced to callers.

mod codec;
mod flush;
mod index;
mod persist;
mod reconcile;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use tokio::sync::{mpsc, oneshot, watch};

use crate::config::DptConfig;
use flush::FlushRequest;
use index::OriginIndex;

struct StoreInner {
    index: Arc<Mutex<OriginIndex>>,
    download_dir: PathBuf,
    store_path: PathBuf,
    flush_tx: mpsc::UnboundedSender<FlushRequest>,
    ready_tx: watch::Sender<bool>,
}

/// Handle to the provenance store. Cheap to clone; all clones share one index
/// and one flush worker. Created once during application startup and passed
/// to every collaborator that needs it.
///
/// Construction spawns a one-time background reconciliation. Callers may use
/// the store before it finishes, in which case early mutations can be
/// replaced by the loaded snapshot; [`ProvenanceStore::wait_ready`] gates on
/// completion for callers that care.
#[derive(Clone)]
pub struct ProvenanceStore {
    inner: Arc<StoreInner>,
}

impl ProvenanceStore {
    /// Open the store with paths resolved from config. Must be called from
    /// within a tokio runtime (background tasks are spawned here).
    pub fn open_default(cfg: &DptConfig) -> Result<Self> {
        let download_dir = cfg.resolve_download_dir()?;
        let store_path = match &cfg.store_file {
            Some(path) => path.clone(),
            None => persist::default_store_path()?,
        };
        Ok(Self::open_at(download_dir, store_path, cfg.flush_delay()))
    }

    /// Open the store over explicit paths. Intended for tests so both the
    /// download directory and the store file can live in a temp directory.
    pub fn open_at(
        download_dir: impl AsRef<Path>,
        store_path: impl AsRef<Path>,
        flush_delay: Duration,
    ) -> Self {
        let index = Arc::new(Mutex::new(OriginIndex::default()));
        let store_path = store_path.as_ref().to_path_buf();
        let (flush_tx, flush_rx) = mpsc::unbounded_channel();
        let (ready_tx, _) = watch::channel(false);

        tokio::spawn(flush::run_flush_loop(
            flush_rx,
            Arc::clone(&index),
            store_path.clone(),
            flush_delay,
        ));

        let inner = Arc::new(StoreInner {
            index,
            download_dir: download_dir.as_ref().to_path_buf(),
            store_path,
            flush_tx,
            ready_tx,
        });
        tokio::spawn(reconcile::run_reconcile(Arc::clone(&inner)));

        Self { inner }
    }

    /// Record that `file_name` (a base name, not a path) was supplied by
    /// `host`.
    ///
    /// Ignored when either argument is empty, when the file is not currently
    /// in the download directory, or when an origin is already recorded.
    /// First write wins: a later unrelated write under the same name cannot
    /// clobber the original file's provenance.
    pub fn add(&self, host: &str, file_name: &str) {
        if host.is_empty() || file_name.is_empty() {
            tracing::debug!("ignoring provenance add with empty host or file name");
            return;
        }
        if !self.inner.download_dir.join(file_name).exists() {
            tracing::debug!(file_name, "ignoring provenance add for nonexistent file");
            return;
        }
        let inserted = self.inner.index.lock().unwrap().insert_new(file_name, host);
        if inserted {
            tracing::debug!(file_name, host, "provenance recorded");
            self.schedule_flush();
        } else {
            tracing::debug!(file_name, "provenance already recorded; keeping first origin");
        }
    }

    /// Forget `file_name` after it was deleted from the download directory.
    ///
    /// Rejected while the file still exists on disk: the entry would still
    /// describe a valid file, and dropping it loses provenance for nothing.
    pub fn remove(&self, file_name: &str) {
        if self.inner.download_dir.join(file_name).exists() {
            tracing::warn!(file_name, "refusing to forget provenance of an existing file");
            return;
        }
        let removed = self.inner.index.lock().unwrap().remove(file_name);
        if removed {
            tracing::debug!(file_name, "provenance forgotten");
            self.schedule_flush();
        }
    }

    /// Follow a rename: move the entry for `old_name` to `new_name`,
    /// preserving the recorded host. No-op when `old_name` is unknown.
    pub fn transfer(&self, old_name: &str, new_name: &str) {
        let moved = self.inner.index.lock().unwrap().rename(old_name, new_name);
        if moved {
            tracing::debug!(old_name, new_name, "provenance transferred");
            self.schedule_flush();
        }
    }

    /// Host that supplied `file_name`, if recorded.
    pub fn get_host(&self, file_name: &str) -> Option<String> {
        self.inner
            .index
            .lock()
            .unwrap()
            .get(file_name)
            .map(str::to_string)
    }

    /// Whether an origin is recorded for `file_name`.
    pub fn knows_file(&self, file_name: &str) -> bool {
        self.inner.index.lock().unwrap().contains(file_name)
    }

    /// Sorted point-in-time copy of all entries.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.inner.index.lock().unwrap().snapshot()
    }

    /// Wait until startup reconciliation has completed.
    pub async fn wait_ready(&self) {
        let mut ready_rx = self.inner.ready_tx.subscribe();
        while !*ready_rx.borrow_and_update() {
            if ready_rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Flush the current state now, bypassing the debounce window. Needed by
    /// short-lived processes that would otherwise exit inside the window;
    /// long-lived embedders can rely on the debounced write-back alone.
    pub async fn flush_now(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self
            .inner
            .flush_tx
            .send(FlushRequest::Immediate(ack_tx))
            .is_err()
        {
            return;
        }
        let _ = ack_rx.await;
    }

    fn schedule_flush(&self) {
        let _ = self.inner.flush_tx.send(FlushRequest::Schedule);
    }

    /// Path of the persisted store file.
    pub fn store_path(&self) -> &Path {
        &self.inner.store_path
    }

    /// Download directory this store reconciles against.
    pub fn download_dir(&self) -> &Path {
        &self.inner.download_dir
    }
}

#[cfg(test)]
mod tests;
