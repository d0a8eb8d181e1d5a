//! Debounced write-back worker for the provenance store.
//!
//! Mutations never write the store file directly; they send a request here.
//! Each scheduled request restarts a quiet-period timer, so a burst of
//! mutations collapses into one full-snapshot write after the burst ends.
//! Only the state current at write time reaches disk; intermediate states
//! within a window are not persisted.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use super::index::OriginIndex;
use super::persist;

/// Request accepted by the flush worker.
pub(super) enum FlushRequest {
    /// Debounced flush: (re)start the quiet-period timer.
    Schedule,
    /// Flush right away and acknowledge; used before process exit.
    Immediate(oneshot::Sender<()>),
}

/// Runs the serial flush loop. Spawn with `tokio::spawn`; the loop exits once
/// the last sender is dropped, flushing still-pending state on the way out.
pub(super) async fn run_flush_loop(
    mut rx: mpsc::UnboundedReceiver<FlushRequest>,
    index: Arc<Mutex<OriginIndex>>,
    store_path: PathBuf,
    delay: Duration,
) {
    while let Some(request) = rx.recv().await {
        let mut acks = Vec::new();
        match request {
            FlushRequest::Immediate(ack) => acks.push(ack),
            FlushRequest::Schedule => loop {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => break,
                    next = rx.recv() => match next {
                        // Another mutation inside the window: restart it.
                        Some(FlushRequest::Schedule) => continue,
                        Some(FlushRequest::Immediate(ack)) => {
                            acks.push(ack);
                            break;
                        }
                        // Store dropped: write what is pending, then exit.
                        None => break,
                    },
                }
            },
        }

        flush_once(&index, &store_path);
        for ack in acks {
            let _ = ack.send(());
        }
    }
}

/// Copy the index under its lock, release, then write outside the lock so
/// disk I/O never blocks store mutations.
fn flush_once(index: &Mutex<OriginIndex>, store_path: &Path) {
    let snapshot = index.lock().unwrap().snapshot();
    let count = snapshot.len();
    match persist::write_snapshot(store_path, &snapshot) {
        Ok(()) => {
            tracing::debug!(count, path = %store_path.display(), "provenance store flushed");
        }
        // The in-memory index stays authoritative; any later mutation
        // rewrites the whole snapshot and so retries this write.
        Err(err) => tracing::warn!("provenance flush failed: {err:#}"),
    }
}
