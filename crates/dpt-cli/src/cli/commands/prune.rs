//! `dpt prune` – reconcile the store against the download directory.
//!
//! Reconciliation already ran when the store was opened; this command exists
//! so the cleanup (and its flush) can be triggered explicitly, e.g. from a
//! cron job after bulk deletions.

use dpt_core::store::ProvenanceStore;

pub fn run_prune(store: &ProvenanceStore) {
    let entries = store.entries();
    println!(
        "{} origin(s) tracked in {}",
        entries.len(),
        store.download_dir().display()
    );
}
