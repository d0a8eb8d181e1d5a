//! `dpt add <host> <file>` – record which host supplied a downloaded file.

use dpt_core::store::ProvenanceStore;

/// Records the origin. First write wins, so when an origin is already on
/// record the existing one is reported instead.
pub fn run_add(store: &ProvenanceStore, host: &str, file: &str) {
    store.add(host, file);
    match store.get_host(file) {
        Some(recorded) => println!("{file}: {recorded}"),
        None => println!("{file}: not recorded (file not in download directory?)"),
    }
}
