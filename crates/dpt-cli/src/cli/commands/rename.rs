//! `dpt rename <old> <new>` – move a recorded origin to the file's new name.

use dpt_core::store::ProvenanceStore;

pub fn run_rename(store: &ProvenanceStore, old: &str, new: &str) {
    let was_known = store.knows_file(old);
    store.transfer(old, new);
    if was_known {
        println!("{old} -> {new}");
    } else {
        println!("No origin recorded for {old}");
    }
}
