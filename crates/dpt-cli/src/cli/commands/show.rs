//! `dpt show <file>` – print the recorded origin host of a file.

use dpt_core::store::ProvenanceStore;

pub fn run_show(store: &ProvenanceStore, file: &str) {
    match store.get_host(file) {
        Some(host) => println!("{host}"),
        None => println!("No origin recorded for {file}"),
    }
}
