//! `dpt remove <file>` – forget a file deleted from the download directory.

use dpt_core::store::ProvenanceStore;

pub fn run_remove(store: &ProvenanceStore, file: &str) {
    let was_known = store.knows_file(file);
    store.remove(file);
    if store.knows_file(file) {
        // The store refuses while the file is still on disk.
        println!("{file} is still in the download directory; origin kept");
    } else if was_known {
        println!("Forgot {file}");
    } else {
        println!("No origin recorded for {file}");
    }
}
