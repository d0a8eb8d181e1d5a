//! `dpt list` – show all recorded origins.

use anyhow::Result;
use dpt_core::store::ProvenanceStore;
use serde::Serialize;

/// One listing row; serialized as-is for `--json`.
#[derive(Debug, Serialize)]
struct OriginRow<'a> {
    file: &'a str,
    host: &'a str,
}

pub fn run_list(store: &ProvenanceStore, json: bool) -> Result<()> {
    let entries = store.entries();
    if json {
        let rows: Vec<OriginRow> = entries
            .iter()
            .map(|(file, host)| OriginRow { file, host })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No origins recorded.");
    } else {
        println!("{:<40} {}", "FILE", "HOST");
        for (file, host) in entries {
            println!("{file:<40} {host}");
        }
    }
    Ok(())
}
