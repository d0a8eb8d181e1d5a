//! CLI for the DPT download origin tracker.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dpt_core::config;
use dpt_core::store::ProvenanceStore;
use std::path::PathBuf;

use commands::{run_add, run_list, run_prune, run_remove, run_rename, run_show};

/// Top-level CLI for the DPT download origin tracker.
#[derive(Debug, Parser)]
#[command(name = "dpt")]
#[command(about = "DPT: provenance store for downloaded files", long_about = None)]
pub struct Cli {
    /// Track this directory instead of the configured download directory.
    #[arg(long, global = true, value_name = "DIR")]
    pub download_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Record which host supplied a downloaded file.
    Add {
        /// Host the file was downloaded from (e.g. example.com).
        host: String,
        /// File name inside the download directory.
        file: String,
    },

    /// Forget a file that was deleted from the download directory.
    Remove {
        /// File name to forget.
        file: String,
    },

    /// Follow a rename: move a file's recorded origin to its new name.
    Rename {
        /// Previous file name.
        old: String,
        /// New file name.
        new: String,
    },

    /// Show the recorded origin host of a file.
    Show {
        /// File name to look up.
        file: String,
    },

    /// List all recorded origins.
    List {
        /// Emit the listing as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Reconcile against the download directory and persist the result.
    Prune,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        if cli.download_dir.is_some() {
            cfg.download_dir = cli.download_dir;
        }

        // Every invocation is short-lived: reconcile first, flush before exit
        // (a debounce window would outlive the process).
        let store = ProvenanceStore::open_default(&cfg)?;
        store.wait_ready().await;

        let mutated = match cli.command {
            CliCommand::Add { host, file } => {
                run_add(&store, &host, &file);
                true
            }
            CliCommand::Remove { file } => {
                run_remove(&store, &file);
                true
            }
            CliCommand::Rename { old, new } => {
                run_rename(&store, &old, &new);
                true
            }
            CliCommand::Show { file } => {
                run_show(&store, &file);
                false
            }
            CliCommand::List { json } => {
                run_list(&store, json)?;
                false
            }
            CliCommand::Prune => {
                run_prune(&store);
                true
            }
        };

        // Mutating commands must not exit inside the debounce window.
        if mutated {
            store.flush_now().await;
        }
        Ok(())
    }
}
