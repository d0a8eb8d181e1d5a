//! Logging init: file under XDG state dir, or graceful fallback to stderr.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,dpt=debug"))
}

/// Open the log file under `~/.local/state/dpt/`, creating the directory.
fn open_log_file() -> Result<(Arc<fs::File>, PathBuf)> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dpt")?;
    let log_dir = xdg_dirs.get_state_home();
    fs::create_dir_all(&log_dir)?;
    let path = log_dir.join("dpt.log");
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((Arc::new(file), path))
}

/// Initialize structured logging to `~/.local/state/dpt/dpt.log`. When the
/// log file cannot be opened (e.g. state dir unwritable), falls back to
/// stderr so the process still starts.
pub fn init() {
    match open_log_file() {
        Ok((file, path)) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(file)
                .with_ansi(false)
                .init();
            tracing::info!("dpt logging initialized at {}", path.display());
        }
        Err(_) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .init();
        }
    }
}
