//! Store file I/O: read, write, and remove the persisted snapshot.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::codec;

/// Default path for the persisted store file: `~/.local/state/dpt/origins.txt`.
pub(super) fn default_store_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dpt")?;
    Ok(xdg_dirs.get_state_home().join("origins.txt"))
}

/// Write a full snapshot, overwriting prior contents (creates parent dirs).
pub(super) fn write_snapshot(path: &Path, entries: &[(String, String)]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir: {}", parent.display()))?;
    }
    std::fs::write(path, codec::encode(entries))
        .with_context(|| format!("write provenance store: {}", path.display()))?;
    Ok(())
}

/// Read and decode the persisted snapshot. A missing file is `Ok(None)`.
pub(super) fn read_snapshot(path: &Path) -> Result<Option<Vec<(String, String)>>> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("read provenance store: {}", path.display()))
        }
    };
    Ok(Some(codec::decode(&text)))
}

/// Delete the persisted snapshot; a file that is already gone is fine.
pub(super) fn remove_snapshot(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("remove provenance store: {}", path.display())),
    }
}
