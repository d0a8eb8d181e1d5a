use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Global configuration loaded from `~/.config/dpt/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DptConfig {
    /// Directory whose downloads are tracked. Defaults to `$HOME/Downloads`.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    /// Override for the persisted store file (default: XDG state dir).
    #[serde(default)]
    pub store_file: Option<PathBuf>,
    /// Debounce window for store write-back, in milliseconds. Bursts of
    /// mutations closer together than this collapse into one write.
    pub flush_delay_ms: u64,
}

impl Default for DptConfig {
    fn default() -> Self {
        Self {
            download_dir: None,
            store_file: None,
            flush_delay_ms: 2000,
        }
    }
}

impl DptConfig {
    /// Debounce window as a `Duration`.
    pub fn flush_delay(&self) -> Duration {
        Duration::from_millis(self.flush_delay_ms)
    }

    /// Download directory: the configured value, else `$HOME/Downloads`.
    pub fn resolve_download_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.download_dir {
            return Ok(dir.clone());
        }
        let home =
            std::env::var_os("HOME").context("HOME is not set and no download_dir is configured")?;
        Ok(PathBuf::from(home).join("Downloads"))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dpt")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<DptConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = DptConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: DptConfig = toml::from_str(&data)?;
    Ok(cfg)
}
