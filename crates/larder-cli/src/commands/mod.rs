//! CLI subcommands.

pub mod check;
pub mod config;
pub mod merge;
pub mod suppliers;

use std::path::{Path, PathBuf};

use larder_core::{JsonStore, LarderConfig};

/// Default config file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("larder")
        .join("config.json")
}

/// Load configuration from an explicit path, the default location, or
/// defaults when no file exists.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<LarderConfig> {
    match config_path {
        Some(path) => Ok(LarderConfig::from_file(Path::new(path))?),
        None => {
            let path = default_config_path();
            if path.exists() {
                Ok(LarderConfig::from_file(&path)?)
            } else {
                Ok(LarderConfig::default())
            }
        }
    }
}

/// Open the JSON store configured for this invocation.
pub fn open_store(config: &LarderConfig, data_dir: Option<&Path>) -> JsonStore {
    let dir = data_dir.unwrap_or(&config.store.data_dir);
    JsonStore::new(dir)
}
