//! Data-directory layout.
//!
//! ```text
//! ~/.redpill/
//! ├── config.toml
//! ├── store/
//! │   ├── chat-history-<project>.json
//! │   └── memos-<project>.json
//! └── logs/
//!     └── redpill.log
//! ```

use anyhow::{Context, Result};
use std::path::PathBuf;

pub struct RedpillPaths;

impl RedpillPaths {
    /// The application data directory (`~/.redpill`).
    pub fn data_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home.join(".redpill"))
    }

    /// Where the key-value store keeps its files.
    pub fn store_dir() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("store"))
    }

    /// The config file path.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("config.toml"))
    }

    /// The CLI's own log file, consumed by the `logs` subcommand.
    pub fn log_file() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("logs").join("redpill.log"))
    }
}
