//! Config file load/save.
//!
//! A missing file yields defaults; environment overrides are applied after
//! loading in either case.

use anyhow::{Context, Result};
use redpill_core::config::Config;
use std::path::Path;
use tokio::fs;

/// Loads the config from `path`, falling back to defaults when the file
/// does not exist. Env overrides always apply.
pub async fn load(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let config = match fs::read_to_string(path).await {
        Ok(raw) => toml::from_str(&raw).context(format!("Invalid config file: {:?}", path))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = ?path, "no config file, using defaults");
            Config::default()
        }
        Err(e) => return Err(e).context(format!("Failed to read config file: {:?}", path)),
    };
    Ok(config.with_env_overrides())
}

/// Loads from the default location (`~/.redpill/config.toml`).
pub async fn load_default() -> Result<Config> {
    load(crate::paths::RedpillPaths::config_file()?).await
}

/// Writes the config to `path`, creating parent directories.
pub async fn save(path: impl AsRef<Path>, config: &Config) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .context("Failed to create config directory")?;
    }
    let raw = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(path, raw)
        .await
        .context(format!("Failed to write config file: {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load(temp_dir.path().join("config.toml")).await.unwrap();
        assert_eq!(config.backend_url, redpill_core::config::DEFAULT_BACKEND_URL);
    }

    #[tokio::test]
    async fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.backend_url = "https://api.redpill.example".to_string();
        config.default_project = Some("acme".to_string());
        save(&path, &config).await.unwrap();

        let loaded = load(&path).await.unwrap();
        assert_eq!(loaded.backend_url, "https://api.redpill.example");
        assert_eq!(loaded.default_project.as_deref(), Some("acme"));
    }

    #[tokio::test]
    async fn test_invalid_toml_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        tokio::fs::write(&path, "backend_url = [not toml").await.unwrap();
        assert!(load(&path).await.is_err());
    }
}
