//! Command handlers, one module per subcommand.

pub mod keys;
pub mod logs;
pub mod market;
pub mod oneshot;
pub mod portfolio;
pub mod setup;
pub mod start;
pub mod status;

use anyhow::Result;
use redpill_backend::HttpChatBackend;
use redpill_core::backend::ChatBackend;
use redpill_core::config::Config;
use redpill_core::session::{OpenOptions, SessionController};
use redpill_core::storage::KeyValueStore;
use redpill_infrastructure::{config_service, FileKeyValueStore};
use std::sync::Arc;

const DEFAULT_PROJECT: &str = "general";

/// Shared wiring for every subcommand: loaded config, the backend client,
/// the file store, and the resolved project.
pub struct CliContext {
    pub config: Config,
    pub backend: Arc<HttpChatBackend>,
    pub kv: Arc<FileKeyValueStore>,
    pub project_id: String,
}

impl CliContext {
    pub async fn load(project: &Option<String>) -> Result<Self> {
        let config = config_service::load_default().await?;
        let backend = Arc::new(HttpChatBackend::from_config(&config));
        let kv = Arc::new(FileKeyValueStore::default_location().await?);
        let project_id = project
            .clone()
            .or_else(|| config.default_project.clone())
            .unwrap_or_else(|| DEFAULT_PROJECT.to_string());
        tracing::debug!(project_id = %project_id, backend = %backend.base_url(), "cli context loaded");
        Ok(Self {
            config,
            backend,
            kv,
            project_id,
        })
    }

    pub fn open_options(&self) -> OpenOptions {
        let project_type = if self.project_id == DEFAULT_PROJECT {
            DEFAULT_PROJECT.to_string()
        } else {
            "company".to_string()
        };
        OpenOptions {
            project_id: self.project_id.clone(),
            project_type,
            project_name: self.project_id.clone(),
        }
    }

    pub fn controller(&self) -> SessionController {
        let kv: Arc<dyn KeyValueStore> = self.kv.clone();
        let backend: Arc<dyn ChatBackend> = self.backend.clone();
        SessionController::new(kv, backend, &self.config.research)
    }
}
