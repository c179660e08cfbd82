//! Application configuration model.
//!
//! The config file lives at `~/.redpill/config.toml` and is loaded by the
//! infrastructure layer. Environment variables take priority over the file:
//! `REDPILL_BACKEND_URL` and `REDPILL_API_KEY`.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Number of trailing messages sent as conversation context with each chat
/// request.
pub const DEFAULT_CONTEXT_WINDOW: usize = 10;

/// Maximum number of sessions retained per project; oldest evicted first.
pub const DEFAULT_SESSION_CAP: usize = 20;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the research backend.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Optional bearer token for the backend.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Default project the CLI operates on when `--project` is not given.
    #[serde(default)]
    pub default_project: Option<String>,
    #[serde(default)]
    pub research: ResearchConfig,
}

/// Pacing and retention knobs for the research flow.
///
/// Delays are pacing, not backpressure. Tests set them to zero.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ResearchConfig {
    /// Delay per declared search query, in milliseconds.
    #[serde(default = "default_search_delay_ms")]
    pub search_delay_ms: u64,
    /// Pause between sections, in milliseconds.
    #[serde(default = "default_section_pause_ms")]
    pub section_pause_ms: u64,
    /// Trailing messages sent as chat context.
    #[serde(default = "default_context_window")]
    pub context_window: usize,
    /// Sessions retained per project.
    #[serde(default = "default_session_cap")]
    pub session_cap: usize,
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_search_delay_ms() -> u64 {
    800
}

fn default_section_pause_ms() -> u64 {
    1000
}

fn default_context_window() -> usize {
    DEFAULT_CONTEXT_WINDOW
}

fn default_session_cap() -> usize {
    DEFAULT_SESSION_CAP
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            api_key: None,
            default_project: None,
            research: ResearchConfig::default(),
        }
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            search_delay_ms: default_search_delay_ms(),
            section_pause_ms: default_section_pause_ms(),
            context_window: default_context_window(),
            session_cap: default_session_cap(),
        }
    }
}

impl Config {
    /// Applies environment variable overrides on top of the loaded values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("REDPILL_BACKEND_URL") {
            if !url.trim().is_empty() {
                self.backend_url = url;
            }
        }
        if let Ok(key) = std::env::var("REDPILL_API_KEY") {
            if !key.trim().is_empty() {
                self.api_key = Some(key);
            }
        }
        self
    }
}
