//! Completed research sections.

use serde::{Deserialize, Serialize};

/// Lifecycle of one section during plan execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SectionStatus {
    Pending,
    Running,
    Completed,
}

/// One unit of analysis produced during plan execution.
///
/// Engine-local state: sections are not persisted with the session; the
/// equivalent assistant message is what survives. A failed backend call
/// still yields a `Completed` section whose content carries the error text;
/// the status does not track failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchSection {
    pub id: String,
    pub title: String,
    pub content: String,
    pub status: SectionStatus,
    pub order: usize,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub search_queries: Vec<String>,
}
