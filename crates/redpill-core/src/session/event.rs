//! High-level events published by the session layer.
//!
//! Subscribers listen on a `tokio::sync::broadcast` channel; delivery is
//! best-effort and lagging receivers drop events.

use serde::{Deserialize, Serialize};

/// Events other views (REPL status line, future UIs) can react to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A new session replaced the current one.
    SessionOpened {
        session_id: String,
        project_id: String,
    },
    /// A memo was appended to the project's memo list.
    MemoSaved { memo_id: String, project_id: String },
    /// A research run finished executing all planned sections.
    ResearchCompleted {
        session_id: String,
        section_count: usize,
    },
}
