//! Session lifecycle and message dispatch.

use super::event::SessionEvent;
use super::message::{Message, MessageKind, Sender};
use super::model::{OpenOptions, Session};
use super::store::SessionStore;
use crate::backend::{ChatBackend, ChatRequest, HistoryEntry};
use crate::config::ResearchConfig;
use crate::error::{RedpillError, Result};
use crate::memo::{Memo, MemoStore};
use crate::storage::KeyValueStore;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Fixed assistant reply substituted for any backend failure in the chat
/// path. Failures never surface as errors to the conversation.
pub const APOLOGY: &str =
    "I'm sorry, I couldn't reach the research backend just now. Please try again in a moment.";

/// Drives the current session: opening, message dispatch, history browsing,
/// and memo capture.
///
/// Operations on one controller are serialized by `&mut self`. Across
/// processes the stored state is last-write-wins (save-after-mutate, no
/// locking).
pub struct SessionController {
    store: SessionStore,
    memos: MemoStore,
    backend: Arc<dyn ChatBackend>,
    events: broadcast::Sender<SessionEvent>,
    current: Option<Session>,
    context_window: usize,
}

impl SessionController {
    pub fn new(
        kv: Arc<dyn KeyValueStore>,
        backend: Arc<dyn ChatBackend>,
        config: &ResearchConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            store: SessionStore::new(kv.clone()).with_cap(config.session_cap),
            memos: MemoStore::new(kv),
            backend,
            events,
            current: None,
            context_window: config.context_window,
        }
    }

    /// Subscribes to session events (memo saved, research completed, ...).
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// The active session, if any.
    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Opens a fresh session for a project, replacing any current one.
    ///
    /// Reopening always starts fresh: prior sessions stay browsable through
    /// [`Self::history`] but are never auto-resumed or merged.
    pub async fn open(&mut self, options: OpenOptions) -> Result<&Session> {
        let session = Session::open(options);
        self.store.save(&session).await?;
        self.emit(SessionEvent::SessionOpened {
            session_id: session.id.clone(),
            project_id: session.project_id.clone(),
        });
        tracing::info!(session_id = %session.id, project_id = %session.project_id, "session opened");
        self.current = Some(session);
        Ok(self.current.as_ref().unwrap())
    }

    /// Sends a user message and appends the assistant reply.
    ///
    /// No-op (`Ok(None)`) when there is no active session or the content is
    /// blank - no persisted change, no error. On any backend failure the
    /// fixed [`APOLOGY`] is appended instead of propagating the error.
    pub async fn send_message(&mut self, content: &str) -> Result<Option<Message>> {
        let content = content.trim();
        if content.is_empty() || self.current.is_none() {
            return Ok(None);
        }

        let session = self.current.as_mut().unwrap();
        // Context is the trailing slice of messages prior to this one.
        let history: Vec<HistoryEntry> = session
            .trailing(self.context_window)
            .iter()
            .map(HistoryEntry::from)
            .collect();
        session.push(Message::new(Sender::User, content));
        let request = ChatRequest {
            message: content.to_string(),
            project_id: session.project_id.clone(),
            project_type: session.project_type.clone(),
            conversation_history: history,
            context_directories: Vec::new(),
        };
        let session_snapshot = session.clone();
        self.store.save(&session_snapshot).await?;

        let reply = match self.backend.chat(&request).await {
            Ok(reply) if reply.is_success() => reply.content,
            Ok(reply) => {
                tracing::warn!(content = %reply.content, "backend reported failure");
                APOLOGY.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "chat request failed");
                APOLOGY.to_string()
            }
        };

        let message = Message::new(Sender::Ai, reply);
        let session = self.current.as_mut().unwrap();
        session.push(message.clone());
        let session_snapshot = session.clone();
        self.store.save(&session_snapshot).await?;
        Ok(Some(message))
    }

    /// Appends a user message without dispatching it to the backend.
    ///
    /// The research flow records the query this way; the templated plan
    /// request is the only backend call it makes. Same no-op rules as
    /// [`Self::send_message`].
    pub async fn record_user_message(&mut self, content: &str) -> Result<()> {
        let content = content.trim();
        if content.is_empty() || self.current.is_none() {
            return Ok(());
        }
        let session = self.current.as_mut().unwrap();
        session.push(Message::new(Sender::User, content));
        let snapshot = session.clone();
        self.store.save(&snapshot).await
    }

    /// Appends an assistant message of the given kind and persists.
    ///
    /// Used by the research engine so sections survive session persistence.
    pub(crate) async fn append_assistant(
        &mut self,
        content: impl Into<String>,
        kind: MessageKind,
    ) -> Result<()> {
        let session = self
            .current
            .as_mut()
            .ok_or_else(|| RedpillError::not_found("session", "active"))?;
        session.push(Message::assistant(content, kind));
        let snapshot = session.clone();
        self.store.save(&snapshot).await
    }

    /// Browses a project's stored sessions, most recent first.
    ///
    /// Lenient: unreadable stored state yields an empty list.
    pub async fn history(&self, project_id: &str) -> Vec<Session> {
        self.store.history(project_id).await
    }

    /// Replaces the active session with a stored one (no merge).
    pub async fn load(&mut self, project_id: &str, session_id: &str) -> Result<&Session> {
        let session = self
            .store
            .find(project_id, session_id)
            .await
            .ok_or_else(|| RedpillError::not_found("session", session_id))?;
        self.current = Some(session);
        Ok(self.current.as_ref().unwrap())
    }

    /// Saves a memo for the active session's project and announces it.
    pub async fn save_memo(&mut self, content: &str, title: Option<String>) -> Result<Memo> {
        let session = self
            .current
            .as_ref()
            .ok_or_else(|| RedpillError::not_found("session", "active"))?;
        let memo = Memo::new(
            session.project_id.clone(),
            content,
            title,
            Some(session.id.clone()),
        );
        self.memos.append(&memo).await?;
        self.emit(SessionEvent::MemoSaved {
            memo_id: memo.id.clone(),
            project_id: memo.project_id.clone(),
        });
        Ok(memo)
    }

    /// Lists the active project's memos.
    pub async fn memos(&self, project_id: &str) -> Vec<Memo> {
        self.memos.list(project_id).await
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        // No subscribers is fine; events are best-effort.
        let _ = self.events.send(event);
    }
}
