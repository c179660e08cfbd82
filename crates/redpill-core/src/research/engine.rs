//! Deep-research orchestration: plan proposal, approval, and sequential
//! section execution.

use super::phase::ResearchPhase;
use super::plan::ResearchPlan;
use super::section::{ResearchSection, SectionStatus};
use crate::backend::{ChatBackend, ChatRequest};
use crate::config::ResearchConfig;
use crate::error::{RedpillError, Result};
use crate::prompt;
use crate::session::{MessageKind, SessionController, SessionEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Drives the research approval flow against an active session.
///
/// Sections execute sequentially: the per-query delay and the pause between
/// sections are pacing, and a bounded-parallel variant only becomes
/// interesting once real search integration replaces the placeholder
/// lookups. Every sleep and backend call is a cancellation checkpoint, so
/// dropping the flow mid-run leaves no timers or requests behind.
pub struct ResearchEngine {
    backend: Arc<dyn ChatBackend>,
    config: ResearchConfig,
    cancel: CancellationToken,
    phase: ResearchPhase,
    sections: Vec<ResearchSection>,
}

impl ResearchEngine {
    pub fn new(backend: Arc<dyn ChatBackend>, config: ResearchConfig) -> Self {
        Self {
            backend,
            config,
            cancel: CancellationToken::new(),
            phase: ResearchPhase::Idle,
            sections: Vec::new(),
        }
    }

    pub fn phase(&self) -> &ResearchPhase {
        &self.phase
    }

    /// Sections accumulated by the most recent run.
    pub fn sections(&self) -> &[ResearchSection] {
        &self.sections
    }

    /// Token observers can fire to stop the flow at the next checkpoint.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Generates a plan for `query` and parks it for approval.
    ///
    /// One backend call; the reply's widest brace span is parsed as JSON.
    /// Any failure - request, extraction, empty plan - substitutes the
    /// canonical fallback plan rather than erroring.
    pub async fn propose(
        &mut self,
        controller: &mut SessionController,
        query: &str,
    ) -> Result<&ResearchPlan> {
        if !self.phase.is_idle() {
            return Err(RedpillError::InvalidPhase(format!(
                "cannot plan while {}",
                self.phase.label()
            )));
        }
        let session = controller
            .current()
            .ok_or_else(|| RedpillError::not_found("session", "active"))?;
        let project_id = session.project_id.clone();
        let project_type = session.project_type.clone();
        let project_name = session.project_name.clone();

        self.phase = ResearchPhase::Planning;

        let request = ChatRequest {
            message: prompt::plan_prompt(&project_name, query)?,
            project_id,
            project_type,
            conversation_history: Vec::new(),
            context_directories: Vec::new(),
        };
        let plan = match self.backend.chat(&request).await {
            Ok(reply) if reply.is_success() => {
                ResearchPlan::extract(&reply.content).unwrap_or_else(|| {
                    tracing::warn!("no usable plan in reply, using fallback");
                    ResearchPlan::fallback(&project_name)
                })
            }
            Ok(_) | Err(_) => {
                tracing::warn!("plan request failed, using fallback");
                ResearchPlan::fallback(&project_name)
            }
        };

        controller
            .append_assistant(plan.summary(), MessageKind::PlanApproval)
            .await?;
        self.phase = ResearchPhase::AwaitingApproval { plan };
        match &self.phase {
            ResearchPhase::AwaitingApproval { plan } => Ok(plan),
            _ => unreachable!(),
        }
    }

    /// Rejects the parked plan: back to idle, one clarifying message,
    /// accumulated sections untouched.
    pub async fn reject(&mut self, controller: &mut SessionController) -> Result<()> {
        if !self.phase.is_awaiting_approval() {
            return Err(RedpillError::InvalidPhase(format!(
                "no plan awaiting approval (currently {})",
                self.phase.label()
            )));
        }
        self.phase = ResearchPhase::Idle;
        controller
            .append_assistant(
                "Understood - I won't run that plan. Tell me what to focus on instead and I'll propose a new one.",
                MessageKind::Text,
            )
            .await
    }

    /// Executes the parked plan's sections sequentially.
    ///
    /// Per section: one placeholder lookup per declared search query (no
    /// real search integration on this path), then one backend call for the
    /// written analysis. Failed calls still produce a `Completed` section
    /// carrying the error text. Each completed section is mirrored into the
    /// session as an assistant message so it survives persistence.
    pub async fn approve(&mut self, controller: &mut SessionController) -> Result<()> {
        let mut plan = match std::mem::replace(&mut self.phase, ResearchPhase::Executing) {
            ResearchPhase::AwaitingApproval { plan } => plan,
            other => {
                self.phase = other;
                return Err(RedpillError::InvalidPhase(format!(
                    "no plan awaiting approval (currently {})",
                    self.phase.label()
                )));
            }
        };
        plan.approved = true;
        self.sections.clear();

        let session = controller
            .current()
            .ok_or_else(|| RedpillError::not_found("session", "active"))?;
        let session_id = session.id.clone();
        let project_id = session.project_id.clone();
        let project_type = session.project_type.clone();
        let project_name = session.project_name.clone();

        let total = plan.sections.len();
        for (order, planned) in plan.sections.iter().enumerate() {
            let mut sources = Vec::new();
            for query in &planned.search_queries {
                if self.pause(self.config.search_delay_ms).await {
                    return self.cancelled(order);
                }
                // Placeholder lookup; real search integration would land here.
                sources.push(format!("search:{}", query));
            }

            if self.cancel.is_cancelled() {
                return self.cancelled(order);
            }

            let request = ChatRequest {
                message: prompt::section_prompt(&project_name, planned)?,
                project_id: project_id.clone(),
                project_type: project_type.clone(),
                conversation_history: Vec::new(),
                context_directories: Vec::new(),
            };
            let content = match self.backend.chat(&request).await {
                Ok(reply) if reply.is_success() => reply.content,
                Ok(reply) => {
                    tracing::warn!(section = %planned.title, content = %reply.content, "section analysis unsuccessful");
                    format!("Analysis unavailable for \"{}\".", planned.title)
                }
                Err(e) => {
                    tracing::warn!(section = %planned.title, error = %e, "section analysis failed");
                    format!("Analysis unavailable for \"{}\": {}", planned.title, e)
                }
            };

            let section = ResearchSection {
                id: uuid::Uuid::new_v4().to_string(),
                title: planned.title.clone(),
                content: content.clone(),
                // Completed even on failure; the error lives in the content.
                status: SectionStatus::Completed,
                order,
                sources,
                search_queries: planned.search_queries.clone(),
            };
            self.sections.push(section);

            controller
                .append_assistant(
                    format!("## {}\n\n{}", planned.title, content),
                    MessageKind::ResearchSection,
                )
                .await?;
            tracing::info!(section = %planned.title, order, "research section completed");

            if order + 1 < total && self.pause(self.config.section_pause_ms).await {
                return self.cancelled(order + 1);
            }
        }

        self.phase = ResearchPhase::Completed;
        controller
            .append_assistant("Research complete.", MessageKind::Status)
            .await?;
        controller.emit(SessionEvent::ResearchCompleted {
            session_id,
            section_count: self.sections.len(),
        });
        // Approval-flow state clears once the completion notice is out.
        self.phase = ResearchPhase::Idle;
        Ok(())
    }

    /// Cancellable pacing sleep. Returns true when the token fired.
    async fn pause(&self, ms: u64) -> bool {
        if self.cancel.is_cancelled() {
            return true;
        }
        if ms == 0 {
            return false;
        }
        tokio::select! {
            _ = self.cancel.cancelled() => true,
            _ = tokio::time::sleep(Duration::from_millis(ms)) => false,
        }
    }

    fn cancelled(&mut self, completed: usize) -> Result<()> {
        tracing::info!(completed, "research run cancelled");
        // A fired token covers only the run it stopped; later runs get a
        // fresh one.
        self.cancel = CancellationToken::new();
        self.phase = ResearchPhase::Idle;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ChatReply;
    use crate::config::ResearchConfig;
    use crate::error::RedpillError;
    use crate::session::{OpenOptions, Sender};
    use crate::storage::MemoryKeyValueStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedBackend {
        replies: Mutex<Vec<Result<ChatReply>>>,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<Result<ChatReply>>) -> Self {
            Self {
                replies: Mutex::new(replies),
            }
        }

        fn ok(content: &str) -> Result<ChatReply> {
            Ok(ChatReply {
                content: content.to_string(),
                ..ChatReply::default()
            })
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn chat(&self, _request: &ChatRequest) -> Result<ChatReply> {
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                return Err(RedpillError::backend("no scripted reply"));
            }
            replies.remove(0)
        }
    }

    fn fast_config() -> ResearchConfig {
        ResearchConfig {
            search_delay_ms: 0,
            section_pause_ms: 0,
            ..ResearchConfig::default()
        }
    }

    async fn setup(replies: Vec<Result<ChatReply>>) -> (SessionController, ResearchEngine) {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let backend = Arc::new(ScriptedBackend::new(replies));
        let config = fast_config();
        let mut controller = SessionController::new(kv, backend.clone(), &config);
        controller
            .open(OpenOptions {
                project_id: "acme".to_string(),
                project_type: "company".to_string(),
                project_name: "Acme Robotics".to_string(),
            })
            .await
            .unwrap();
        let engine = ResearchEngine::new(backend, config);
        (controller, engine)
    }

    #[tokio::test]
    async fn test_propose_parses_plan_and_parks_it() {
        let plan_json = r#"Here you go: {"sections": [
            {"title": "Market", "description": "TAM", "searchQueries": ["q"]},
            {"title": "Team", "description": "Founders", "searchQueries": []}
        ]}"#;
        let (mut controller, mut engine) = setup(vec![ScriptedBackend::ok(plan_json)]).await;

        let plan = engine.propose(&mut controller, "evaluate acme").await.unwrap();
        assert_eq!(plan.sections.len(), 2);
        assert!(engine.phase().is_awaiting_approval());

        // The approval message was appended and persisted
        let session = controller.current().unwrap();
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].kind, Some(MessageKind::PlanApproval));
    }

    #[tokio::test]
    async fn test_propose_failure_uses_fallback() {
        let (mut controller, mut engine) =
            setup(vec![Err(RedpillError::backend("down"))]).await;

        let plan = engine.propose(&mut controller, "evaluate acme").await.unwrap();
        assert_eq!(plan.sections.len(), 3);
        assert!(engine.phase().is_awaiting_approval());
    }

    #[tokio::test]
    async fn test_propose_unparsable_reply_uses_fallback() {
        let (mut controller, mut engine) =
            setup(vec![ScriptedBackend::ok("I could not produce a plan, sorry.")]).await;

        let plan = engine.propose(&mut controller, "evaluate acme").await.unwrap();
        assert_eq!(plan.sections.len(), 3);
    }

    #[tokio::test]
    async fn test_propose_requires_idle() {
        let (mut controller, mut engine) =
            setup(vec![Err(RedpillError::backend("down"))]).await;
        engine.propose(&mut controller, "q").await.unwrap();

        let again = engine.propose(&mut controller, "q2").await;
        assert!(matches!(again, Err(RedpillError::InvalidPhase(_))));
    }

    #[tokio::test]
    async fn test_approve_fallback_plan_produces_three_sections_in_order() {
        // Plan request fails (fallback), then one analysis reply per section.
        let (mut controller, mut engine) = setup(vec![
            Err(RedpillError::backend("down")),
            ScriptedBackend::ok("analysis one"),
            ScriptedBackend::ok("analysis two"),
            ScriptedBackend::ok("analysis three"),
        ])
        .await;

        engine.propose(&mut controller, "evaluate acme").await.unwrap();
        engine.approve(&mut controller).await.unwrap();

        assert!(engine.phase().is_idle());
        let sections = engine.sections();
        assert_eq!(sections.len(), 3);
        for (i, section) in sections.iter().enumerate() {
            assert_eq!(section.order, i);
            assert_eq!(section.status, SectionStatus::Completed);
            assert!(!section.sources.is_empty());
        }

        // One approval + three section mirrors + one completion notice
        let session = controller.current().unwrap();
        let mirrored: Vec<_> = session
            .messages
            .iter()
            .filter(|m| m.kind == Some(MessageKind::ResearchSection))
            .collect();
        assert_eq!(mirrored.len(), 3);
        assert!(mirrored.iter().all(|m| m.sender == Sender::Ai));
        assert!(mirrored[0].content.contains("Market landscape"));
        assert!(mirrored[2].content.contains("Risks"));
        assert_eq!(
            session.messages.last().unwrap().kind,
            Some(MessageKind::Status)
        );

        // Mirrored messages survived persistence
        let stored = controller.history("acme").await;
        assert_eq!(stored[0].messages.len(), session.messages.len());
    }

    #[tokio::test]
    async fn test_section_failure_still_completes() {
        let (mut controller, mut engine) = setup(vec![
            Err(RedpillError::backend("down")),
            ScriptedBackend::ok("analysis one"),
            Err(RedpillError::backend("mid-run outage")),
            ScriptedBackend::ok("analysis three"),
        ])
        .await;

        engine.propose(&mut controller, "evaluate acme").await.unwrap();
        engine.approve(&mut controller).await.unwrap();

        let sections = engine.sections();
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[1].status, SectionStatus::Completed);
        assert!(sections[1].content.contains("Analysis unavailable"));
    }

    #[tokio::test]
    async fn test_reject_leaves_sections_and_appends_one_message() {
        let (mut controller, mut engine) =
            setup(vec![Err(RedpillError::backend("down"))]).await;
        engine.propose(&mut controller, "evaluate acme").await.unwrap();
        let before = controller.current().unwrap().messages.len();

        engine.reject(&mut controller).await.unwrap();

        assert!(engine.phase().is_idle());
        assert!(engine.sections().is_empty());
        let session = controller.current().unwrap();
        assert_eq!(session.messages.len(), before + 1);
        assert_eq!(session.messages.last().unwrap().sender, Sender::Ai);
    }

    #[tokio::test]
    async fn test_approve_requires_parked_plan() {
        let (mut controller, mut engine) = setup(vec![]).await;
        let result = engine.approve(&mut controller).await;
        assert!(matches!(result, Err(RedpillError::InvalidPhase(_))));
        assert!(engine.phase().is_idle());
    }

    #[tokio::test]
    async fn test_run_after_cancel_executes_fresh_plan() {
        let (mut controller, mut engine) = setup(vec![
            Err(RedpillError::backend("down")),
            Err(RedpillError::backend("down")),
            ScriptedBackend::ok("analysis one"),
            ScriptedBackend::ok("analysis two"),
            ScriptedBackend::ok("analysis three"),
        ])
        .await;

        engine.propose(&mut controller, "evaluate acme").await.unwrap();
        engine.cancel_token().cancel();
        engine.approve(&mut controller).await.unwrap();
        assert!(engine.sections().is_empty());

        // The fired token does not bleed into the next run
        engine.propose(&mut controller, "evaluate acme again").await.unwrap();
        engine.approve(&mut controller).await.unwrap();

        assert!(engine.phase().is_idle());
        let sections = engine.sections();
        assert_eq!(sections.len(), 3);
        assert!(sections
            .iter()
            .all(|s| s.status == SectionStatus::Completed));
    }

    #[tokio::test]
    async fn test_cancellation_stops_before_any_section() {
        let (mut controller, mut engine) =
            setup(vec![Err(RedpillError::backend("down"))]).await;
        engine.propose(&mut controller, "evaluate acme").await.unwrap();

        engine.cancel_token().cancel();
        engine.approve(&mut controller).await.unwrap();

        assert!(engine.phase().is_idle());
        assert!(engine.sections().is_empty());
    }
}
