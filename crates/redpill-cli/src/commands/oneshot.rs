//! One-shot prompt dispatch (`redpill -p "..."`) and the shared ask helper
//! used by the portfolio/market commands.

use super::CliContext;
use anyhow::{bail, Result};
use redpill_core::backend::{ChatBackend, ChatRequest};
use redpill_core::session::APOLOGY;

/// Sends one message inside a (new or resumed) persisted session, prints
/// the reply, and fails the process when the backend could not be reached.
pub async fn run(
    context: CliContext,
    prompt: &str,
    session_id: Option<&str>,
    include_directories: Vec<String>,
) -> Result<()> {
    if !include_directories.is_empty() {
        // Session sends carry no directory context; only direct asks do.
        let reply = ask(&context, prompt, include_directories).await?;
        println!("{}", reply);
        return Ok(());
    }

    let mut controller = context.controller();
    match session_id {
        Some(id) => {
            controller.load(&context.project_id, id).await?;
        }
        None => {
            controller.open(context.open_options()).await?;
        }
    }

    let reply = controller
        .send_message(prompt)
        .await?
        .map(|m| m.content)
        .unwrap_or_default();
    // The controller swallows backend failures into the apology; a one-shot
    // invocation still has to exit non-zero on them.
    if reply == APOLOGY {
        bail!("backend request failed");
    }
    println!("{}", reply);
    Ok(())
}

/// One backend chat call outside any session. Non-success replies are
/// process failures (exit 1), matching the one-call-per-invocation
/// commands.
pub async fn ask(
    context: &CliContext,
    message: &str,
    context_directories: Vec<String>,
) -> Result<String> {
    let options = context.open_options();
    let request = ChatRequest {
        message: message.to_string(),
        project_id: options.project_id,
        project_type: options.project_type,
        conversation_history: Vec::new(),
        context_directories,
    };
    let reply = context.backend.chat(&request).await?;
    if !reply.is_success() {
        bail!("backend reported failure: {}", reply.content);
    }
    Ok(reply.content)
}
