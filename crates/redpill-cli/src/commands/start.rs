//! Interactive research session (`redpill start`).
//!
//! A rustyline REPL over the session controller and research engine.
//! Free text goes to the backend; slash commands drive the research
//! approval flow, history browsing, and memo capture.

use super::CliContext;
use anyhow::Result;
use colored::Colorize;
use redpill_core::research::{ResearchEngine, ResearchPhase};
use redpill_core::session::{SessionController, SessionEvent};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::borrow::Cow::{self, Borrowed, Owned};

const SLASH_COMMANDS: [&str; 8] = [
    "/plan", "/approve", "/reject", "/sections", "/memo", "/history", "/load", "/quit",
];

/// REPL helper providing completion, highlighting, and hints for slash
/// commands.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: SLASH_COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

pub async fn run(
    context: CliContext,
    session_id: Option<&str>,
    include_directories: Vec<String>,
) -> Result<()> {
    if !include_directories.is_empty() {
        println!(
            "{}",
            "Note: --include-directories only applies to one-shot prompts (-p); ignored here."
                .yellow()
        );
    }
    let mut controller = context.controller();
    let mut engine = ResearchEngine::new(context.backend.clone(), context.config.research.clone());
    let mut events = controller.subscribe();

    match session_id {
        Some(id) => {
            let session = controller.load(&context.project_id, id).await?;
            println!(
                "{}",
                format!(
                    "Resumed session {} ({} messages).",
                    session.id,
                    session.messages.len()
                )
                .yellow()
            );
        }
        None => {
            let session = controller.open(context.open_options()).await?;
            println!(
                "{}",
                format!("New session {} on project {}.", session.id, session.project_id).yellow()
            );
        }
    }
    println!(
        "{}",
        "Type a question, or /plan <query> to start deep research. /quit to leave.".dimmed()
    );

    let mut editor: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    editor.set_helper(Some(CliHelper::new()));

    loop {
        let readline = editor.readline(&prompt_label(engine.phase()));
        let line = match readline {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(line);

        if line == "/quit" || line == "/exit" {
            break;
        }
        if let Err(e) = dispatch(line, &context, &mut controller, &mut engine).await {
            println!("{} {}", "!!".red().bold(), e);
        }

        while let Ok(event) = events.try_recv() {
            if let SessionEvent::ResearchCompleted { section_count, .. } = event {
                println!(
                    "{}",
                    format!("Research complete: {} sections.", section_count).green()
                );
            }
        }
    }

    println!("{}", "Session saved. Goodbye.".dimmed());
    Ok(())
}

fn prompt_label(phase: &ResearchPhase) -> String {
    match phase {
        ResearchPhase::Idle => "redpill> ".to_string(),
        other => format!("redpill [{}]> ", other.label()),
    }
}

async fn dispatch(
    line: &str,
    context: &CliContext,
    controller: &mut SessionController,
    engine: &mut ResearchEngine,
) -> Result<()> {
    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "/plan" => {
            if rest.is_empty() {
                println!("Usage: /plan <research question>");
                return Ok(());
            }
            controller.record_user_message(rest).await?;
            let plan = engine.propose(controller, rest).await?;
            println!("{}", plan.summary().cyan());
            println!("{}", "Reply /approve to run it, or /reject.".dimmed());
        }
        "/approve" => {
            println!("{}", "Executing research plan...".yellow());
            engine.approve(controller).await?;
            for section in engine.sections() {
                println!();
                println!("{}", section.title.bold().underline());
                println!("{}", section.content);
            }
        }
        "/reject" => {
            engine.reject(controller).await?;
            println!("{}", "Plan rejected.".yellow());
        }
        "/sections" => {
            if engine.sections().is_empty() {
                println!("No research sections yet.");
            }
            for section in engine.sections() {
                println!(
                    "{}. {} ({})",
                    section.order + 1,
                    section.title,
                    section.status
                );
            }
        }
        "/memo" => {
            let content = match controller.current().and_then(|s| s.last_assistant()) {
                Some(message) => message.content.clone(),
                None => {
                    println!("Nothing to save yet - ask something first.");
                    return Ok(());
                }
            };
            let title = if rest.is_empty() {
                None
            } else {
                Some(rest.to_string())
            };
            let memo = controller.save_memo(&content, title).await?;
            println!("{}", format!("Memo saved: {}", memo.title).green());
        }
        "/history" => {
            let sessions = controller.history(&context.project_id).await;
            if sessions.is_empty() {
                println!("No stored sessions for {}.", context.project_id);
            }
            for session in sessions {
                println!(
                    "{}  {} messages  {}",
                    session.id,
                    session.messages.len(),
                    session.last_activity.format("%Y-%m-%d %H:%M")
                );
            }
        }
        "/load" => {
            if rest.is_empty() {
                println!("Usage: /load <session-id>");
                return Ok(());
            }
            let session = controller.load(&context.project_id, rest).await?;
            println!(
                "{}",
                format!("Loaded {} ({} messages).", session.id, session.messages.len()).yellow()
            );
        }
        _ if command.starts_with('/') => {
            println!("Unknown command {}. Try {}.", command, SLASH_COMMANDS.join(" "));
        }
        _ => {
            if let Some(reply) = controller.send_message(line).await? {
                println!("{}", reply.content.cyan());
            }
        }
    }
    Ok(())
}
