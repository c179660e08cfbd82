//! Portfolio overview via one backend call.

use super::{oneshot, CliContext};
use anyhow::Result;
use colored::Colorize;

pub async fn run(context: CliContext, list: bool, summary: bool) -> Result<()> {
    let prompt = if list {
        "List the companies in my portfolio with stage and last-round date."
    } else if summary {
        "Summarize my portfolio's performance: top movers, concerns, and follow-ups."
    } else {
        "Give me a concise portfolio overview."
    };

    println!("{}", "Portfolio".bold().underline());
    let reply = oneshot::ask(&context, prompt, Vec::new()).await?;
    println!("{}", reply);
    Ok(())
}
