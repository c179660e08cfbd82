//! Market snapshot via one backend call.

use super::{oneshot, CliContext};
use anyhow::Result;
use colored::Colorize;

pub async fn run(context: CliContext, overview: bool, ticker: Option<String>) -> Result<()> {
    let prompt = match (&ticker, overview) {
        (Some(symbol), _) => format!(
            "Give me the latest on {}: price action, news, and what it means for venture comparables.",
            symbol.to_uppercase()
        ),
        (None, _) => {
            "Give me a broad market overview relevant to venture investing today.".to_string()
        }
    };

    println!("{}", "Market".bold().underline());
    let reply = oneshot::ask(&context, &prompt, Vec::new()).await?;
    println!("{}", reply);
    Ok(())
}
