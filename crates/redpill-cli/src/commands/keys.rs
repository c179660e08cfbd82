//! API key management.
//!
//! `--check` is purely local: it reports whether a key is configured (file
//! or environment), no network call. `--setup` prompts for a key and
//! stores it in the config file.

use super::CliContext;
use anyhow::Result;
use colored::Colorize;
use redpill_infrastructure::{config_service, RedpillPaths};

pub async fn run(context: CliContext, _check: bool, setup: bool) -> Result<()> {
    if setup {
        return store_key(context).await;
    }

    // Default action is the check
    match &context.config.api_key {
        Some(key) => {
            let tail: String = key.chars().rev().take(4).collect::<Vec<_>>().iter().rev().collect();
            println!("{} API key configured (...{})", "ok".green().bold(), tail);
        }
        None => {
            println!(
                "{} no API key configured - run `redpill keys --setup`",
                "!!".yellow().bold()
            );
        }
    }
    Ok(())
}

async fn store_key(context: CliContext) -> Result<()> {
    let mut editor = rustyline::DefaultEditor::new()?;
    let key = editor.readline("API key: ")?;
    let key = key.trim();
    if key.is_empty() {
        println!("Nothing entered; config unchanged.");
        return Ok(());
    }

    let mut config = context.config;
    config.api_key = Some(key.to_string());
    config_service::save(RedpillPaths::config_file()?, &config).await?;
    println!("{} API key saved.", "ok".green().bold());
    Ok(())
}
