//! First-run setup: data directories plus an interactive config write.

use super::CliContext;
use anyhow::Result;
use colored::Colorize;
use redpill_infrastructure::{config_service, RedpillPaths};
use tokio::fs;

pub async fn run(context: CliContext) -> Result<()> {
    println!("{}", "Redpill setup".bold().underline());

    fs::create_dir_all(RedpillPaths::store_dir()?).await?;
    if let Some(parent) = RedpillPaths::log_file()?.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut editor = rustyline::DefaultEditor::new()?;
    let mut config = context.config;

    let url = editor.readline(&format!("Backend URL [{}]: ", config.backend_url))?;
    if !url.trim().is_empty() {
        config.backend_url = url.trim().trim_end_matches('/').to_string();
    }

    let key = editor.readline("API key (blank to skip): ")?;
    if !key.trim().is_empty() {
        config.api_key = Some(key.trim().to_string());
    }

    let project = editor.readline("Default project (blank for general): ")?;
    if !project.trim().is_empty() {
        config.default_project = Some(project.trim().to_string());
    }

    let path = RedpillPaths::config_file()?;
    config_service::save(&path, &config).await?;
    println!("{} wrote {}", "ok".green().bold(), path.display());
    Ok(())
}
