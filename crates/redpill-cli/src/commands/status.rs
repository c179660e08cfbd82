//! Backend health and local configuration summary.

use super::CliContext;
use anyhow::Result;
use colored::Colorize;

pub async fn run(context: CliContext) -> Result<()> {
    println!("{}", "Redpill status".bold().underline());
    println!("backend   {}", context.backend.base_url());
    println!("project   {}", context.project_id);
    println!(
        "api key   {}",
        if context.config.api_key.is_some() {
            "configured".green()
        } else {
            "not set".yellow()
        }
    );

    match context.backend.health().await {
        Ok(report) => {
            let version = report.version.as_deref().unwrap_or("unknown");
            println!(
                "health    {} ({}, version {})",
                "reachable".green(),
                if report.status.is_empty() {
                    "ok"
                } else {
                    report.status.as_str()
                },
                version
            );
            Ok(())
        }
        Err(e) => {
            println!("health    {}", "unreachable".red());
            Err(e.into())
        }
    }
}
