//! Log file inspection: line counts per level, recent tail, cleanup.
//!
//! Operates on the CLI's own `tracing` log file. File errors are printed
//! by the caller and exit the process with status 1.

use anyhow::{Context, Result};
use colored::Colorize;
use redpill_infrastructure::RedpillPaths;
use std::fs;

const LEVELS: [&str; 5] = ["ERROR", "WARN", "INFO", "DEBUG", "TRACE"];

pub fn run(stats: bool, recent: Option<usize>, clean: bool) -> Result<()> {
    let path = RedpillPaths::log_file()?;

    if clean {
        match fs::remove_file(&path) {
            Ok(()) => println!("{} removed {}", "ok".green().bold(), path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                println!("No log file to remove.")
            }
            Err(e) => return Err(e).context(format!("Failed to remove {:?}", path)),
        }
        return Ok(());
    }

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            println!("No log file yet at {}.", path.display());
            return Ok(());
        }
        Err(e) => return Err(e).context(format!("Failed to read {:?}", path)),
    };
    let lines: Vec<&str> = content.lines().collect();

    if stats {
        println!("{}", "Log statistics".bold().underline());
        println!("file    {}", path.display());
        println!("lines   {}", lines.len());
        for level in LEVELS {
            let count = lines.iter().filter(|l| l.contains(level)).count();
            if count > 0 {
                println!("{:<7} {}", level.to_lowercase(), count);
            }
        }
        return Ok(());
    }

    // Default (and --recent): tail the file
    let count = recent.unwrap_or(20);
    let start = lines.len().saturating_sub(count);
    for line in &lines[start..] {
        println!("{}", line);
    }
    Ok(())
}
