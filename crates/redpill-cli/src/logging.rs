//! Tracing initialization.
//!
//! Events go to the CLI's own log file (`~/.redpill/logs/redpill.log`),
//! which the `logs` subcommand inspects. Level via `REDPILL_LOG`
//! (default `info`). Falls back to stderr when the file cannot be opened.

use redpill_infrastructure::RedpillPaths;
use std::fs::OpenOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub fn init() {
    let filter = EnvFilter::try_from_env("REDPILL_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let log_file = RedpillPaths::log_file().ok().and_then(|path| {
        std::fs::create_dir_all(path.parent()?).ok()?;
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .ok()
    });

    match log_file {
        Some(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Arc::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
