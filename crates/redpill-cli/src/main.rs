use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "redpill")]
#[command(about = "Redpill CLI - VC research and portfolio operations", long_about = None)]
struct Cli {
    /// One-shot prompt forwarded to the backend (skips the interactive loop)
    #[arg(short = 'p', long, global = true)]
    prompt: Option<String>,

    /// Comma-separated directories forwarded as retrieval context
    #[arg(long, global = true, value_delimiter = ',')]
    include_directories: Vec<String>,

    /// Resume a stored session instead of opening a fresh one
    #[arg(long, global = true)]
    session_id: Option<String>,

    /// Project to operate on (defaults to the configured project)
    #[arg(long, global = true)]
    project: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive research session
    #[command(alias = "s")]
    Start,
    /// Create the data directory and write the config file
    Setup,
    /// Portfolio overview via the backend
    #[command(alias = "pf")]
    Portfolio {
        /// List portfolio companies
        #[arg(long)]
        list: bool,
        /// Summarize portfolio performance
        #[arg(long)]
        summary: bool,
    },
    /// API key management
    #[command(alias = "api")]
    Keys {
        /// Report whether an API key is configured
        #[arg(long)]
        check: bool,
        /// Prompt for and store an API key
        #[arg(long)]
        setup: bool,
    },
    /// Market snapshot via the backend
    #[command(alias = "m")]
    Market {
        /// Broad market overview
        #[arg(long)]
        overview: bool,
        /// Focus on one ticker symbol
        #[arg(long)]
        ticker: Option<String>,
    },
    /// Backend health and local configuration
    #[command(alias = "st")]
    Status,
    /// Inspect the CLI's log file
    Logs {
        /// Count log lines per level
        #[arg(long)]
        stats: bool,
        /// Show the most recent lines (default 20)
        #[arg(long, num_args = 0..=1, default_missing_value = "20")]
        recent: Option<usize>,
        /// Delete the log file
        #[arg(long)]
        clean: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let context = commands::CliContext::load(&cli.project).await?;

    match cli.command {
        Some(Commands::Start) => {
            commands::start::run(
                context,
                cli.session_id.as_deref(),
                cli.include_directories,
            )
            .await
        }
        Some(Commands::Setup) => commands::setup::run(context).await,
        Some(Commands::Portfolio { list, summary }) => {
            commands::portfolio::run(context, list, summary).await
        }
        Some(Commands::Keys { check, setup }) => commands::keys::run(context, check, setup).await,
        Some(Commands::Market { overview, ticker }) => {
            commands::market::run(context, overview, ticker).await
        }
        Some(Commands::Status) => commands::status::run(context).await,
        Some(Commands::Logs {
            stats,
            recent,
            clean,
        }) => commands::logs::run(stats, recent, clean),
        None => match cli.prompt {
            Some(prompt) => {
                commands::oneshot::run(
                    context,
                    &prompt,
                    cli.session_id.as_deref(),
                    cli.include_directories,
                )
                .await
            }
            None => {
                use clap::CommandFactory;
                Cli::command().print_help()?;
                Ok(())
            }
        },
    }
}
