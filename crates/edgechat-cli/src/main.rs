//! `edgechat` -- CLI binary for the edgechat edge API.
//!
//! Provides the following subcommands:
//!
//! - `edgechat serve` -- Run the HTTP edge server.
//! - `edgechat parse` -- Validate a plugin command and print its parameters.
//! - `edgechat scan` -- Run a plugin command and stream its progress.
//! - `edgechat config` -- Show the resolved configuration.

use clap::{Parser, Subcommand};

mod commands;

/// edgechat edge API CLI.
#[derive(Parser)]
#[command(name = "edgechat", about = "edgechat edge API CLI", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP edge server.
    Serve(commands::serve::ServeArgs),

    /// Validate a plugin command without running it.
    Parse(commands::parse::ParseArgs),

    /// Run a plugin command against the configured backend.
    Scan(commands::scan::ScanArgs),

    /// Show resolved configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCmd,
    },
}

/// Subcommands for `edgechat config`.
#[derive(Subcommand)]
enum ConfigCmd {
    /// Show the full resolved configuration.
    Show {
        /// Config file path (overrides auto-discovery).
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Show a specific configuration section.
    Section {
        /// Section name (server, plugins, completion, report).
        name: String,
        /// Config file path (overrides auto-discovery).
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve(args) => commands::serve::run(args).await?,
        Commands::Parse(args) => commands::parse::run(args)?,
        Commands::Scan(args) => commands::scan::run(args).await?,
        Commands::Config { action } => match action {
            ConfigCmd::Show { config } => {
                let cfg = commands::load_config(config.as_deref())?;
                commands::config_cmd::show(&cfg)?;
            }
            ConfigCmd::Section { name, config } => {
                let cfg = commands::load_config(config.as_deref())?;
                commands::config_cmd::section(&cfg, &name)?;
            }
        },
    }

    Ok(())
}
