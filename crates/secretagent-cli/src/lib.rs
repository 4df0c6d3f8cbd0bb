//! Secret Agent command-line interface.

pub mod clipboard;
pub mod commands;
pub mod prompt;
pub mod render;

use clap::{Parser, Subcommand};
use secretagent_core::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Secret Agent - generate and keep passwords and API keys
#[derive(Parser)]
#[command(name = "secretagent")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long, env = "SECRETAGENT_CONFIG", global = true)]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// List stored secrets
    List(commands::list::ListArgs),

    /// Generate and save a new secret
    Add(commands::add::AddArgs),

    /// Show one secret
    Show(commands::show::ShowArgs),

    /// Delete a secret
    Delete(commands::delete::DeleteArgs),

    /// Configuration management
    Config(commands::config::ConfigArgs),

    /// Show version information
    Version,
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::List(args) => commands::list::run(args, config_path).await,
        Commands::Add(args) => commands::add::run(args, config_path).await,
        Commands::Show(args) => commands::show::run(args, config_path).await,
        Commands::Delete(args) => commands::delete::run(args, config_path).await,
        Commands::Config(args) => commands::config::run(args, config_path).await,
        Commands::Version => {
            println!("secretagent {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Filter directive for the given `-v` count.
///
/// `RUST_LOG` takes precedence when set.
pub fn filter_directive(verbose: u8, logging: &LoggingConfig) -> String {
    let level = match verbose {
        0 => logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    format!("secretagent={level}")
}

/// Install the global tracing subscriber. Logs go to stderr.
pub fn init_logging(verbose: u8, logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| filter_directive(verbose, logging).into());

    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
