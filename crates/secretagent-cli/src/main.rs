//! Secret Agent CLI entry point.

use clap::Parser;
use secretagent_cli::{init_logging, run, Cli};
use secretagent_core::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging; a broken config file is reported by the command itself
    let logging = Config::load_or_default(cli.config.as_deref())
        .map(|config| config.logging)
        .unwrap_or_default();
    init_logging(cli.verbose, &logging);

    // Run the command
    run(cli).await
}
