//! `secretagent list`.

use clap::Args;
use std::path::Path;

use crate::render::{self, RecordSummary};

/// List command arguments.
#[derive(Args)]
pub struct ListArgs {
    /// Only show secrets whose name or service description contains this
    /// text (case-insensitive)
    pub search: Option<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Run the list command.
pub async fn run(args: ListArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let repo = super::open_repository(&config)?;

    let search = args.search.unwrap_or_default();
    let records = repo.list(&search);

    if args.json {
        let summaries: Vec<RecordSummary<'_>> = records.iter().map(RecordSummary::from).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if records.is_empty() {
        if search.is_empty() {
            println!("No secrets stored.");
        } else {
            println!("No secrets match '{}'.", search);
        }
        return Ok(());
    }

    print!("{}", render::render_table(&records));
    println!("\n{} secret(s) total.", records.len());

    Ok(())
}
