//! `secretagent delete`.

use clap::Args;
use std::path::Path;

use crate::prompt;

/// Delete command arguments.
#[derive(Args)]
pub struct DeleteArgs {
    /// Secret ID, or a unique prefix of it
    pub id: String,

    /// Delete without asking
    #[arg(short, long)]
    pub yes: bool,
}

/// Run the delete command.
pub async fn run(args: DeleteArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let repo = super::open_repository(&config)?;

    let record = repo
        .find(&args.id)?
        .ok_or_else(|| anyhow::anyhow!("No secret with ID '{}'", args.id))?;

    let question = format!("Delete secret '{}'?", record.name);
    if !prompt::confirm(&question, false, args.yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    repo.delete(&record.id);
    println!("Secret '{}' deleted.", record.name);

    Ok(())
}
