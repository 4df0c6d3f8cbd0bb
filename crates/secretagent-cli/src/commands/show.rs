//! `secretagent show`.

use clap::Args;
use console::style;
use std::path::Path;

use crate::clipboard::{self, SystemClipboard};
use crate::render;

/// Show command arguments.
#[derive(Args)]
pub struct ShowArgs {
    /// Secret ID, or a unique prefix of it
    pub id: String,

    /// Print the value instead of a mask
    #[arg(long)]
    pub reveal: bool,

    /// Copy the value to the clipboard
    #[arg(long)]
    pub copy: bool,
}

/// Run the show command.
pub async fn run(args: ShowArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let repo = super::open_repository(&config)?;

    let record = repo
        .find(&args.id)?
        .ok_or_else(|| anyhow::anyhow!("No secret with ID '{}'", args.id))?;

    for (label, value) in render::record_details(&record, args.reveal) {
        println!("{:<14} {}", style(format!("{label}:")).bold(), value);
    }

    if args.copy {
        let mut system = SystemClipboard::open()?;
        println!();
        clipboard::copy_secret(&mut system, &record.name, record.value.expose_secret())?;
    }

    Ok(())
}
