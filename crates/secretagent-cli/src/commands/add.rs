//! `secretagent add password|api-key`.

use clap::Args;
use console::style;
use secretagent_core::{
    ApiKeyCriteria, PasswordCriteria, SecretKind, SecretRecord, DEFAULT_PASSWORD_LENGTH,
};
use secretagent_generation::{GenerationError, SecretDraft, SecretGenerator};
use secretagent_storage::SecretRepository;
use std::path::Path;

use crate::clipboard::{self, ClipboardWriter, SystemClipboard};
use crate::{prompt, render};

/// Add command arguments.
#[derive(Args)]
pub struct AddArgs {
    #[command(subcommand)]
    pub command: AddCommand,
}

#[derive(clap::Subcommand)]
pub enum AddCommand {
    /// Generate a password
    Password(PasswordArgs),

    /// Suggest an API key for a service
    ApiKey(ApiKeyArgs),
}

#[derive(Args)]
pub struct PasswordArgs {
    /// Label for the secret
    #[arg(long)]
    pub name: String,

    /// Password length (8-128)
    #[arg(long, default_value_t = DEFAULT_PASSWORD_LENGTH)]
    pub length: u32,

    /// Leave digits out
    #[arg(long)]
    pub no_numbers: bool,

    /// Leave symbols out
    #[arg(long)]
    pub no_symbols: bool,

    /// Copy the generated value to the clipboard
    #[arg(long)]
    pub copy: bool,

    /// Save without asking
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ApiKeyArgs {
    /// Label for the secret
    #[arg(long)]
    pub name: String,

    /// What the key is for
    #[arg(long)]
    pub service: String,

    /// What the key may do (e.g. read-only)
    #[arg(long)]
    pub access: String,

    /// Copy the generated value to the clipboard
    #[arg(long)]
    pub copy: bool,

    /// Save without asking
    #[arg(short, long)]
    pub yes: bool,
}

/// Flags shared by every `add` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AddFlags {
    assume_yes: bool,
    copy: bool,
}

impl AddCommand {
    fn into_draft(self) -> (SecretDraft, AddFlags) {
        match self {
            Self::Password(args) => {
                let criteria = PasswordCriteria {
                    length: args.length,
                    include_numbers: !args.no_numbers,
                    include_symbols: !args.no_symbols,
                };
                let flags = AddFlags {
                    assume_yes: args.yes,
                    copy: args.copy,
                };
                (SecretDraft::new(args.name, criteria), flags)
            }
            Self::ApiKey(args) => {
                let criteria = ApiKeyCriteria {
                    service_description: args.service,
                    access_level: args.access,
                };
                let flags = AddFlags {
                    assume_yes: args.yes,
                    copy: args.copy,
                };
                (SecretDraft::new(args.name, criteria), flags)
            }
        }
    }
}

/// Run the add command.
pub async fn run(args: AddArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let (draft, flags) = args.command.into_draft();

    let repo = super::open_repository(&config)?;
    let generator = secretagent_generation::from_config(&config.generation)?;

    let mut system = if flags.copy {
        match SystemClipboard::open() {
            Ok(clipboard) => Some(clipboard),
            Err(e) => {
                warn_copy_failed(&e);
                None
            }
        }
    } else {
        None
    };
    let clipboard = system.as_mut().map(|c| c as &mut dyn ClipboardWriter);

    generate_and_save(&draft, generator.as_ref(), &repo, flags.assume_yes, clipboard).await?;
    Ok(())
}

/// Generate a value for `draft`, show it, then save it if confirmed.
///
/// When a clipboard is given the value is also copied; a failed copy only
/// warns. Returns the stored record, or `None` when the user declined.
pub async fn generate_and_save(
    draft: &SecretDraft,
    generator: &dyn SecretGenerator,
    repo: &SecretRepository,
    assume_yes: bool,
    clipboard: Option<&mut dyn ClipboardWriter>,
) -> anyhow::Result<Option<SecretRecord>> {
    let kind = draft.kind();

    let pb = render::spinner(&format!("Generating {}...", noun(kind)));
    let result = draft.generate(generator).await;
    pb.finish_and_clear();

    let generated = match result {
        Ok(generated) => generated,
        Err(GenerationError::Validation(errors)) => {
            eprintln!("{}", style("Please fix the following:").yellow());
            render::print_validation_errors(&errors);
            anyhow::bail!("Invalid input");
        }
        Err(e) => {
            let retry = e.is_retryable();
            let err = anyhow::Error::new(e).context(failure_message(kind));
            if retry {
                eprintln!("  {}", style("The request can be retried.").dim());
            }
            return Err(err);
        }
    };

    println!(
        "{} {}",
        style(format!("Generated {}:", noun(kind))).bold(),
        generated.value.expose_secret()
    );
    if let Some(comments) = &generated.comments {
        println!("{} {}", style("Notes:").dim(), comments);
    }

    if let Some(writer) = clipboard {
        if let Err(e) =
            clipboard::copy_secret(writer, &draft.name(), generated.value.expose_secret())
        {
            warn_copy_failed(&e);
        }
    }

    if !prompt::confirm("Save secret?", true, assume_yes)? {
        println!("Discarded.");
        return Ok(None);
    }

    let record = draft.save(repo)?;
    println!(
        "{} Saved '{}' ({})",
        style("✓").green(),
        record.name,
        record.id.short()
    );
    Ok(Some(record))
}

fn noun(kind: SecretKind) -> &'static str {
    match kind {
        SecretKind::Password => "password",
        SecretKind::ApiKey => "API key",
    }
}

fn failure_message(kind: SecretKind) -> String {
    format!("Failed to generate {}.", noun(kind))
}

fn warn_copy_failed(err: &anyhow::Error) {
    tracing::warn!(error = %err, "clipboard copy failed");
    eprintln!("{} {:#}", style("Could not copy to clipboard:").yellow(), err);
}
