//! Copying secret values to the system clipboard.

use anyhow::Context;
use console::style;

/// Something a secret value can be copied into.
pub trait ClipboardWriter {
    fn write_text(&mut self, text: &str) -> anyhow::Result<()>;
}

/// The desktop clipboard.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    /// Connect to the clipboard. Fails on headless systems.
    pub fn open() -> anyhow::Result<Self> {
        let inner = arboard::Clipboard::new().context("Clipboard is not available")?;
        Ok(Self { inner })
    }
}

impl ClipboardWriter for SystemClipboard {
    fn write_text(&mut self, text: &str) -> anyhow::Result<()> {
        self.inner
            .set_text(text)
            .context("Failed to copy to clipboard")
    }
}

/// Copy `value` and tell the user which secret it belongs to.
pub fn copy_secret(
    writer: &mut dyn ClipboardWriter,
    name: &str,
    value: &str,
) -> anyhow::Result<()> {
    writer.write_text(value)?;
    tracing::debug!(name, "copied secret to clipboard");
    println!("{} Copied to clipboard!", style("✓").green());
    println!("  {}", style(copied_message(name)).dim());
    Ok(())
}

fn copied_message(name: &str) -> String {
    format!("The secret for \"{name}\" has been copied.")
}

/// Clipboard that keeps the last copied text, for tests.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct MemoryClipboard {
    pub contents: Option<String>,
    pub fail: bool,
}

#[cfg(test)]
impl ClipboardWriter for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("Clipboard is not available");
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}
