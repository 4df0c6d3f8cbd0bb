//! Terminal rendering utilities.
//!
//! Secret tables, record details, field errors and the progress spinner.

use std::time::Duration;

use chrono::{DateTime, Utc};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use secretagent_core::{SecretRecord, ValidationErrors};
use serde::Serialize;

/// Spinner shown while waiting on the generator.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let spinner_style = ProgressStyle::default_spinner()
        .template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈");
    pb.set_style(spinner_style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Creation time as shown in tables.
pub fn format_created(created_at: &DateTime<Utc>) -> String {
    created_at.format("%Y-%m-%d %H:%M").to_string()
}

/// Plain-text table of records. Values are never included.
pub fn render_table(records: &[SecretRecord]) -> String {
    let mut out = format!("{:<10} {:<32} {:<10} {}\n", "ID", "NAME", "TYPE", "CREATED");
    out.push_str(&"-".repeat(72));
    out.push('\n');
    for record in records {
        out.push_str(&format!(
            "{:<10} {:<32} {:<10} {}\n",
            record.id.short(),
            truncate(&record.name, 32),
            record.kind.label(),
            format_created(&record.created_at),
        ));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Label/value pairs for `show`. The value is masked unless `reveal` is set.
pub fn record_details(record: &SecretRecord, reveal: bool) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Name", record.name.clone()),
        ("Type", record.kind.label().to_string()),
        ("ID", record.id.to_string()),
        ("Created", format_created(&record.created_at)),
    ];

    let ctx = &record.context;
    if let Some(service) = &ctx.service_description {
        rows.push(("Service", service.clone()));
    }
    if let Some(access) = &ctx.access_level {
        rows.push(("Access Level", access.clone()));
    }
    if let Some(length) = ctx.length {
        rows.push(("Length", length.to_string()));
    }
    if let Some(numbers) = ctx.include_numbers {
        rows.push(("Numbers", yes_no(numbers).to_string()));
    }
    if let Some(symbols) = ctx.include_symbols {
        rows.push(("Symbols", yes_no(symbols).to_string()));
    }

    let value = if reveal {
        record.value.expose_secret().to_string()
    } else {
        record.value.masked()
    };
    rows.push(("Value", value));
    rows
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Print every field error on stderr.
pub fn print_validation_errors(errors: &ValidationErrors) {
    for error in errors.errors() {
        eprintln!(
            "  {} {}: {}",
            style("✗").red(),
            style(error.field).bold(),
            error.message
        );
    }
}

/// Record as listed by `list --json`, without its value.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSummary<'a> {
    pub id: &'a str,
    pub name: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub created_at: &'a DateTime<Utc>,
}

impl<'a> From<&'a SecretRecord> for RecordSummary<'a> {
    fn from(record: &'a SecretRecord) -> Self {
        Self {
            id: record.id.as_str(),
            name: &record.name,
            kind: record.kind.as_str(),
            created_at: &record.created_at,
        }
    }
}
