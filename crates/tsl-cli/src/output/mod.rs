//! Output formatting for the inspect command.

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tsl_core::{CertificateBatch, CertificateRecord};

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable listing with colors
    #[default]
    Pretty,
    /// JSON output
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => anyhow::bail!(
                "Unknown output format: {}\n\
                 Valid formats: pretty, json",
                s
            ),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Render a processed container in the requested format.
pub fn render_batch(batch: &CertificateBatch, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(batch)?),
        OutputFormat::Pretty => Ok(pretty_batch(batch)),
    }
}

fn pretty_batch(batch: &CertificateBatch) -> String {
    let mut out = String::new();

    for record in &batch.records {
        out.push_str(&pretty_record(record));
        out.push('\n');
    }

    for dup in &batch.duplicates {
        out.push_str(&format!(
            "{} certificate #{} ({}) repeats the key of certificate #{}\n",
            "Duplicate:".yellow().bold(),
            dup.ordinal,
            dup.subject_name,
            dup.first_ordinal
        ));
    }

    for skipped in &batch.skipped {
        out.push_str(&format!(
            "{} certificate #{}: {}\n",
            "Skipped:".red().bold(),
            skipped.ordinal,
            skipped.reason
        ));
    }

    out.push_str(&format!(
        "{} {} certificates, {} unique keys\n",
        "Total:".bold(),
        batch.records.len(),
        batch.unique_keys
    ));
    out
}

fn pretty_record(record: &CertificateRecord) -> String {
    let key = &record.key;
    let info = key
        .key_info
        .as_deref()
        .map(|i| format!(" ({i})"))
        .unwrap_or_default();

    format!(
        "{} {}\n  {} {}\n  {} {} {}{}\n  {} {}\n  {} {}\n  {} {} .. {}\n  {} {}\n",
        format!("#{}", record.ordinal).cyan().bold(),
        record.subject_name.bold(),
        "issuer:".dimmed(),
        record.issuer_name,
        "key:".dimmed(),
        key.key_type,
        key.key_format.as_str(),
        info,
        "serial:".dimmed(),
        record.serial_number,
        "size:".dimmed(),
        record.raw_content.len(),
        "valid:".dimmed(),
        record.not_valid_before,
        record.not_valid_after,
        "public key:".dimmed(),
        record.public_key_hex()
    )
}
