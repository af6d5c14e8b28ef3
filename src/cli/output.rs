//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::dump::DumpSummary;
use crate::error::{CommandError, Error};
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string, falling back to text.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        Self::from_name(s).unwrap_or(Self::Text)
    }

    /// Parses format from string, rejecting unknown names.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::OutputFormat`] for anything but `text` or `json`.
    pub fn from_name(s: &str) -> std::result::Result<Self, CommandError> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(CommandError::OutputFormat(s.to_string())),
        }
    }
}

#[derive(Serialize)]
struct SummaryReport<'a> {
    #[serde(flatten)]
    summary: &'a DumpSummary,
    output: String,
}

/// Formats the result of a completed dump.
#[must_use]
pub fn format_summary(summary: &DumpSummary, output: &Path, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_summary_text(summary, output),
        OutputFormat::Json => {
            let report = SummaryReport {
                summary,
                output: output.to_string_lossy().to_string(),
            };
            format_json(&report)
        }
    }
}

fn format_summary_text(summary: &DumpSummary, output: &Path) -> String {
    let mut text = String::new();
    text.push_str("Dump complete\n");
    text.push_str("=============\n\n");
    let _ = writeln!(text, "  Port:        {}", summary.port);
    let _ = writeln!(
        text,
        "  Range:       0x{:08x}-0x{:08x}",
        summary.base,
        summary.base + summary.length
    );
    let _ = writeln!(text, "  Size:        {}", format_size(summary.length));
    let _ = writeln!(
        text,
        "  Commands:    {} x {} bytes max",
        summary.exchanges, summary.chunk_size
    );
    let _ = writeln!(text, "  Lines:       {}", summary.lines);
    let _ = writeln!(text, "  Output:      {}", output.display());
    text
}

/// Formats an error for display.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ErrorReport<'a> {
                error: String,
                kind: &'a str,
            }

            let kind = match error {
                Error::Transport(_) => "transport",
                Error::Protocol(_) => "protocol",
                Error::Io(_) => "io",
                Error::Command(_) => "command",
                Error::Config { .. } => "config",
            };
            format_json(&ErrorReport {
                error: error.to_string(),
                kind,
            })
        }
    }
}

/// Formats a value as JSON.
fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a byte size as human-readable.
#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
