//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use crate::console::{DEFAULT_PROMPT_MARKER, LineFraming, SessionConfig};
use crate::dump::AddressRange;
use crate::error::Result;
use crate::transport::{DEFAULT_BAUD_RATE, TransportConfig};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// rommon-dump: read flash from a boot-monitor console over a serial line.
///
/// Issues `dump` commands chunk by chunk at the rommon prompt and writes
/// the returned lines to a text file.
#[derive(Parser, Debug)]
#[command(name = "rommon-dump")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Serial device connected to the rommon console.
    #[arg(short, long, env = "ROMMON_DUMP_UART")]
    pub uart: String,

    /// Base address to start dumping from (decimal or 0x/0o/0b prefixed).
    #[arg(short, long, default_value = "0", value_parser = parse_int)]
    pub base: u64,

    /// Number of bytes to dump (decimal or 0x/0o/0b prefixed).
    #[arg(short, long, value_parser = parse_int)]
    pub length: u64,

    /// Output file for the dump (truncated).
    #[arg(short, long)]
    pub output: PathBuf,

    /// Enable verbose output (every line sent and received).
    #[arg(short, long)]
    pub verbose: bool,

    /// Serial baud rate.
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,

    /// Maximum bytes per dump command.
    #[arg(long, default_value = "0x10000", value_parser = parse_int)]
    pub chunk_size: u64,

    /// Serial read timeout in milliseconds; draining stops after one
    /// silent read.
    #[arg(long, default_value = "1000")]
    pub read_timeout_ms: u64,

    /// Give up when the prompt has not come back after this many seconds
    /// of silence (default: wait forever).
    #[arg(long)]
    pub response_timeout: Option<u64>,

    /// Substring that identifies the console prompt.
    #[arg(long, default_value = DEFAULT_PROMPT_MARKER, value_parser = parse_marker)]
    pub prompt_marker: String,

    /// Output format (text, json).
    #[arg(long, default_value = "text")]
    pub format: String,
}

impl Cli {
    /// Serial settings: 8N1 without flow control at the requested baud rate.
    #[must_use]
    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig::new(&self.uart)
            .baud_rate(self.baud)
            .read_timeout(Duration::from_millis(self.read_timeout_ms))
    }

    /// Console session settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a blank prompt marker.
    pub fn session_config(&self) -> Result<SessionConfig> {
        let framing = LineFraming::default().with_prompt_marker(&self.prompt_marker)?;
        Ok(SessionConfig::default()
            .framing(framing)
            .response_timeout(self.response_timeout.map(Duration::from_secs)))
    }

    /// The requested address range.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an empty or out-of-bounds range.
    pub fn address_range(&self) -> Result<AddressRange> {
        AddressRange::new(self.base, self.length)
    }
}

/// Parses an unsigned integer the way addresses are usually written:
/// `0x`, `0o` and `0b` prefixes select the radix, otherwise decimal.
/// Underscores are ignored.
///
/// # Errors
///
/// Returns a message suitable for clap when the value is not a number.
///
/// # Examples
///
/// ```
/// use rommon_dump::cli::parser::parse_int;
///
/// assert_eq!(parse_int("0x20000"), Ok(131_072));
/// assert_eq!(parse_int("65536"), Ok(65_536));
/// assert!(parse_int("ten").is_err());
/// ```
pub fn parse_int(value: &str) -> std::result::Result<u64, String> {
    let cleaned: String = value.trim().chars().filter(|c| *c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();

    let (digits, radix) = if let Some(hex) = lower.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(oct) = lower.strip_prefix("0o") {
        (oct, 8)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        (bin, 2)
    } else {
        (lower.as_str(), 10)
    };

    if digits.is_empty() {
        return Err(format!("invalid number: '{value}'"));
    }
    u64::from_str_radix(digits, radix).map_err(|e| format!("invalid number '{value}': {e}"))
}

/// Rejects blank console markers.
///
/// # Errors
///
/// Returns a message suitable for clap when the marker is blank.
pub fn parse_marker(value: &str) -> std::result::Result<String, String> {
    if value.trim().is_empty() {
        return Err("marker must not be blank".to_string());
    }
    Ok(value.to_string())
}
