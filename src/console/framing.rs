//! Console line framing.
//!
//! rommon has no structured framing: the response to a dump command is
//! delimited only by the echoed command before it and the next prompt
//! after it. Both are recognized by substring, and every decision about a
//! received line is made by [`LineFraming::classify`].

use crate::error::{Error, Result};
use std::fmt;

/// Default substring identifying the echoed dump command.
pub const DEFAULT_ECHO_MARKER: &str = "dump";

/// Default substring identifying the rommon prompt.
pub const DEFAULT_PROMPT_MARKER: &str = "rommon";

/// What a received line means to the collect phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Blank after trimming; skipped.
    Noise,
    /// The echoed command; skipped.
    Echo,
    /// The next prompt; ends the response.
    Terminator,
    /// Dump output, trimmed.
    Payload(&'a str),
}

/// Substring-based classification rule for console lines.
///
/// Markers are never blank: every line contains the empty string, so a
/// blank prompt marker would end every response before its first line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFraming {
    echo_marker: String,
    prompt_marker: String,
}

impl Default for LineFraming {
    fn default() -> Self {
        Self {
            echo_marker: DEFAULT_ECHO_MARKER.to_string(),
            prompt_marker: DEFAULT_PROMPT_MARKER.to_string(),
        }
    }
}

impl LineFraming {
    /// Creates a framing rule with custom markers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if either marker is blank.
    pub fn new(echo_marker: &str, prompt_marker: &str) -> Result<Self> {
        Ok(Self {
            echo_marker: check_marker("echo", echo_marker)?,
            prompt_marker: check_marker("prompt", prompt_marker)?,
        })
    }

    /// Replaces the prompt marker.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the marker is blank.
    pub fn with_prompt_marker(mut self, prompt_marker: &str) -> Result<Self> {
        self.prompt_marker = check_marker("prompt", prompt_marker)?;
        Ok(self)
    }

    /// Lines containing this are echoes of the command.
    #[must_use]
    pub fn echo_marker(&self) -> &str {
        &self.echo_marker
    }

    /// Lines containing this are the prompt.
    #[must_use]
    pub fn prompt_marker(&self) -> &str {
        &self.prompt_marker
    }

    /// Classifies one received line.
    ///
    /// The echo check runs before the prompt check, so an echoed
    /// `rommon 1 > dump ...` line is skipped rather than ending the
    /// response. A prompt marker anywhere in the line ends it.
    ///
    /// # Examples
    ///
    /// ```
    /// use rommon_dump::console::{LineFraming, LineKind};
    ///
    /// let framing = LineFraming::default();
    /// assert_eq!(framing.classify("  deadbeef \r"), LineKind::Payload("deadbeef"));
    /// assert_eq!(framing.classify("rommon 2 >"), LineKind::Terminator);
    /// ```
    #[must_use]
    pub fn classify<'a>(&self, line: &'a str) -> LineKind<'a> {
        let line = line.trim();
        if line.is_empty() {
            LineKind::Noise
        } else if line.contains(self.echo_marker.as_str()) {
            LineKind::Echo
        } else if line.contains(self.prompt_marker.as_str()) {
            LineKind::Terminator
        } else {
            LineKind::Payload(line)
        }
    }
}

// Lines are trimmed before matching, so surrounding whitespace in a
// marker could never match.
fn check_marker(kind: &str, marker: &str) -> Result<String> {
    let trimmed = marker.trim();
    if trimmed.is_empty() {
        return Err(Error::config(format!("{kind} marker must not be blank")));
    }
    Ok(trimmed.to_string())
}

/// The rommon flash dump command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpCommand {
    /// Start address.
    pub offset: u64,
    /// Number of bytes.
    pub length: u64,
}

impl DumpCommand {
    /// Creates a dump command.
    #[must_use]
    pub const fn new(offset: u64, length: u64) -> Self {
        Self { offset, length }
    }
}

impl fmt::Display for DumpCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dump -b 0x{:x} 0x{:x}", self.offset, self.length)
    }
}
