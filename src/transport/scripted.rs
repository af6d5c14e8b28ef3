//! Scripted line transport.
//!
//! Replays a queue of canned lines and read timeouts and records everything
//! written to it. Used to exercise the console session without hardware.

use crate::error::{Result, TransportError};
use crate::transport::traits::LineTransport;
use std::collections::VecDeque;

/// One scripted response to a `read_line` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptEvent {
    /// A received line (without terminator).
    Line(String),
    /// A read that times out with no data.
    Timeout,
    /// A read that fails, as when the cable is pulled.
    Error(String),
}

impl From<&str> for ScriptEvent {
    fn from(line: &str) -> Self {
        Self::Line(line.to_string())
    }
}

/// Transport that replays [`ScriptEvent`]s.
///
/// Once the script is exhausted every read times out.
///
/// # Examples
///
/// ```
/// use rommon_dump::transport::{LineTransport, ScriptEvent, ScriptedTransport};
///
/// let mut transport = ScriptedTransport::new()
///     .with_line("deadbeef")
///     .with_timeout();
/// assert_eq!(transport.read_line().unwrap(), Some("deadbeef".to_string()));
/// assert_eq!(transport.read_line().unwrap(), None);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: VecDeque<ScriptEvent>,
    written: Vec<String>,
    reads: usize,
    closed: bool,
}

impl ScriptedTransport {
    /// Creates a transport with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport replaying `events` in order.
    #[must_use]
    pub fn from_events<I, E>(events: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<ScriptEvent>,
    {
        Self {
            script: events.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Appends a line to the script.
    #[must_use]
    pub fn with_line(mut self, line: &str) -> Self {
        self.push_line(line);
        self
    }

    /// Appends a read timeout to the script.
    #[must_use]
    pub fn with_timeout(mut self) -> Self {
        self.script.push_back(ScriptEvent::Timeout);
        self
    }

    /// Appends a line to the script in place.
    pub fn push_line(&mut self, line: &str) {
        self.script.push_back(ScriptEvent::Line(line.to_string()));
    }

    /// Appends a read timeout to the script in place.
    pub fn push_timeout(&mut self) {
        self.script.push_back(ScriptEvent::Timeout);
    }

    /// Appends a failing read to the script in place.
    pub fn push_error(&mut self, reason: &str) {
        self.script.push_back(ScriptEvent::Error(reason.to_string()));
    }

    /// Lines written so far, without terminators.
    #[must_use]
    pub fn written(&self) -> &[String] {
        &self.written
    }

    /// Number of `read_line` calls served.
    #[must_use]
    pub const fn reads(&self) -> usize {
        self.reads
    }

    /// Number of events still queued.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl LineTransport for ScriptedTransport {
    fn write_line(&mut self, text: &str) -> Result<()> {
        if self.closed {
            return Err(TransportError::Closed.into());
        }
        self.written.push(text.to_string());
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        if self.closed {
            return Err(TransportError::Closed.into());
        }
        self.reads += 1;
        match self.script.pop_front() {
            Some(ScriptEvent::Line(line)) => Ok(Some(line)),
            Some(ScriptEvent::Timeout) | None => Ok(None),
            Some(ScriptEvent::Error(reason)) => Err(TransportError::ReadFailed(reason).into()),
        }
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
