//! Console session: one dump exchange at a time over a line transport.
//!
//! The rommon prompt is not a fixed string, so the session synchronizes by
//! draining: it provokes a fresh prompt and discards everything until a
//! read times out. It then sends the dump command and collects payload
//! lines until the next prompt shows up.

use crate::console::framing::{DumpCommand, LineFraming, LineKind};
use crate::error::{ProtocolError, Result};
use crate::logging::Logger;
use crate::transport::LineTransport;
use std::fmt;
use std::time::{Duration, Instant};

/// Phase of the current exchange.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No exchange in progress.
    #[default]
    Idle,
    /// Discarding stale output before a command.
    Draining,
    /// Command sent, collecting lines until the prompt.
    AwaitingResponse,
}

impl SessionState {
    /// Returns the state name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Draining => "draining",
            Self::AwaitingResponse => "awaiting-response",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Line classification rule.
    pub framing: LineFraming,
    /// Longest silence tolerated while waiting for the prompt.
    ///
    /// `None` waits forever, which hangs if the device never prints its
    /// prompt again. With `Some`, a silence longer than this fails the
    /// exchange with [`ProtocolError::Stalled`].
    pub response_timeout: Option<Duration>,
}

impl SessionConfig {
    /// Sets the line classification rule.
    #[must_use]
    pub fn framing(mut self, framing: LineFraming) -> Self {
        self.framing = framing;
        self
    }

    /// Sets the response timeout.
    #[must_use]
    pub const fn response_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.response_timeout = timeout;
        self
    }
}

/// Request/response driver for the rommon console.
///
/// # Examples
///
/// ```
/// use rommon_dump::console::ConsoleSession;
/// use rommon_dump::logging::MemoryLogger;
/// use rommon_dump::transport::ScriptedTransport;
///
/// let transport = ScriptedTransport::new()
///     .with_timeout()
///     .with_line("dump -b 0x0 0x10")
///     .with_line("deadbeef")
///     .with_line("rommon 2 >");
/// let logger = MemoryLogger::new();
/// let mut session = ConsoleSession::new(transport, &logger);
///
/// let lines = session.read_flash(0, 0x10).unwrap();
/// assert_eq!(lines, vec!["deadbeef\n".to_string()]);
/// ```
pub struct ConsoleSession<T: LineTransport, L: Logger> {
    transport: T,
    logger: L,
    config: SessionConfig,
    state: SessionState,
}

impl<T: LineTransport, L: Logger> ConsoleSession<T, L> {
    /// Creates a session with the default configuration.
    pub fn new(transport: T, logger: L) -> Self {
        Self::with_config(transport, logger, SessionConfig::default())
    }

    /// Creates a session with a custom configuration.
    pub const fn with_config(transport: T, logger: L, config: SessionConfig) -> Self {
        Self {
            transport,
            logger,
            config,
            state: SessionState::Idle,
        }
    }

    /// Current exchange phase.
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Session configuration.
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Injected logger.
    pub const fn logger(&self) -> &L {
        &self.logger
    }

    /// Underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Consumes the session and returns the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Closes the transport. Later exchanges fail with
    /// [`crate::error::TransportError::Closed`].
    pub fn close(&mut self) {
        self.logger.debug(&format!("Closing {}", self.transport.name()));
        self.transport.close();
        self.state = SessionState::Idle;
    }

    /// Discards pending console output.
    ///
    /// Sends a blank line to provoke a prompt, then reads until a read
    /// times out. Returns the number of lines discarded.
    pub fn drain(&mut self) -> Result<usize> {
        self.transition(SessionState::Idle, SessionState::Draining)?;
        let result = self.discard_pending();
        self.state = SessionState::Idle;
        result
    }

    /// Dumps `length` bytes of flash starting at `offset`.
    ///
    /// Returns the payload lines in received order, each with a trailing
    /// `\n`. Blank lines in the device output are indistinguishable from
    /// noise and are dropped.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, or with [`ProtocolError::Stalled`] when a
    /// response timeout is configured and the prompt never arrives. The
    /// session is back to [`SessionState::Idle`] after a failure.
    pub fn read_flash(&mut self, offset: u64, length: u64) -> Result<Vec<String>> {
        self.transition(SessionState::Idle, SessionState::Draining)?;
        let result = self.exchange(DumpCommand::new(offset, length));
        if result.is_err() {
            self.state = SessionState::Idle;
        }
        result
    }

    fn exchange(&mut self, command: DumpCommand) -> Result<Vec<String>> {
        self.discard_pending()?;

        let command_line = command.to_string();
        self.logger.debug(&format!("Sending command: {command_line}"));
        self.transport.write_line(&command_line)?;
        self.transition(SessionState::Draining, SessionState::AwaitingResponse)?;

        let lines = self.collect(command)?;
        self.transition(SessionState::AwaitingResponse, SessionState::Idle)?;
        Ok(lines)
    }

    fn discard_pending(&mut self) -> Result<usize> {
        self.logger.debug("Sending blank line");
        self.transport.write_line("")?;

        let mut discarded = 0;
        while let Some(line) = self.transport.read_line()? {
            self.logger.debug(&format!("Discarded: \"{line}\""));
            discarded += 1;
        }
        Ok(discarded)
    }

    fn collect(&mut self, command: DumpCommand) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        let mut last_line_at = Instant::now();

        loop {
            let Some(raw) = self.transport.read_line()? else {
                if let Some(timeout) = self.config.response_timeout
                    && last_line_at.elapsed() >= timeout
                {
                    return Err(ProtocolError::Stalled {
                        offset: command.offset,
                        length: command.length,
                        lines_collected: lines.len(),
                    }
                    .into());
                }
                continue;
            };
            last_line_at = Instant::now();

            match self.config.framing.classify(&raw) {
                LineKind::Noise | LineKind::Echo => {
                    self.logger.debug(&format!("Skipped: \"{raw}\""));
                }
                LineKind::Terminator => {
                    self.logger.debug(&format!("Read: \"{}\"", raw.trim()));
                    return Ok(lines);
                }
                LineKind::Payload(line) => {
                    self.logger.debug(&format!("Read: \"{line}\""));
                    lines.push(format!("{line}\n"));
                }
            }
        }
    }

    fn transition(&mut self, from: SessionState, to: SessionState) -> Result<()> {
        if self.state != from {
            return Err(ProtocolError::InvalidState {
                expected: from.as_str(),
                actual: self.state.as_str(),
            }
            .into());
        }
        self.state = to;
        Ok(())
    }
}

impl<T: LineTransport, L: Logger> fmt::Debug for ConsoleSession<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleSession")
            .field("transport", &self.transport.name())
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
