//! Line transport trait definition.
//!
//! Defines the line-oriented interface the console session drives, so the
//! protocol logic runs unchanged over a real serial port or a scripted one.

use crate::error::Result;

/// Line terminator appended by [`LineTransport::write_line`].
pub const LINE_ENDING: &str = "\r\n";

/// Bidirectional, newline-normalized text line stream.
///
/// Implementations hold an exclusive handle to the device for their whole
/// lifetime and release it on [`close`](LineTransport::close) or drop.
pub trait LineTransport {
    /// Writes `text` followed by `\r\n` and flushes immediately.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::TransportError::WriteFailed`] if the device
    /// rejects the write, or [`crate::error::TransportError::Closed`] after
    /// [`close`](LineTransport::close).
    fn write_line(&mut self, text: &str) -> Result<()>;

    /// Reads one line, without its terminator.
    ///
    /// `\n`, `\r\n` and a bare `\r` all end a line. Bytes received before a
    /// read timeout are returned as a line.
    ///
    /// Blocks up to the configured read timeout. A timeout is not an error:
    /// it yields `Ok(None)`, which callers treat as "nothing available yet".
    /// A blank line yields `Ok(Some(String::new()))`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::TransportError::ReadFailed`] on device errors,
    /// or [`crate::error::TransportError::Closed`] after
    /// [`close`](LineTransport::close).
    fn read_line(&mut self) -> Result<Option<String>>;

    /// Releases the device. Every later read or write fails with
    /// [`crate::error::TransportError::Closed`].
    fn close(&mut self);

    /// Returns whether the transport has been closed.
    fn is_closed(&self) -> bool;

    /// Returns the device identifier, for log messages.
    fn name(&self) -> &str;
}

impl<T: LineTransport + ?Sized> LineTransport for Box<T> {
    fn write_line(&mut self, text: &str) -> Result<()> {
        (**self).write_line(text)
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        (**self).read_line()
    }

    fn close(&mut self) {
        (**self).close();
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
