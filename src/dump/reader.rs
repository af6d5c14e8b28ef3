//! Chunked flash reader.
//!
//! rommon can only dump a bounded amount per command, so larger ranges are
//! walked chunk by chunk with one console exchange each.

use crate::console::ConsoleSession;
use crate::dump::range::AddressRange;
use crate::dump::sink::LineSink;
use crate::error::{Error, Result};
use crate::logging::Logger;
use crate::transport::LineTransport;
use serde::Serialize;

/// Largest transfer rommon handles reliably in one dump command.
pub const DEFAULT_MAX_CHUNK_SIZE: u64 = 64 * 1024;

/// Outcome of a completed dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpSummary {
    /// Transport the dump ran over.
    pub port: String,
    /// First address dumped.
    pub base: u64,
    /// Bytes requested.
    pub length: u64,
    /// Maximum bytes per dump command.
    pub chunk_size: u64,
    /// Dump commands issued.
    pub exchanges: u64,
    /// Payload lines written to the sink.
    pub lines: usize,
}

/// Walks an address range one dump command at a time.
///
/// # Examples
///
/// ```
/// use rommon_dump::console::ConsoleSession;
/// use rommon_dump::dump::{AddressRange, ChunkedReader, MemorySink};
/// use rommon_dump::logging::MemoryLogger;
/// use rommon_dump::transport::ScriptedTransport;
///
/// let transport = ScriptedTransport::new()
///     .with_timeout()
///     .with_line("0011")
///     .with_line("rommon 1 >");
/// let logger = MemoryLogger::new();
/// let mut reader = ChunkedReader::new(ConsoleSession::new(transport, &logger));
///
/// let mut sink = MemorySink::new();
/// let range = AddressRange::new(0, 2).unwrap();
/// let summary = reader.dump(&range, &mut sink).unwrap();
/// assert_eq!(summary.exchanges, 1);
/// assert_eq!(sink.contents(), "0011\n");
/// ```
#[derive(Debug)]
pub struct ChunkedReader<T: LineTransport, L: Logger> {
    session: ConsoleSession<T, L>,
    max_chunk_size: u64,
}

impl<T: LineTransport, L: Logger> ChunkedReader<T, L> {
    /// Creates a reader using [`DEFAULT_MAX_CHUNK_SIZE`].
    pub const fn new(session: ConsoleSession<T, L>) -> Self {
        Self {
            session,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
        }
    }

    /// Creates a reader with a custom chunk size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `max_chunk_size` is zero.
    pub fn with_chunk_size(session: ConsoleSession<T, L>, max_chunk_size: u64) -> Result<Self> {
        if max_chunk_size == 0 {
            return Err(Error::config("chunk size must be > 0"));
        }
        Ok(Self {
            session,
            max_chunk_size,
        })
    }

    /// Maximum bytes per dump command.
    pub const fn max_chunk_size(&self) -> u64 {
        self.max_chunk_size
    }

    /// The console session.
    pub const fn session(&self) -> &ConsoleSession<T, L> {
        &self.session
    }

    /// Mutable access to the console session.
    pub const fn session_mut(&mut self) -> &mut ConsoleSession<T, L> {
        &mut self.session
    }

    /// Consumes the reader and returns the session.
    pub fn into_session(self) -> ConsoleSession<T, L> {
        self.session
    }

    /// Dumps `range` into `sink`, in ascending address order.
    ///
    /// The sink is flushed after every chunk.
    ///
    /// # Errors
    ///
    /// Any transport, protocol or sink error aborts the dump. Chunks already
    /// flushed stay in the sink.
    pub fn dump<S: LineSink + ?Sized>(
        &mut self,
        range: &AddressRange,
        sink: &mut S,
    ) -> Result<DumpSummary> {
        let total = range.chunk_count(self.max_chunk_size);
        let logger = self.session.logger();
        logger.info(&format!(
            "Dumping flash from 0x{:x} for {} bytes in {total} chunk(s)",
            range.base(),
            range.length()
        ));

        let mut summary = DumpSummary {
            port: self.session.transport().name().to_string(),
            base: range.base(),
            length: range.length(),
            chunk_size: self.max_chunk_size,
            exchanges: 0,
            lines: 0,
        };

        for chunk in range.chunks(self.max_chunk_size)? {
            self.session.logger().debug(&format!(
                "Dumping {} bytes from 0x{:x}",
                chunk.size, chunk.offset
            ));

            let lines = self.session.read_flash(chunk.offset, chunk.size)?;
            sink.write_lines(&lines)?;
            sink.flush()?;

            summary.exchanges += 1;
            summary.lines += lines.len();
            self.session.logger().info(&format!(
                "Chunk {}/{total} at 0x{:x}: {} line(s)",
                chunk.index + 1,
                chunk.offset,
                lines.len()
            ));
        }

        Ok(summary)
    }
}
