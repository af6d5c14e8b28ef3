//! # rommon-dump
//!
//! Reads flash memory from a boot-monitor (rommon) console over a serial
//! line.
//!
//! The monitor only speaks a line-oriented text protocol, so the dump is
//! driven the way a person would at the prompt: issue
//! `dump -b <offset> <length>` for one chunk, collect the printed lines
//! until the prompt comes back, repeat for the next chunk.
//!
//! ## Features
//!
//! - **Console Session**: prompt synchronization by draining, echo and
//!   prompt filtering, optional bounded wait for the prompt
//! - **Chunked Reader**: arbitrary ranges split into per-command chunks
//! - **Serial Transport**: `serialport` backed, plus a scripted transport
//!   for tests
//! - **Incremental Output**: output flushed after every chunk

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod console;
pub mod dump;
pub mod error;
pub mod logging;
pub mod transport;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export protocol types
pub use console::{ConsoleSession, DumpCommand, LineFraming, LineKind, SessionConfig, SessionState};
pub use dump::{AddressRange, Chunk, ChunkedReader, DumpSummary, FileSink, LineSink, MemorySink};
pub use transport::{LineTransport, ScriptedTransport, SerialTransport, TransportConfig};

// Re-export logging types
pub use logging::{LogFacade, Logger, MemoryLogger, init_logging};

// Re-export CLI types
pub use cli::{Cli, OutputFormat};
