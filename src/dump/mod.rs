//! Chunked flash dumping.
//!
//! Splits an address range into dump-sized chunks, runs one console
//! exchange per chunk and streams the lines to a sink:
//!
//! - **Range**: [`AddressRange`] and its [`Chunk`] partition
//! - **Reader**: [`ChunkedReader`], the per-chunk driver
//! - **Sink**: [`FileSink`] for the output file, [`MemorySink`] for tests

pub mod range;
pub mod reader;
pub mod sink;

pub use range::{AddressRange, Chunk, Chunks, DEVICE_ADDRESS_LIMIT};
pub use reader::{ChunkedReader, DEFAULT_MAX_CHUNK_SIZE, DumpSummary};
pub use sink::{FileSink, LineSink, MemorySink};
