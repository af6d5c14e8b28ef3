//! Transport layer for rommon-dump.
//!
//! Provides the line-oriented [`LineTransport`] interface with a serial
//! port implementation and a scripted one for tests.

pub mod lines;
pub mod scripted;
pub mod serial;
pub mod traits;

pub use lines::LineSplitter;
pub use scripted::{ScriptEvent, ScriptedTransport};
pub use serial::{
    DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT, FlowControl, Parity, SerialTransport,
    TransportConfig,
};
pub use traits::{LINE_ENDING, LineTransport};
