//! rommon console protocol.
//!
//! A [`ConsoleSession`] drives one dump exchange at a time; the
//! [`LineFraming`] rule decides what each received line means.

pub mod framing;
pub mod session;

pub use framing::{
    DEFAULT_ECHO_MARKER, DEFAULT_PROMPT_MARKER, DumpCommand, LineFraming, LineKind,
};
pub use session::{ConsoleSession, SessionConfig, SessionState};
