//! CLI layer for rommon-dump.
//!
//! Provides the command-line interface using clap and the glue between the
//! parsed arguments and the dump engine.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::{execute, run_dump};
pub use output::{OutputFormat, format_error, format_summary};
pub use parser::{Cli, parse_int};
