//! Logging capability for the console session and chunked reader.
//!
//! Library code never calls the global `log` macros directly. It receives a
//! [`Logger`] at construction time, so verbosity is decided once at startup
//! by [`init_logging`] and tests can capture messages with [`MemoryLogger`].

use log::{Level, LevelFilter};
use std::sync::Mutex;

/// Log target used for every message emitted through [`LogFacade`].
pub const LOG_TARGET: &str = "rommon_dump";

/// Minimal logging capability injected into protocol components.
pub trait Logger {
    /// Logs a debug-level message (every line sent and received).
    fn debug(&self, msg: &str);

    /// Logs an info-level message (progress).
    fn info(&self, msg: &str);
}

impl<L: Logger + ?Sized> Logger for &L {
    fn debug(&self, msg: &str) {
        (**self).debug(msg);
    }

    fn info(&self, msg: &str) {
        (**self).info(msg);
    }
}

/// Forwards messages to the process-wide `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFacade;

impl Logger for LogFacade {
    fn debug(&self, msg: &str) {
        log::debug!(target: LOG_TARGET, "{msg}");
    }

    fn info(&self, msg: &str) {
        log::info!(target: LOG_TARGET, "{msg}");
    }
}

/// Records messages in memory.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl MemoryLogger {
    /// Creates an empty logger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every recorded message with its level.
    pub fn records(&self) -> Vec<(Level, String)> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Returns the recorded messages at `level`.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, msg)| msg)
            .collect()
    }

    fn push(&self, level: Level, msg: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.push((level, msg.to_string()));
        }
    }
}

impl Logger for MemoryLogger {
    fn debug(&self, msg: &str) {
        self.push(Level::Debug, msg);
    }

    fn info(&self, msg: &str) {
        self.push(Level::Info, msg);
    }
}

/// Resolves the level filter for the `--verbose` flag.
#[must_use]
pub const fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Initializes `env_logger` once for the process.
///
/// `RUST_LOG` still refines the filter on top of the verbosity flag.
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging(verbose: bool) -> LevelFilter {
    let level = level_for(verbose);
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_target(false)
        .try_init();
    level
}
