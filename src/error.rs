//! Error types for rommon-dump operations.
//!
//! This module provides the error hierarchy using `thiserror` for the
//! serial transport, the console protocol, output file handling and the CLI.

use thiserror::Error;

/// Result type alias for rommon-dump operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Serial transport errors.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Console protocol errors.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// I/O errors (output file operations).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// Configuration errors (invalid range, chunk size, ...).
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

impl Error {
    /// Builds a configuration error from any displayable message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Errors raised by a line transport.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The device could not be opened (bad path, permission, in use).
    #[error("failed to open {port}: {reason}")]
    OpenFailed {
        /// Device identifier.
        port: String,
        /// Reason reported by the OS.
        reason: String,
    },

    /// Reading from the device failed for a reason other than a timeout.
    #[error("read failed: {0}")]
    ReadFailed(String),

    /// Writing to the device failed.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// The transport was closed.
    #[error("transport closed")]
    Closed,
}

/// Errors in the console request/response exchange.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// No line arrived within the configured response timeout.
    #[error(
        "no prompt after dump of 0x{length:x} bytes at 0x{offset:x} ({lines_collected} lines collected)"
    )]
    Stalled {
        /// Offset of the stalled exchange.
        offset: u64,
        /// Length of the stalled exchange.
        length: u64,
        /// Payload lines received before the stall.
        lines_collected: usize,
    },

    /// A session transition was attempted from the wrong state.
    #[error("invalid session state: expected {expected}, found {actual}")]
    InvalidState {
        /// State required by the transition.
        expected: &'static str,
        /// State the session was in.
        actual: &'static str,
    },
}

/// I/O-specific errors for the output file.
#[derive(Error, Debug)]
pub enum IoError {
    /// Failed to create or truncate the output file.
    #[error("failed to create file: {path}: {reason}")]
    CreateFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Failed to write or flush the output file.
    #[error("failed to write file: {path}: {reason}")]
    WriteFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Directory creation error.
    #[error("failed to create directory: {path}: {reason}")]
    DirectoryFailed {
        /// Path to the directory.
        path: String,
        /// Reason for failure.
        reason: String,
    },
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invalid argument provided.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Unsupported `--format` value.
    #[error("unsupported output format: {0}")]
    OutputFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("length must be > 0");
        assert_eq!(err.to_string(), "configuration error: length must be > 0");
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::OpenFailed {
            port: "/dev/ttyUSB0".to_string(),
            reason: "permission denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to open /dev/ttyUSB0: permission denied"
        );

        assert_eq!(TransportError::Closed.to_string(), "transport closed");
    }

    #[test]
    fn test_protocol_error_display() {
        let err = ProtocolError::Stalled {
            offset: 0x10000,
            length: 0x100,
            lines_collected: 3,
        };
        assert_eq!(
            err.to_string(),
            "no prompt after dump of 0x100 bytes at 0x10000 (3 lines collected)"
        );

        let err = ProtocolError::InvalidState {
            expected: "idle",
            actual: "draining",
        };
        assert!(err.to_string().contains("expected idle"));
    }

    #[test]
    fn test_io_error_variants() {
        let err = IoError::CreateFailed {
            path: "/tmp/out.txt".to_string(),
            reason: "read-only".to_string(),
        };
        assert!(err.to_string().contains("/tmp/out.txt"));

        let err = IoError::WriteFailed {
            path: "/tmp/out.txt".to_string(),
            reason: "disk full".to_string(),
        };
        assert!(err.to_string().contains("disk full"));

        let err = IoError::DirectoryFailed {
            path: "/tmp/dir".to_string(),
            reason: "exists".to_string(),
        };
        assert!(err.to_string().contains("directory"));
    }

    #[test]
    fn test_error_from_transport() {
        let err: Error = TransportError::Closed.into();
        assert!(matches!(err, Error::Transport(TransportError::Closed)));
    }

    #[test]
    fn test_error_from_command() {
        let err: Error = CommandError::InvalidArgument("--length".to_string()).into();
        assert!(matches!(err, Error::Command(_)));
        assert!(err.to_string().contains("invalid argument"));
    }
}
