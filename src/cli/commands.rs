//! CLI command implementation.
//!
//! Wires the parsed arguments to the serial transport, the console session,
//! the chunked reader and the output file.

use crate::cli::output::{OutputFormat, format_summary};
use crate::cli::parser::Cli;
use crate::console::ConsoleSession;
use crate::dump::{ChunkedReader, FileSink};
use crate::error::{CommandError, Result};
use crate::logging::Logger;
use crate::transport::{LineTransport, SerialTransport};

/// Executes the dump described by the CLI arguments.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
/// * `logger` - Logger injected into the session and reader.
///
/// # Returns
///
/// The formatted summary on success.
///
/// # Errors
///
/// Returns an error if the arguments are invalid, the serial port cannot be
/// opened, the output file cannot be written, or the dump fails.
pub fn execute<L: Logger>(cli: &Cli, logger: L) -> Result<String> {
    // Reject bad arguments before touching the hardware.
    OutputFormat::from_name(&cli.format)?;
    cli.address_range()?;
    cli.session_config()?;
    if cli.read_timeout_ms == 0 {
        return Err(
            CommandError::InvalidArgument("--read-timeout-ms must be > 0".to_string()).into(),
        );
    }

    logger.info(&format!("Using serial port {}", cli.uart));
    let transport = SerialTransport::open(&cli.transport_config())?;
    logger.debug("Opened serial port successfully");

    run_dump(cli, transport, logger)
}

/// Runs the dump over an already opened transport.
///
/// The transport is closed once the dump finishes, successfully or not.
///
/// # Errors
///
/// Returns an error if the output file cannot be written or the dump fails.
pub fn run_dump<T: LineTransport, L: Logger>(cli: &Cli, transport: T, logger: L) -> Result<String> {
    let format = OutputFormat::from_name(&cli.format)?;
    let range = cli.address_range()?;

    let session = ConsoleSession::with_config(transport, logger, cli.session_config()?);
    let mut reader = ChunkedReader::with_chunk_size(session, cli.chunk_size)?;

    reader
        .session()
        .logger()
        .info(&format!("Writing to file {}", cli.output.display()));
    let result = FileSink::create(&cli.output).and_then(|mut sink| reader.dump(&range, &mut sink));
    reader.session_mut().close();

    let summary = result?;
    Ok(format_summary(&summary, &cli.output, format))
}
