//! `rommon-dump`: dump a device's flash through its rommon console.
//!
//! Opens the serial port named by `--uart`, reads `--length` bytes from
//! `--base` one dump command at a time and writes the returned lines to
//! `--output`. Prints a summary on success; exits with status 1 on any
//! failure, leaving whatever chunks were already flushed in the file.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::Parser;
use rommon_dump::cli::{Cli, OutputFormat, execute, format_error};
use rommon_dump::logging::{LogFacade, init_logging};
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.format);
    init_logging(cli.verbose);

    match execute(&cli, LogFacade) {
        Ok(summary) => print_summary(&summary),
        Err(e) => {
            let message = format_error(&e, format);
            match format {
                // Scripts parsing `--format json` read stdout only.
                OutputFormat::Json => println!("{message}"),
                OutputFormat::Text => eprintln!("Error: {message}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn print_summary(summary: &str) -> ExitCode {
    match write!(io::stdout(), "{summary}") {
        Err(e) if e.kind() != io::ErrorKind::BrokenPipe => {
            eprintln!("Error writing to stdout: {e}");
            ExitCode::FAILURE
        }
        _ => ExitCode::SUCCESS,
    }
}
