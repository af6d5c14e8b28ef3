//! Serial port transport.
//!
//! Wraps the `serialport` crate and splits what it reads into lines with a
//! [`LineSplitter`]. Port settings are carried by [`TransportConfig`] and
//! converted to `serialport` types when the device is opened.

use crate::error::{Result, TransportError};
use crate::transport::lines::LineSplitter;
use crate::transport::traits::{LINE_ENDING, LineTransport};
use serde::{Deserialize, Serialize};
use serialport::{DataBits, FlowControl as SpFlowControl, Parity as SpParity, SerialPort, StopBits};
use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

/// Default baud rate of the rommon console.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default read timeout. Drain termination depends on it.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

const READ_BUFFER_SIZE: usize = 256;

/// Parity setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    /// No parity bit.
    #[default]
    None,
    /// Odd parity.
    Odd,
    /// Even parity.
    Even,
}

/// Flow control setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowControl {
    /// No flow control.
    #[default]
    None,
    /// XON/XOFF.
    Software,
    /// RTS/CTS.
    Hardware,
}

/// Serial port settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Device path or name (e.g. `/dev/ttyUSB0`, `COM3`).
    pub port: String,
    /// Baud rate.
    pub baud_rate: u32,
    /// Parity.
    pub parity: Parity,
    /// Data bits (5-8).
    pub data_bits: u8,
    /// Stop bits (1 or 2).
    pub stop_bits: u8,
    /// Flow control.
    pub flow_control: FlowControl,
    /// How long a single read blocks before reporting "no data".
    pub read_timeout: Duration,
}

impl TransportConfig {
    /// Creates a config for `port` with the rommon console defaults
    /// (115200 8N1, no flow control, 1 s read timeout).
    #[must_use]
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            parity: Parity::None,
            data_bits: 8,
            stop_bits: 1,
            flow_control: FlowControl::None,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// Sets the baud rate.
    #[must_use]
    pub const fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Sets the parity.
    #[must_use]
    pub const fn parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    /// Sets the stop bits.
    #[must_use]
    pub const fn stop_bits(mut self, stop_bits: u8) -> Self {
        self.stop_bits = stop_bits;
        self
    }

    /// Sets the flow control.
    #[must_use]
    pub const fn flow_control(mut self, flow_control: FlowControl) -> Self {
        self.flow_control = flow_control;
        self
    }

    /// Sets the read timeout.
    #[must_use]
    pub const fn read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }
}

const fn to_serialport_parity(p: Parity) -> SpParity {
    match p {
        Parity::None => SpParity::None,
        Parity::Odd => SpParity::Odd,
        Parity::Even => SpParity::Even,
    }
}

const fn to_serialport_flow_control(f: FlowControl) -> SpFlowControl {
    match f {
        FlowControl::None => SpFlowControl::None,
        FlowControl::Software => SpFlowControl::Software,
        FlowControl::Hardware => SpFlowControl::Hardware,
    }
}

const fn to_serialport_data_bits(bits: u8) -> DataBits {
    match bits {
        5 => DataBits::Five,
        6 => DataBits::Six,
        7 => DataBits::Seven,
        _ => DataBits::Eight,
    }
}

const fn to_serialport_stop_bits(bits: u8) -> StopBits {
    match bits {
        2 => StopBits::Two,
        _ => StopBits::One,
    }
}

fn write_terminated<W: Write + ?Sized>(writer: &mut W, text: &str) -> std::io::Result<()> {
    writer.write_all(text.as_bytes())?;
    writer.write_all(LINE_ENDING.as_bytes())?;
    writer.flush()
}

/// Line transport over a serial port.
pub struct SerialTransport {
    /// `None` once closed.
    port: Option<Box<dyn SerialPort>>,
    lines: LineSplitter,
    name: String,
}

impl SerialTransport {
    /// Opens the serial device described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::OpenFailed`] if the device does not exist,
    /// is not accessible or is already in use.
    pub fn open(config: &TransportConfig) -> Result<Self> {
        let port = serialport::new(&config.port, config.baud_rate)
            .data_bits(to_serialport_data_bits(config.data_bits))
            .parity(to_serialport_parity(config.parity))
            .stop_bits(to_serialport_stop_bits(config.stop_bits))
            .flow_control(to_serialport_flow_control(config.flow_control))
            .timeout(config.read_timeout)
            .open()
            .map_err(|e| TransportError::OpenFailed {
                port: config.port.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self::from_port(port, &config.port))
    }

    /// Wraps an already opened port. Its configured timeout is the read
    /// timeout.
    pub fn from_port(port: Box<dyn SerialPort>, name: impl Into<String>) -> Self {
        Self {
            port: Some(port),
            lines: LineSplitter::new(),
            name: name.into(),
        }
    }
}

impl LineTransport for SerialTransport {
    fn write_line(&mut self, text: &str) -> Result<()> {
        let port = self.port.as_mut().ok_or(TransportError::Closed)?;
        write_terminated(port, text).map_err(|e| TransportError::WriteFailed(e.to_string()))?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = [0u8; READ_BUFFER_SIZE];
        loop {
            let port = self.port.as_mut().ok_or(TransportError::Closed)?;
            if let Some(line) = self.lines.next_line() {
                return Ok(Some(line));
            }

            match port.read(&mut buf) {
                Ok(0) => return Ok(self.lines.take_partial()),
                Ok(n) => self.lines.push(&buf[..n]),
                Err(e) if e.kind() == ErrorKind::TimedOut => {
                    return Ok(self.lines.take_partial());
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(TransportError::ReadFailed(e.to_string()).into()),
            }
        }
    }

    fn close(&mut self) {
        self.port = None;
        self.lines.clear();
    }

    fn is_closed(&self) -> bool {
        self.port.is_none()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("name", &self.name)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = TransportConfig::new("/dev/ttyUSB0");
        assert_eq!(config.port, "/dev/ttyUSB0");
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.data_bits, 8);
        assert_eq!(config.stop_bits, 1);
        assert_eq!(config.flow_control, FlowControl::None);
        assert_eq!(config.read_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_config_builder() {
        let config = TransportConfig::new("COM3")
            .baud_rate(9600)
            .parity(Parity::Even)
            .stop_bits(2)
            .flow_control(FlowControl::Hardware)
            .read_timeout(Duration::from_millis(250));

        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.parity, Parity::Even);
        assert_eq!(config.stop_bits, 2);
        assert_eq!(config.flow_control, FlowControl::Hardware);
        assert_eq!(config.read_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_to_serialport_parity() {
        assert!(matches!(to_serialport_parity(Parity::None), SpParity::None));
        assert!(matches!(to_serialport_parity(Parity::Odd), SpParity::Odd));
        assert!(matches!(to_serialport_parity(Parity::Even), SpParity::Even));
    }

    #[test]
    fn test_to_serialport_flow_control() {
        assert!(matches!(
            to_serialport_flow_control(FlowControl::None),
            SpFlowControl::None
        ));
        assert!(matches!(
            to_serialport_flow_control(FlowControl::Hardware),
            SpFlowControl::Hardware
        ));
    }

    #[test]
    fn test_to_serialport_bits() {
        assert!(matches!(to_serialport_data_bits(7), DataBits::Seven));
        assert!(matches!(to_serialport_data_bits(9), DataBits::Eight));
        assert!(matches!(to_serialport_stop_bits(2), StopBits::Two));
        assert!(matches!(to_serialport_stop_bits(0), StopBits::One));
    }

    #[test]
    fn test_write_terminated() {
        let mut out = Vec::new();
        write_terminated(&mut out, "dump -b 0x0 0x10").unwrap();
        assert_eq!(out, b"dump -b 0x0 0x10\r\n");
    }

    #[test]
    fn test_open_missing_device() {
        let config = TransportConfig::new("/nonexistent/ttyROMMON");
        let err = SerialTransport::open(&config).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Transport(TransportError::OpenFailed { .. })
        ));
        assert!(err.to_string().contains("/nonexistent/ttyROMMON"));
    }

    #[cfg(unix)]
    mod pty {
        use super::*;
        use serialport::TTYPort;

        /// A transport on the slave end of a pty, and the master end that
        /// plays the device.
        fn pty_transport() -> (SerialTransport, TTYPort) {
            let (master, mut slave) = TTYPort::pair().unwrap();
            slave.set_timeout(Duration::from_millis(200)).unwrap();
            (SerialTransport::from_port(Box::new(slave), "pty"), master)
        }

        #[test]
        fn test_reads_full_line() {
            let (mut transport, mut device) = pty_transport();
            device.write_all(b"00000000: 00 01 02 03\n").unwrap();

            assert_eq!(
                transport.read_line().unwrap(),
                Some("00000000: 00 01 02 03".to_string())
            );
            assert_eq!(transport.read_line().unwrap(), None);
        }

        #[test]
        fn test_silence_is_none() {
            let (mut transport, _device) = pty_transport();
            assert_eq!(transport.read_line().unwrap(), None);
        }

        #[test]
        fn test_partial_line_at_timeout() {
            let (mut transport, mut device) = pty_transport();
            device.write_all(b"0000").unwrap();

            assert_eq!(transport.read_line().unwrap(), Some("0000".to_string()));
            assert_eq!(transport.read_line().unwrap(), None);
        }

        #[test]
        fn test_bare_cr_ends_lines() {
            let (mut transport, mut device) = pty_transport();
            device.write_all(b"aa\rbb\r").unwrap();

            assert_eq!(transport.read_line().unwrap(), Some("aa".to_string()));
            assert_eq!(transport.read_line().unwrap(), Some("bb".to_string()));
            assert_eq!(transport.read_line().unwrap(), None);
        }

        #[test]
        fn test_crlf_is_one_terminator() {
            let (mut transport, mut device) = pty_transport();
            device.write_all(b"aa\r\nbb\r\n").unwrap();

            assert_eq!(transport.read_line().unwrap(), Some("aa".to_string()));
            assert_eq!(transport.read_line().unwrap(), Some("bb".to_string()));
            assert_eq!(transport.read_line().unwrap(), None);
        }

        #[test]
        fn test_crlf_split_across_reads() {
            let (mut transport, mut device) = pty_transport();
            device.write_all(b"aa\r").unwrap();
            assert_eq!(transport.read_line().unwrap(), Some("aa".to_string()));

            device.write_all(b"\nbb\n").unwrap();
            assert_eq!(transport.read_line().unwrap(), Some("bb".to_string()));
        }

        #[test]
        fn test_cr_separated_exchange() {
            let (mut transport, mut device) = pty_transport();
            device
                .write_all(b"rommon 1 > dump -b 0x0 0x4\rdeadbeef\rrommon 2 >\r")
                .unwrap();

            assert_eq!(
                transport.read_line().unwrap(),
                Some("rommon 1 > dump -b 0x0 0x4".to_string())
            );
            assert_eq!(transport.read_line().unwrap(), Some("deadbeef".to_string()));
            assert_eq!(transport.read_line().unwrap(), Some("rommon 2 >".to_string()));
        }

        #[test]
        fn test_write_line_reaches_device() {
            let (mut transport, mut device) = pty_transport();
            device.set_timeout(Duration::from_millis(200)).unwrap();
            transport.write_line("dump -b 0x0 0x10").unwrap();

            let mut received = Vec::new();
            let mut buf = [0u8; 64];
            while !received.ends_with(b"\n") {
                let n = device.read(&mut buf).unwrap();
                received.extend_from_slice(&buf[..n]);
            }
            assert!(received.starts_with(b"dump -b 0x0 0x10"));
        }

        #[test]
        fn test_closed_pty_transport() {
            let (mut transport, mut device) = pty_transport();
            device.write_all(b"left\n").unwrap();
            transport.close();

            assert!(transport.is_closed());
            assert!(matches!(
                transport.read_line(),
                Err(crate::Error::Transport(TransportError::Closed))
            ));
        }
    }
}
