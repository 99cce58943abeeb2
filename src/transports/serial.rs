//! Serial-port transport
//!
//! Opens the device once and writes each record, newline-terminated, straight
//! to the port handle.

use crate::core::{Result, TraceError, Transport};
use std::io::Write;
use std::time::Duration;

/// Default baud rate when `SERIAL_BAUD` is not set
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

const WRITE_TIMEOUT: Duration = Duration::from_millis(500);

pub struct SerialTransport {
    port: Box<dyn Write + Send>,
    device: String,
}

impl SerialTransport {
    /// Open a serial device such as `/dev/ttyUSB0` or `COM3`
    pub fn open(device: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(device, baud_rate)
            .timeout(WRITE_TIMEOUT)
            .open()
            .map_err(|e| TraceError::transport("serial", device, e.to_string()))?;

        Ok(Self {
            port: Box::new(port),
            device: device.to_string(),
        })
    }

    /// Wrap an already-open device handle
    pub fn from_writer(device: impl Into<String>, writer: impl Write + Send + 'static) -> Self {
        Self {
            port: Box::new(writer),
            device: device.into(),
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }
}

impl Transport for SerialTransport {
    fn write(&mut self, record: &str) -> Result<()> {
        let mut line = Vec::with_capacity(record.len() + 1);
        line.extend_from_slice(record.as_bytes());
        line.push(b'\n');

        self.port
            .write_all(&line)
            .and_then(|()| self.port.flush())
            .map_err(|e| TraceError::io_operation("writing serial device", self.device.clone(), e))
    }

    fn flush(&mut self) -> Result<()> {
        self.port.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "serial"
    }
}
