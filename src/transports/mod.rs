//! Transport implementations and startup selection

pub mod file;
pub mod memory;
pub mod network;
#[cfg(feature = "serial")]
pub mod serial;

pub use file::FileTransport;
pub use memory::{MemorySink, MemoryTransport};
pub use network::NetworkTransport;
#[cfg(feature = "serial")]
pub use serial::SerialTransport;

pub use crate::core::Transport;

use crate::core::config::{
    SERIAL_PORT_VAR, TCP_HOST_VAR, TCP_PORT_VAR, TCP_TIMEOUT_VAR, TRACE_FILE_VAR,
};
use crate::core::{Diagnostics, Result, TraceError, TracerConfig, TransportKind};
use std::time::Duration;

/// Build the transport named by `config`.
///
/// Exactly one branch runs per [`TransportKind`]. Any failure, whether a
/// missing required parameter or a sink that cannot be opened, is reported
/// once through `diagnostics` and yields `None`: the dispatcher then runs
/// disabled and drops every trace.
pub fn select_transport(
    config: &TracerConfig,
    diagnostics: &Diagnostics,
) -> Option<Box<dyn Transport>> {
    let selected = match config.method() {
        TransportKind::File => file_transport(config, diagnostics),
        TransportKind::Tcp => network_transport(config),
        TransportKind::SerialPort => serial_transport(config),
    };

    match selected {
        Ok(transport) => Some(transport),
        Err(e) => {
            diagnostics.error(format_args!("{}. Tracing disabled.", e));
            None
        }
    }
}

fn file_transport(config: &TracerConfig, diagnostics: &Diagnostics) -> Result<Box<dyn Transport>> {
    if let Some(path) = config.param(TRACE_FILE_VAR) {
        return Ok(Box::new(FileTransport::open(path)?));
    }

    // Warn about the default only once it has opened
    let transport = FileTransport::open(FileTransport::DEFAULT_PATH).map_err(|e| {
        TraceError::config(
            "FILE transport",
            format!("{} is not set and the default file failed: {}", TRACE_FILE_VAR, e),
        )
    })?;
    diagnostics.warn(format_args!(
        "Specify trace file with 'export {}=?'. Default file location '{}' will be used",
        TRACE_FILE_VAR,
        FileTransport::DEFAULT_PATH
    ));
    Ok(Box::new(transport))
}

fn network_transport(config: &TracerConfig) -> Result<Box<dyn Transport>> {
    let (host, port) = match (config.param(TCP_HOST_VAR), config.param(TCP_PORT_VAR)) {
        (Some(host), Some(port)) => (host, port),
        (None, _) => return Err(TraceError::missing_param("TCP", TCP_HOST_VAR)),
        (_, None) => return Err(TraceError::missing_param("TCP", TCP_PORT_VAR)),
    };

    let port: u16 = port.trim().parse().map_err(|_| {
        TraceError::config("TCP transport", format!("invalid {} '{}'", TCP_PORT_VAR, port))
    })?;

    let mut transport = NetworkTransport::new(host, port);
    if let Some(raw) = config.param(TCP_TIMEOUT_VAR) {
        let millis: u64 = raw.trim().parse().map_err(|_| {
            TraceError::config("TCP transport", format!("invalid {} '{}'", TCP_TIMEOUT_VAR, raw))
        })?;
        transport = transport.with_timeout(Duration::from_millis(millis.max(1)));
    }
    Ok(Box::new(transport))
}

#[cfg(feature = "serial")]
fn serial_transport(config: &TracerConfig) -> Result<Box<dyn Transport>> {
    use crate::core::config::SERIAL_BAUD_VAR;

    let device = config
        .param(SERIAL_PORT_VAR)
        .ok_or_else(|| TraceError::missing_param("SERIALPORT", SERIAL_PORT_VAR))?;

    let baud_rate = match config.param(SERIAL_BAUD_VAR) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            TraceError::config("SERIALPORT transport", format!("invalid {} '{}'", SERIAL_BAUD_VAR, raw))
        })?,
        None => serial::DEFAULT_BAUD_RATE,
    };

    Ok(Box::new(SerialTransport::open(device, baud_rate)?))
}

#[cfg(not(feature = "serial"))]
fn serial_transport(config: &TracerConfig) -> Result<Box<dyn Transport>> {
    Err(TraceError::transport(
        "SERIALPORT",
        config.param(SERIAL_PORT_VAR).unwrap_or("<unset>"),
        "built without the 'serial' feature",
    ))
}
