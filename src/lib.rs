//! # utrace
//!
//! A minimal asynchronous tracing facility. Callers emit leveled, formatted
//! messages; the dispatcher filters them by severity and hands each accepted
//! message to a background worker that writes it to one configured transport.
//!
//! ## Features
//!
//! - **Fire and forget**: callers return once the message is queued
//! - **Serialized sink**: records never interleave, whatever the caller count
//! - **Three transports**: local file, TCP endpoint, serial port
//! - **Safe under misconfiguration**: a transport that cannot be set up
//!   disables tracing with one diagnostic instead of failing the host program
//!
//! ## Configuration
//!
//! [`TracerConfig::resolve`] reads `TRACELEVEL`, `TRACEMETHOD` and the chosen
//! transport's parameters from the environment once at startup. See
//! [`core::config`] for the full table.

pub mod core;
pub mod macros;
pub mod transports;

pub mod prelude {
    pub use crate::core::{
        ConfigSource, Diagnostics, DispatchMetrics, Dispatcher, DispatcherBuilder, EnvSource,
        OverflowPolicy, Result, TraceError, TraceLevel, TraceMessage, TracerConfig, Transport,
        TransportKind,
    };
    pub use crate::transports::{FileTransport, MemoryTransport, NetworkTransport};
}

pub use crate::core::{
    ConfigSource, DiagnosticCallback, Diagnostics, DispatchMetrics, Dispatcher, DispatcherBuilder,
    EnvSource, OverflowPolicy, Result, TraceError, TraceLevel, TraceMessage, TracerConfig,
    Transport, TransportKind, DEFAULT_WORKERS,
};
pub use crate::transports::{select_transport, FileTransport, MemorySink, MemoryTransport, NetworkTransport};
#[cfg(feature = "serial")]
pub use crate::transports::SerialTransport;
