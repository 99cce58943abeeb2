//! In-memory transport
//!
//! Keeps every record in a shared buffer. Useful for tests, benchmarks and
//! embedding where the caller wants to inspect trace output directly.

use crate::core::{Result, Transport};
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;

#[derive(Debug, Default)]
struct SinkState {
    bytes: Vec<u8>,
    writes: usize,
}

/// Shared handle to an in-memory byte sink
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    state: Arc<Mutex<SinkState>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn append(&self, bytes: &[u8]) {
        let mut state = self.state.lock();
        state.bytes.extend_from_slice(bytes);
        state.writes += 1;
    }

    /// Everything written so far, decoded lossily as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.state.lock().bytes).into_owned()
    }

    /// Number of write operations received
    pub fn write_count(&self) -> usize {
        self.state.lock().writes
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().bytes.is_empty()
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.bytes.clear();
        state.writes = 0;
    }
}

impl io::Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Transport that appends raw records to a [`MemorySink`]
///
/// # Example
///
/// ```
/// use utrace::prelude::*;
/// use utrace::transports::MemoryTransport;
///
/// let transport = MemoryTransport::new();
/// let sink = transport.sink();
///
/// let dispatcher = Dispatcher::builder()
///     .config(TracerConfig::new(TraceLevel::Info, TransportKind::File))
///     .transport(transport)
///     .build();
/// dispatcher.error("hello");
/// dispatcher.shutdown();
///
/// assert_eq!(sink.contents(), "ERROR: hello");
/// ```
#[derive(Debug, Default)]
pub struct MemoryTransport {
    sink: MemorySink,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(sink: MemorySink) -> Self {
        Self { sink }
    }

    /// A handle observing this transport's output
    pub fn sink(&self) -> MemorySink {
        self.sink.clone()
    }
}

impl Transport for MemoryTransport {
    fn write(&mut self, record: &str) -> Result<()> {
        self.sink.append(record.as_bytes());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
