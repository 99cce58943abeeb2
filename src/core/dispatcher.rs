//! Asynchronous trace dispatcher
//!
//! The dispatcher owns the resolved configuration and the active transport.
//! Accepted messages are queued as pending writes and delivered by a fixed pool
//! of worker threads; every delivery takes the transport lock, so records never
//! interleave in the sink. Callers return as soon as the message is queued.

use super::{
    config::TracerConfig,
    diagnostics::{Diagnostics, ReportOnce},
    error::TraceError,
    metrics::DispatchMetrics,
    overflow_policy::OverflowPolicy,
    trace_level::TraceLevel,
    trace_message::TraceMessage,
    transport::Transport,
};
use crate::transports::select_transport;
use crossbeam_channel::{bounded, unbounded, Receiver, SendTimeoutError, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::fmt::{self, Write as _};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

/// Default number of worker threads
pub const DEFAULT_WORKERS: usize = 4;

/// One accepted message on its way to the transport
#[derive(Debug)]
struct PendingWrite {
    record: String,
}

impl PendingWrite {
    fn new(message: TraceMessage) -> Self {
        Self {
            record: message.record(),
        }
    }
}

/// State shared between the dispatcher and its workers
struct Shared {
    transport: Mutex<Option<Box<dyn Transport>>>,
    transport_name: String,
    metrics: Arc<DispatchMetrics>,
    diagnostics: Diagnostics,
    write_failure: ReportOnce,
    flush_failure: ReportOnce,
}

impl Shared {
    /// Write one record under the transport lock.
    ///
    /// Errors and panics from the transport are counted and reported once;
    /// they never reach the worker loop.
    fn deliver(&self, pending: &PendingWrite) {
        let mut guard = self.transport.lock();
        let Some(transport) = guard.as_mut() else {
            self.metrics.record_dropped();
            return;
        };

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            transport.write(&pending.record)
        }));

        match outcome {
            Ok(Ok(())) => {
                self.metrics.record_written();
            }
            Ok(Err(e)) => {
                self.metrics.record_failed();
                if self.write_failure.first() {
                    self.diagnostics.error(format_args!(
                        "{} transport write failed: {}. Record dropped; further write failures are counted but not reported.",
                        self.transport_name, e
                    ));
                }
            }
            Err(panic_info) => {
                self.metrics.record_failed();
                if self.write_failure.first() {
                    self.diagnostics.error(format_args!(
                        "{} transport panicked: {}. Record dropped; further write failures are counted but not reported.",
                        self.transport_name,
                        panic_message(&*panic_info)
                    ));
                }
            }
        }
    }

    fn flush(&self) {
        let mut guard = self.transport.lock();
        if let Some(transport) = guard.as_mut() {
            if let Err(e) = transport.flush() {
                if self.flush_failure.first() {
                    self.diagnostics.error(format_args!(
                        "{} transport flush failed: {}",
                        self.transport_name, e
                    ));
                }
            }
        }
    }

    /// Flush and drop the transport, closing its sink
    fn release(&self) {
        if let Some(mut transport) = self.transport.lock().take() {
            if let Err(e) = transport.flush() {
                self.diagnostics.error(format_args!(
                    "{} transport flush failed during shutdown: {}",
                    self.transport_name, e
                ));
            }
        }
    }
}

fn panic_message(panic_info: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn worker_loop(receiver: Receiver<PendingWrite>, shared: Arc<Shared>) {
    // Ends once every sender is gone and the queue is drained
    for pending in receiver.iter() {
        shared.deliver(&pending);
        if receiver.is_empty() {
            shared.flush();
        }
    }
}

/// Explicitly constructed trace dispatcher.
///
/// Build one at the application's composition root and share it by reference
/// or `Arc`. Dropping it (or calling [`Dispatcher::shutdown`]) blocks until
/// every accepted message has been written, then releases the sink.
///
/// # Example
///
/// ```no_run
/// use utrace::prelude::*;
///
/// let dispatcher = Dispatcher::from_env();
/// utrace::error!(dispatcher, "disk {} is {}% full", "/dev/sda1", 97);
/// dispatcher.shutdown();
/// ```
pub struct Dispatcher {
    config: TracerConfig,
    sender: RwLock<Option<Sender<PendingWrite>>>,
    workers: Mutex<Vec<thread::JoinHandle<()>>>,
    shared: Option<Arc<Shared>>,
    metrics: Arc<DispatchMetrics>,
    diagnostics: Diagnostics,
    overflow_policy: OverflowPolicy,
    /// Drops caused by a full queue, counted apart from other drops
    overflow_drops: AtomicU64,
}

impl Dispatcher {
    /// Resolve configuration from the environment and start dispatching
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(TracerConfig::resolve())
    }

    #[must_use]
    pub fn new(config: TracerConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// A dispatcher that drops every message
    #[must_use]
    pub fn disabled() -> Self {
        Self::disabled_with(TracerConfig::default(), Diagnostics::default(), None)
    }

    fn disabled_with(
        config: TracerConfig,
        diagnostics: Diagnostics,
        metrics: Option<Arc<DispatchMetrics>>,
    ) -> Self {
        Self {
            config,
            sender: RwLock::new(None),
            workers: Mutex::new(Vec::new()),
            shared: None,
            metrics: metrics.unwrap_or_default(),
            diagnostics,
            overflow_policy: OverflowPolicy::default(),
            overflow_drops: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Filter, then queue `text` for background delivery.
    ///
    /// Never waits for the write and never reports an error. Messages below
    /// the minimum level, sent to a disabled dispatcher, or sent after
    /// shutdown are discarded.
    pub fn submit(&self, level: TraceLevel, text: impl Into<String>) {
        if !self.config.accepts(level) {
            self.metrics.record_filtered();
            return;
        }

        let guard = self.sender.read();
        let Some(sender) = guard.as_ref() else {
            self.metrics.record_dropped();
            return;
        };

        let pending = PendingWrite::new(TraceMessage::new(level, text));
        match sender.try_send(pending) {
            Ok(()) => {
                self.metrics.record_accepted();
            }
            Err(TrySendError::Full(pending)) => {
                self.handle_overflow(sender, pending);
            }
            Err(TrySendError::Disconnected(_)) => {
                self.metrics.record_dropped();
            }
        }
    }

    /// Handle a full bounded queue according to the configured policy
    fn handle_overflow(&self, sender: &Sender<PendingWrite>, pending: PendingWrite) {
        self.metrics.record_queue_full();

        match self.overflow_policy {
            OverflowPolicy::Block => {
                self.metrics.record_block();
                match sender.send(pending) {
                    Ok(()) => self.metrics.record_accepted(),
                    Err(_) => self.metrics.record_dropped(),
                };
            }

            OverflowPolicy::BlockWithTimeout(timeout) => {
                self.metrics.record_block();
                match sender.send_timeout(pending, timeout) {
                    Ok(()) => {
                        self.metrics.record_accepted();
                    }
                    Err(SendTimeoutError::Timeout(_)) => self.alert_and_drop(),
                    Err(SendTimeoutError::Disconnected(_)) => {
                        self.metrics.record_dropped();
                    }
                }
            }

            OverflowPolicy::DropNewest => {
                self.metrics.record_dropped();
            }

            OverflowPolicy::AlertAndDrop => self.alert_and_drop(),
        }
    }

    /// Drop one message, alerting on the first overflow drop and every 1000th
    fn alert_and_drop(&self) {
        self.metrics.record_dropped();
        let overflow_count = self.overflow_drops.fetch_add(1, Ordering::Relaxed) + 1;

        if overflow_count == 1 || overflow_count % 1000 == 0 {
            self.diagnostics.warn(format_args!(
                "Trace queue full, {} traces dropped. \
                 Consider a larger queue capacity or more workers.",
                overflow_count
            ));
        }
    }

    #[inline]
    pub fn trace(&self, level: TraceLevel, text: impl Into<String>) {
        self.submit(level, text);
    }

    /// Format `args` into a growing buffer and submit the result.
    ///
    /// Filtered levels are not formatted. A formatting failure drops this
    /// message and emits one diagnostic.
    pub fn trace_fmt(&self, level: TraceLevel, args: fmt::Arguments<'_>) {
        if !self.config.accepts(level) {
            self.metrics.record_filtered();
            return;
        }

        let mut text = String::new();
        if let Err(e) = text.write_fmt(args) {
            self.metrics.record_dropped();
            self.diagnostics
                .error(format_args!("{}. Message dropped.", TraceError::from(e)));
            return;
        }

        self.submit(level, text);
    }

    #[inline]
    pub fn info(&self, text: impl Into<String>) {
        self.submit(TraceLevel::Info, text);
    }

    #[inline]
    pub fn warning(&self, text: impl Into<String>) {
        self.submit(TraceLevel::Warning, text);
    }

    #[inline]
    pub fn error(&self, text: impl Into<String>) {
        self.submit(TraceLevel::Error, text);
    }

    /// Whether a message at `level` would currently be queued
    pub fn is_enabled(&self, level: TraceLevel) -> bool {
        self.config.accepts(level) && self.sender.read().is_some()
    }

    /// Whether transport selection failed and every message is dropped
    pub fn is_disabled(&self) -> bool {
        self.shared.is_none()
    }

    pub fn config(&self) -> &TracerConfig {
        &self.config
    }

    #[inline]
    pub fn min_level(&self) -> TraceLevel {
        self.config.min_level()
    }

    /// Name of the active transport, `None` when disabled
    pub fn transport_name(&self) -> Option<&str> {
        self.shared.as_ref().map(|shared| shared.transport_name.as_str())
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    /// Stop accepting messages, wait for every pending write, release the sink.
    ///
    /// There is no timeout: once a message is accepted its write runs to
    /// completion. Calling this more than once is harmless.
    pub fn shutdown(&self) {
        // Closing the queue lets workers drain it and exit
        drop(self.sender.write().take());

        let workers = std::mem::take(&mut *self.workers.lock());
        for handle in workers {
            if let Err(panic_info) = handle.join() {
                self.diagnostics.error(format_args!(
                    "Trace worker panicked during shutdown: {}",
                    panic_message(&*panic_info)
                ));
            }
        }

        if let Some(ref shared) = self.shared {
            shared.release();
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("transport", &self.transport_name())
            .field("overflow_policy", &self.overflow_policy)
            .finish_non_exhaustive()
    }
}

/// Builder for constructing a Dispatcher with a fluent API
///
/// # Example
/// ```
/// use utrace::prelude::*;
/// use utrace::transports::MemoryTransport;
/// use std::time::Duration;
///
/// let dispatcher = Dispatcher::builder()
///     .config(TracerConfig::new(TraceLevel::Warning, TransportKind::File))
///     .transport(MemoryTransport::new())
///     .workers(2)
///     .queue_capacity(256)
///     .overflow_policy(OverflowPolicy::BlockWithTimeout(Duration::from_millis(20)))
///     .diagnostics(Diagnostics::silent())
///     .build();
/// assert!(!dispatcher.is_enabled(TraceLevel::Info));
/// assert!(dispatcher.is_enabled(TraceLevel::Error));
/// ```
pub struct DispatcherBuilder {
    config: TracerConfig,
    transport: Option<Box<dyn Transport>>,
    workers: usize,
    queue_capacity: Option<usize>,
    overflow_policy: OverflowPolicy,
    diagnostics: Diagnostics,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self {
            config: TracerConfig::default(),
            transport: None,
            workers: DEFAULT_WORKERS,
            queue_capacity: None,
            overflow_policy: OverflowPolicy::default(),
            diagnostics: Diagnostics::default(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: TracerConfig) -> Self {
        self.config = config;
        self
    }

    /// Use this transport instead of the one the configuration selects
    #[must_use = "builder methods return a new value"]
    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Number of worker threads (at least one)
    #[must_use = "builder methods return a new value"]
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Bound the queue of pending writes
    ///
    /// Without a capacity the queue is unbounded and callers never wait.
    #[must_use = "builder methods return a new value"]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity.max(1));
        self
    }

    /// Policy applied when a bounded queue is full
    #[must_use = "builder methods return a new value"]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Build the Dispatcher
    ///
    /// Never fails: if no transport can be set up or no worker can be
    /// started, the result is a disabled dispatcher.
    pub fn build(self) -> Dispatcher {
        let DispatcherBuilder {
            config,
            transport,
            workers,
            queue_capacity,
            overflow_policy,
            diagnostics,
        } = self;

        let transport = match transport {
            Some(transport) => Some(transport),
            None => select_transport(&config, &diagnostics),
        };
        let Some(transport) = transport else {
            return Dispatcher::disabled_with(config, diagnostics, None);
        };

        let metrics = Arc::new(DispatchMetrics::new());
        let shared = Arc::new(Shared {
            transport_name: transport.name().to_string(),
            transport: Mutex::new(Some(transport)),
            metrics: Arc::clone(&metrics),
            diagnostics: diagnostics.clone(),
            write_failure: ReportOnce::new(),
            flush_failure: ReportOnce::new(),
        });

        let (sender, receiver) = match queue_capacity {
            Some(capacity) => bounded(capacity),
            None => unbounded(),
        };

        let mut handles = Vec::with_capacity(workers);
        for index in 0..workers {
            let receiver = receiver.clone();
            let shared = Arc::clone(&shared);
            match thread::Builder::new()
                .name(format!("utrace-worker-{}", index))
                .spawn(move || worker_loop(receiver, shared))
            {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    diagnostics.error(TraceError::WorkerSpawn(e.to_string()));
                    break;
                }
            }
        }

        if handles.is_empty() {
            diagnostics.error("No trace worker could be started. Tracing disabled.");
            shared.release();
            return Dispatcher::disabled_with(config, diagnostics, Some(metrics));
        }

        Dispatcher {
            config,
            sender: RwLock::new(Some(sender)),
            workers: Mutex::new(handles),
            shared: Some(shared),
            metrics,
            diagnostics,
            overflow_policy,
            overflow_drops: AtomicU64::new(0),
        }
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
