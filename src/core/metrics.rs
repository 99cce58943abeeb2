//! Dispatcher metrics for observability
//!
//! Counters describing what happened to each trace request: filtered by
//! severity, accepted into the queue, written, failed at the sink, or dropped.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for dispatcher observability
///
/// # Example
///
/// ```
/// use utrace::DispatchMetrics;
///
/// let metrics = DispatchMetrics::new();
/// metrics.record_accepted();
/// metrics.record_written();
///
/// assert_eq!(metrics.accepted(), 1);
/// assert_eq!(metrics.written(), 1);
/// ```
#[derive(Debug)]
pub struct DispatchMetrics {
    /// Requests below the minimum level
    filtered: AtomicU64,

    /// Requests queued for a worker
    accepted: AtomicU64,

    /// Records the transport wrote successfully
    written: AtomicU64,

    /// Records the transport failed to write
    failed: AtomicU64,

    /// Requests discarded without reaching the transport
    dropped: AtomicU64,

    /// Number of times the bounded queue was full
    queue_full_events: AtomicU64,

    /// Number of times a caller waited for queue space
    block_events: AtomicU64,
}

impl DispatchMetrics {
    pub const fn new() -> Self {
        Self {
            filtered: AtomicU64::new(0),
            accepted: AtomicU64::new(0),
            written: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            queue_full_events: AtomicU64::new(0),
            block_events: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queue_full_events(&self) -> u64 {
        self.queue_full_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn block_events(&self) -> u64 {
        self.block_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_accepted(&self) -> u64 {
        self.accepted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.failed.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a dropped request, returning the previous count
    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_queue_full(&self) -> u64 {
        self.queue_full_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_block(&self) -> u64 {
        self.block_events.fetch_add(1, Ordering::Relaxed)
    }

    /// Accepted requests that have not yet been written or failed
    pub fn in_flight(&self) -> u64 {
        self.accepted()
            .saturating_sub(self.written() + self.failed())
    }

    /// Sink failure rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has reached the transport.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.failed() as f64;
        let total = self.written() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DispatchMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            filtered: AtomicU64::new(self.filtered()),
            accepted: AtomicU64::new(self.accepted()),
            written: AtomicU64::new(self.written()),
            failed: AtomicU64::new(self.failed()),
            dropped: AtomicU64::new(self.dropped()),
            queue_full_events: AtomicU64::new(self.queue_full_events()),
            block_events: AtomicU64::new(self.block_events()),
        }
    }
}
