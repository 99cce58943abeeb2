//! Stress tests for the worker pool and bounded queues
//!
//! These tests verify:
//! - Nothing is lost under heavy concurrent load with an unbounded queue
//! - The Block policy preserves every message with a tiny bounded queue
//! - Drop policies account for every message as written or dropped

use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;
use utrace::core::config::TRACE_FILE_VAR;
use utrace::prelude::*;
use utrace::MemorySink;

/// High volume from many threads into a file, unbounded queue
#[test]
fn test_high_volume_file_tracing() {
    const THREADS: usize = 16;
    const PER_THREAD: usize = 1_000;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let trace_file = temp_dir.path().join("stress.txt");
    let config = TracerConfig::new(TraceLevel::Info, TransportKind::File)
        .with_param(TRACE_FILE_VAR, trace_file.to_str().unwrap());

    let dispatcher = Arc::new(
        Dispatcher::builder()
            .config(config)
            .workers(8)
            .diagnostics(Diagnostics::silent())
            .build(),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let dispatcher = Arc::clone(&dispatcher);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    utrace::info!(dispatcher, "t{}-{}\n", t, i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Thread panicked");
    }
    dispatcher.shutdown();

    let content = std::fs::read_to_string(&trace_file).expect("Failed to read trace file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), THREADS * PER_THREAD);
    assert!(lines.iter().all(|line| line.starts_with("INFO: t")));
    assert_eq!(dispatcher.metrics().written(), (THREADS * PER_THREAD) as u64);
    assert_eq!(dispatcher.metrics().failed(), 0);
}

/// Block policy with a queue of two must not lose anything
#[test]
fn test_block_policy_under_pressure() {
    let transport = MemoryTransport::new();
    let sink = transport.sink();
    let dispatcher = Arc::new(
        Dispatcher::builder()
            .transport(transport)
            .workers(2)
            .queue_capacity(2)
            .overflow_policy(OverflowPolicy::Block)
            .diagnostics(Diagnostics::silent())
            .build(),
    );

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let dispatcher = Arc::clone(&dispatcher);
            thread::spawn(move || {
                for i in 0..250 {
                    dispatcher.error(format!("{}-{};", t, i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Thread panicked");
    }
    dispatcher.shutdown();

    assert_eq!(sink.write_count(), 1_000);
    assert_eq!(dispatcher.metrics().dropped(), 0);
}

struct SlowSink {
    sink: MemorySink,
}

impl Transport for SlowSink {
    fn write(&mut self, record: &str) -> utrace::Result<()> {
        use std::io::Write;
        thread::sleep(Duration::from_millis(5));
        self.sink.write_all(record.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> utrace::Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "slow"
    }
}

/// Timeout policy drops what cannot be queued in time and counts it
#[test]
fn test_block_with_timeout_accounts_for_every_message() {
    let sink = MemorySink::new();
    let dispatcher = Dispatcher::builder()
        .transport(SlowSink { sink: sink.clone() })
        .workers(1)
        .queue_capacity(1)
        .overflow_policy(OverflowPolicy::BlockWithTimeout(Duration::from_millis(1)))
        .diagnostics(Diagnostics::silent())
        .build();

    for i in 0..100 {
        dispatcher.warning(format!("{};", i));
    }
    dispatcher.shutdown();

    let metrics = dispatcher.metrics();
    assert_eq!(metrics.accepted() + metrics.dropped(), 100);
    assert!(metrics.dropped() > 0);
    assert!(metrics.block_events() > 0);
    assert_eq!(sink.write_count() as u64, metrics.written());
    assert_eq!(metrics.written(), metrics.accepted());
}

/// DropNewest never blocks and never emits diagnostics
#[test]
fn test_drop_newest_is_silent() {
    let sink = MemorySink::new();
    let alerts = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let alerts_clone = Arc::clone(&alerts);
    let dispatcher = Dispatcher::builder()
        .transport(SlowSink { sink: sink.clone() })
        .workers(1)
        .queue_capacity(1)
        .overflow_policy(OverflowPolicy::DropNewest)
        .diagnostics(Diagnostics::with_callback(Arc::new(move |_line: &str| {
            alerts_clone.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        })))
        .build();

    for i in 0..100 {
        dispatcher.info(format!("{};", i));
    }
    dispatcher.shutdown();

    let metrics = dispatcher.metrics();
    assert_eq!(metrics.accepted() + metrics.dropped(), 100);
    assert!(metrics.dropped() > 0);
    assert_eq!(sink.write_count() as u64, metrics.accepted());
    assert_eq!(alerts.load(std::sync::atomic::Ordering::Relaxed), 0);
}
