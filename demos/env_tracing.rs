//! Environment-driven tracing example
//!
//! Resolves the tracer configuration from the environment and emits a few
//! traces.
//!
//! Run with:
//!   TRACEFILE=trace.txt cargo run --example env_tracing
//!   TRACEMETHOD=1 TCP_HOST=127.0.0.1 TCP_PORT=9000 cargo run --example env_tracing

use utrace::prelude::*;
use utrace::{error, info, warning};

fn main() {
    let config = TracerConfig::resolve();
    println!("=== utrace - Environment Tracing Example ===\n");
    println!("Minimum level: {}", config.min_level());
    println!("Method:        {}", config.method());
    for (key, value) in config.params() {
        println!("  {} = {}", key, value);
    }

    let dispatcher = Dispatcher::new(config);
    match dispatcher.transport_name() {
        Some(name) => println!("Active transport: {}\n", name),
        None => println!("Tracing disabled, see diagnostics above\n"),
    }

    info!(dispatcher, "Application started, pid {}\n", std::process::id());
    for i in 1..=5 {
        info!(dispatcher, "Processing item {}/5\n", i);
        if i == 3 {
            warning!(dispatcher, "Item {} took longer than expected\n", i);
        }
    }
    error!(dispatcher, "Optional plugin '{}' failed to load\n", "metrics");

    // Blocks until every accepted trace has been written
    dispatcher.shutdown();

    let metrics = dispatcher.metrics();
    println!(
        "Written: {}, filtered: {}, dropped: {}, failed: {}",
        metrics.written(),
        metrics.filtered(),
        metrics.dropped(),
        metrics.failed()
    );
}
