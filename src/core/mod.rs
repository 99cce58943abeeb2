//! Core trace types, configuration and the dispatcher

pub mod config;
pub mod diagnostics;
pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod overflow_policy;
pub mod trace_level;
pub mod trace_message;
pub mod transport;

pub use config::{ConfigSource, EnvSource, TracerConfig, TransportKind};
pub use diagnostics::{DiagnosticCallback, Diagnostics, ReportOnce};
pub use dispatcher::{Dispatcher, DispatcherBuilder, DEFAULT_WORKERS};
pub use error::{Result, TraceError};
pub use metrics::DispatchMetrics;
pub use overflow_policy::OverflowPolicy;
pub use trace_level::TraceLevel;
pub use trace_message::TraceMessage;
pub use transport::Transport;
