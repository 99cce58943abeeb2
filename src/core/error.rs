//! Error types for the trace dispatcher
//!
//! Errors never cross the public `trace` boundary. Transports report them to the
//! dispatcher, which turns them into diagnostics and metrics.

pub type Result<T> = std::result::Result<T, TraceError>;

#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON configuration error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Required transport parameter is absent
    #[error("{transport} transport requires '{param}'")]
    MissingParameter {
        transport: String,
        param: String,
    },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Transport failed to open or write its sink
    #[error("{transport} transport error for '{target}': {message}")]
    TransportError {
        transport: String,
        target: String,
        message: String,
    },

    /// Message formatting failed
    #[error("Failed to write message to buffer")]
    FormatError(#[from] std::fmt::Error),

    /// Failed to spawn a worker thread
    #[error("Failed to spawn worker thread: {0}")]
    WorkerSpawn(String),
}

impl TraceError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        TraceError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a missing parameter error
    pub fn missing_param(transport: impl Into<String>, param: impl Into<String>) -> Self {
        TraceError::MissingParameter {
            transport: transport.into(),
            param: param.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        TraceError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(
        transport: impl Into<String>,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        TraceError::TransportError {
            transport: transport.into(),
            target: target.into(),
            message: message.into(),
        }
    }
}
