//! Tracing macros for printf-style message formatting.
//!
//! These macros format into a growing buffer, so messages of any length are
//! kept whole. Arguments are only formatted when the level passes the
//! dispatcher's filter.
//!
//! # Examples
//!
//! ```
//! use utrace::prelude::*;
//! use utrace::transports::MemoryTransport;
//! use utrace::{error, info, trace};
//!
//! let dispatcher = Dispatcher::builder().transport(MemoryTransport::new()).build();
//!
//! info!(dispatcher, "Server started");
//!
//! let port = 8080;
//! trace!(dispatcher, TraceLevel::Warning, "Port {} already bound", port);
//!
//! error!(dispatcher, "Request {} failed with status {}", 42, 503);
//! ```

/// Trace a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use utrace::prelude::*;
/// # let dispatcher = Dispatcher::disabled();
/// use utrace::trace;
/// trace!(dispatcher, TraceLevel::Info, "Simple message");
/// trace!(dispatcher, TraceLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! trace {
    ($dispatcher:expr, $level:expr, $($arg:tt)+) => {
        $dispatcher.trace_fmt($level, format_args!($($arg)+))
    };
}

/// Trace an info-level message.
///
/// # Examples
///
/// ```
/// # use utrace::prelude::*;
/// # let dispatcher = Dispatcher::disabled();
/// use utrace::info;
/// info!(dispatcher, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($dispatcher:expr, $($arg:tt)+) => {
        $crate::trace!($dispatcher, $crate::TraceLevel::Info, $($arg)+)
    };
}

/// Trace a warning-level message.
///
/// # Examples
///
/// ```
/// # use utrace::prelude::*;
/// # let dispatcher = Dispatcher::disabled();
/// use utrace::warning;
/// warning!(dispatcher, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warning {
    ($dispatcher:expr, $($arg:tt)+) => {
        $crate::trace!($dispatcher, $crate::TraceLevel::Warning, $($arg)+)
    };
}

/// Trace an error-level message.
///
/// # Examples
///
/// ```
/// # use utrace::prelude::*;
/// # let dispatcher = Dispatcher::disabled();
/// use utrace::error;
/// error!(dispatcher, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($dispatcher:expr, $($arg:tt)+) => {
        $crate::trace!($dispatcher, $crate::TraceLevel::Error, $($arg)+)
    };
}
