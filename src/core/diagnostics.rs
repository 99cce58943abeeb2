//! Advisory diagnostics for the tracing facility itself
//!
//! Diagnostics are human-readable lines describing configuration problems and
//! dropped traces. They never change program flow. By default they go to
//! stderr; tests and embedders can route them elsewhere.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Callback receiving one complete diagnostic line
pub type DiagnosticCallback = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Clone)]
pub struct Diagnostics {
    callback: Option<DiagnosticCallback>,
}

impl Diagnostics {
    /// Diagnostics written to the process's standard error stream
    pub fn stderr() -> Self {
        Self {
            callback: Some(Arc::new(|line: &str| eprintln!("{}", line))),
        }
    }

    /// Diagnostics delivered to a custom callback
    ///
    /// # Example
    ///
    /// ```
    /// use utrace::Diagnostics;
    /// use std::sync::Arc;
    ///
    /// let diagnostics = Diagnostics::with_callback(Arc::new(|line: &str| {
    ///     assert!(line.starts_with("[UTRACE"));
    /// }));
    /// diagnostics.warn("example");
    /// ```
    pub fn with_callback(callback: DiagnosticCallback) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    /// Discard all diagnostics
    pub fn silent() -> Self {
        Self { callback: None }
    }

    pub fn warn(&self, message: impl fmt::Display) {
        self.emit("WARNING", message);
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.emit("ERROR", message);
    }

    fn emit(&self, severity: &str, message: impl fmt::Display) {
        if let Some(ref callback) = self.callback {
            callback(&format!("[UTRACE {}] {}", severity, message));
        }
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::stderr()
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("enabled", &self.callback.is_some())
            .finish()
    }
}

/// Latch that reports `true` exactly once
#[derive(Debug, Default)]
pub struct ReportOnce(AtomicBool);

impl ReportOnce {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Returns `true` for the first caller only
    #[inline]
    pub fn first(&self) -> bool {
        !self.0.swap(true, Ordering::AcqRel)
    }
}
