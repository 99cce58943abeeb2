//! Overflow policies for a bounded dispatch queue
//!
//! With the default unbounded queue these never apply. When a queue capacity
//! is configured, the policy decides what a caller does when every slot is
//! taken.

use std::fmt;
use std::time::Duration;

/// Policy for handling a full dispatch queue
///
/// # Example
///
/// ```
/// use utrace::OverflowPolicy;
/// use std::time::Duration;
///
/// let policy = OverflowPolicy::default();
/// assert_eq!(policy, OverflowPolicy::Block);
///
/// let policy = OverflowPolicy::BlockWithTimeout(Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Wait until a worker frees a slot
    ///
    /// Callers wait on queue admission only, never on the write itself.
    #[default]
    Block,

    /// Wait up to the timeout, then drop the message
    BlockWithTimeout(Duration),

    /// Drop the new message silently; metrics still count it
    DropNewest,

    /// Drop the new message and emit a diagnostic on the first drop and every
    /// thousandth drop after it
    AlertAndDrop,
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::Block => write!(f, "Block"),
            OverflowPolicy::BlockWithTimeout(d) => write!(f, "BlockWithTimeout({:?})", d),
            OverflowPolicy::DropNewest => write!(f, "DropNewest"),
            OverflowPolicy::AlertAndDrop => write!(f, "AlertAndDrop"),
        }
    }
}
