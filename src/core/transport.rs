//! Transport trait for trace output sinks

use super::error::Result;

/// A sink that receives fully rendered trace records.
///
/// Implementations own their sink handle. The dispatcher serializes every
/// call through one lock, so `write` never runs concurrently with itself.
pub trait Transport: Send {
    fn write(&mut self, record: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, record: &str) -> Result<()> {
        (**self).write(record)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
