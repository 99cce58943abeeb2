//! Trace message structure

use super::trace_level::TraceLevel;

/// A single formatted trace request, consumed by exactly one write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceMessage {
    pub level: TraceLevel,
    pub text: String,
}

impl TraceMessage {
    pub fn new(level: TraceLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    /// Render the sink record: `"<LEVELNAME>: <text>"`.
    ///
    /// The text is written verbatim. Callers own line delimiting.
    pub fn record(&self) -> String {
        let name = self.level.to_str();
        let mut record = String::with_capacity(name.len() + 2 + self.text.len());
        record.push_str(name);
        record.push_str(": ");
        record.push_str(&self.text);
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_format() {
        let message = TraceMessage::new(TraceLevel::Error, "hello");
        assert_eq!(message.record(), "ERROR: hello");
    }

    #[test]
    fn test_record_keeps_text_verbatim() {
        let message = TraceMessage::new(TraceLevel::Warning, "line one\n");
        assert_eq!(message.record(), "WARNING: line one\n");

        let empty = TraceMessage::new(TraceLevel::Info, "");
        assert_eq!(empty.record(), "INFO: ");
    }
}
