//! Property-based tests for utrace using proptest

use proptest::prelude::*;
use std::collections::HashMap;
use utrace::core::config::{TRACE_LEVEL_VAR, TRACE_METHOD_VAR};
use utrace::prelude::*;

fn any_level() -> impl Strategy<Value = TraceLevel> {
    prop_oneof![
        Just(TraceLevel::Info),
        Just(TraceLevel::Warning),
        Just(TraceLevel::Error),
    ]
}

// ============================================================================
// TraceLevel Tests
// ============================================================================

proptest! {
    /// Ordering matches the numeric selectors
    #[test]
    fn test_level_ordering_matches_selectors(a in any_level(), b in any_level()) {
        prop_assert_eq!(a < b, a.as_selector() < b.as_selector());
        prop_assert_eq!(a == b, a.as_selector() == b.as_selector());
    }

    /// Names parse back case-insensitively
    #[test]
    fn test_level_name_roundtrip(level in any_level(), lower in any::<bool>()) {
        let name = if lower { level.to_str().to_lowercase() } else { level.to_str().to_string() };
        prop_assert_eq!(name.parse::<TraceLevel>(), Ok(level));
    }

    /// Only 0..=2 are valid level selectors
    #[test]
    fn test_level_selector_range(n in any::<i64>()) {
        prop_assert_eq!(TraceLevel::try_from(n).is_ok(), (0..=2).contains(&n));
    }
}

// ============================================================================
// Configuration Tests
// ============================================================================

proptest! {
    /// The resolver never fails and always yields a valid configuration
    #[test]
    fn test_resolver_total(
        level in prop_oneof![".{0,12}", " ?-?[0-3] ?", "[Ii]nfo|WARN(ING)?|[Ee]rror"],
        method in prop_oneof![".{0,12}", " ?-?[0-3] ?", "[Ff]ile|TCP|[Ss]erial([Pp]ort)?"],
    ) {
        let source: HashMap<String, String> = [
            (TRACE_LEVEL_VAR.to_string(), level.clone()),
            (TRACE_METHOD_VAR.to_string(), method.clone()),
        ]
        .into_iter()
        .collect();

        let config = TracerConfig::resolve_from(&source);
        match level.trim().parse::<i64>() {
            Ok(n) if (0..=2).contains(&n) => {
                prop_assert_eq!(config.min_level().as_selector(), n);
            }
            Ok(_) => prop_assert_eq!(config.min_level(), TraceLevel::Info),
            Err(_) => {
                let expected = level.parse::<TraceLevel>().unwrap_or_default();
                prop_assert_eq!(config.min_level(), expected);
            }
        }
        match method.trim().parse::<i64>() {
            Ok(n) if (0..=2).contains(&n) => {
                prop_assert_eq!(config.method() as i64, n);
            }
            Ok(_) => prop_assert_eq!(config.method(), TransportKind::File),
            Err(_) => {
                let expected = method.parse::<TransportKind>().unwrap_or_default();
                prop_assert_eq!(config.method(), expected);
            }
        }
    }
}

// ============================================================================
// Dispatch Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Exactly the calls at or above the minimum level reach the sink
    #[test]
    fn test_filter_and_record_count(
        min_level in any_level(),
        levels in prop::collection::vec(any_level(), 0..40),
    ) {
        let transport = MemoryTransport::new();
        let sink = transport.sink();
        let dispatcher = Dispatcher::builder()
            .config(TracerConfig::new(min_level, TransportKind::File))
            .transport(transport)
            .workers(2)
            .diagnostics(Diagnostics::silent())
            .build();

        for (i, level) in levels.iter().enumerate() {
            dispatcher.trace(*level, format!("{};", i));
        }
        dispatcher.shutdown();

        let expected = levels.iter().filter(|level| **level >= min_level).count();
        prop_assert_eq!(sink.write_count(), expected);
        prop_assert_eq!(dispatcher.metrics().written() as usize, expected);
        prop_assert_eq!(dispatcher.metrics().filtered() as usize, levels.len() - expected);

        let contents = sink.contents();
        for (i, level) in levels.iter().enumerate() {
            let record = format!("{}: {};", level, i);
            prop_assert_eq!(contents.contains(&record), *level >= min_level);
        }
    }

    /// The record is exactly the level name, a colon and the text
    #[test]
    fn test_record_format(level in any_level(), text in ".*") {
        let message = TraceMessage::new(level, text.clone());
        prop_assert_eq!(message.record(), format!("{}: {}", level.to_str(), text));
    }
}
