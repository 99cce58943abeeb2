//! Tracer configuration, resolved once at startup
//!
//! The resolver reads two selectors and the parameters of the chosen transport
//! from a [`ConfigSource`]. It never fails: unset, unparseable or out-of-range
//! selectors fall back to `INFO` and `FILE`. Missing transport parameters are
//! left for transport selection to report.
//!
//! | Variable         | Meaning                                      | Default  |
//! |------------------|----------------------------------------------|----------|
//! | `TRACELEVEL`     | `0`/`INFO`, `1`/`WARNING`, `2`/`ERROR`       | `INFO`   |
//! | `TRACEMETHOD`    | `0`/`FILE`, `1`/`TCP`, `2`/`SERIALPORT`      | `FILE`   |
//! | `TRACEFILE`      | output path for `FILE`                       | `output.txt` |
//! | `TCP_HOST`       | destination host for `TCP` (required)        |          |
//! | `TCP_PORT`       | destination port for `TCP` (required)        |          |
//! | `TCP_TIMEOUT_MS` | connect/write timeout for `TCP`              | `5000`   |
//! | `SERIAL_PORT`    | device path for `SERIALPORT` (required)      |          |
//! | `SERIAL_BAUD`    | baud rate for `SERIALPORT`                   | `115200` |

use super::error::Result;
use super::trace_level::TraceLevel;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

pub const TRACE_LEVEL_VAR: &str = "TRACELEVEL";
pub const TRACE_METHOD_VAR: &str = "TRACEMETHOD";
pub const TRACE_FILE_VAR: &str = "TRACEFILE";
pub const TCP_HOST_VAR: &str = "TCP_HOST";
pub const TCP_PORT_VAR: &str = "TCP_PORT";
pub const TCP_TIMEOUT_VAR: &str = "TCP_TIMEOUT_MS";
pub const SERIAL_PORT_VAR: &str = "SERIAL_PORT";
pub const SERIAL_BAUD_VAR: &str = "SERIAL_BAUD";

/// Sink selected for trace output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransportKind {
    #[default]
    File = 0,
    Tcp = 1,
    SerialPort = 2,
}

impl TransportKind {
    pub fn to_str(&self) -> &'static str {
        match self {
            TransportKind::File => "FILE",
            TransportKind::Tcp => "TCP",
            TransportKind::SerialPort => "SERIALPORT",
        }
    }

    /// Parameter keys read for this transport
    pub fn param_keys(&self) -> &'static [&'static str] {
        match self {
            TransportKind::File => &[TRACE_FILE_VAR],
            TransportKind::Tcp => &[TCP_HOST_VAR, TCP_PORT_VAR, TCP_TIMEOUT_VAR],
            TransportKind::SerialPort => &[SERIAL_PORT_VAR, SERIAL_BAUD_VAR],
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FILE" => Ok(TransportKind::File),
            "TCP" => Ok(TransportKind::Tcp),
            "SERIAL" | "SERIALPORT" => Ok(TransportKind::SerialPort),
            _ => Err(format!("Invalid trace method: '{}'", s)),
        }
    }
}

impl TryFrom<i64> for TransportKind {
    type Error = String;

    fn try_from(value: i64) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(TransportKind::File),
            1 => Ok(TransportKind::Tcp),
            2 => Ok(TransportKind::SerialPort),
            _ => Err(format!("Trace method selector out of range: {}", value)),
        }
    }
}

/// A read-only source of configuration values
pub trait ConfigSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// The process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl ConfigSource for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }
}

/// Parse a selector given either as its integer value or its name
fn parse_selector<T>(raw: &str) -> Option<T>
where
    T: FromStr + TryFrom<i64>,
{
    let raw = raw.trim();
    match raw.parse::<i64>() {
        Ok(n) => T::try_from(n).ok(),
        Err(_) => raw.parse().ok(),
    }
}

/// Immutable tracer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracerConfig {
    #[serde(default)]
    min_level: TraceLevel,
    #[serde(default)]
    method: TransportKind,
    #[serde(default)]
    method_params: BTreeMap<String, String>,
}

impl TracerConfig {
    #[must_use]
    pub fn new(min_level: TraceLevel, method: TransportKind) -> Self {
        Self {
            min_level,
            method,
            method_params: BTreeMap::new(),
        }
    }

    /// Add a transport parameter
    ///
    /// # Example
    ///
    /// ```
    /// use utrace::{TraceLevel, TracerConfig, TransportKind};
    ///
    /// let config = TracerConfig::new(TraceLevel::Warning, TransportKind::Tcp)
    ///     .with_param("TCP_HOST", "127.0.0.1")
    ///     .with_param("TCP_PORT", "9000");
    /// assert_eq!(config.param("TCP_PORT"), Some("9000"));
    /// ```
    #[must_use = "builder methods return a new value"]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.method_params.insert(key.into(), value.into());
        self
    }

    /// Resolve the configuration from the process environment
    pub fn resolve() -> Self {
        Self::resolve_from(&EnvSource)
    }

    /// Resolve the configuration from an arbitrary source
    pub fn resolve_from(source: &impl ConfigSource) -> Self {
        let min_level: TraceLevel = source
            .get(TRACE_LEVEL_VAR)
            .and_then(|raw| parse_selector(&raw))
            .unwrap_or_default();
        let method: TransportKind = source
            .get(TRACE_METHOD_VAR)
            .and_then(|raw| parse_selector(&raw))
            .unwrap_or_default();

        let method_params = method
            .param_keys()
            .iter()
            .filter_map(|key| source.get(key).map(|value| (key.to_string(), value)))
            .collect();

        Self {
            min_level,
            method,
            method_params,
        }
    }

    /// Load the configuration from a JSON document
    ///
    /// ```
    /// use utrace::{TraceLevel, TracerConfig, TransportKind};
    ///
    /// let config = TracerConfig::from_json(
    ///     r#"{"min_level": "WARNING", "method": "FILE", "method_params": {"TRACEFILE": "trace.txt"}}"#,
    /// ).unwrap();
    /// assert_eq!(config.min_level(), TraceLevel::Warning);
    /// assert_eq!(config.method(), TransportKind::File);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    #[inline]
    pub fn min_level(&self) -> TraceLevel {
        self.min_level
    }

    #[inline]
    pub fn method(&self) -> TransportKind {
        self.method
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.method_params.get(key).map(String::as_str)
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.method_params
    }

    /// Whether a message at `level` passes the severity filter
    #[inline]
    pub fn accepts(&self, level: TraceLevel) -> bool {
        level >= self.min_level
    }
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self::new(TraceLevel::Info, TransportKind::File)
    }
}
