//! Trace level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a trace message.
///
/// Levels are totally ordered; a dispatcher accepts every message at or
/// above its configured minimum. The numeric values are the selectors
/// accepted by the `TRACELEVEL` environment variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TraceLevel {
    #[default]
    Info = 0,
    Warning = 1,
    Error = 2,
}

impl TraceLevel {
    pub const ALL: [TraceLevel; 3] = [TraceLevel::Info, TraceLevel::Warning, TraceLevel::Error];

    pub fn to_str(&self) -> &'static str {
        match self {
            TraceLevel::Info => "INFO",
            TraceLevel::Warning => "WARNING",
            TraceLevel::Error => "ERROR",
        }
    }

    /// Numeric selector for this level
    pub fn as_selector(&self) -> i64 {
        *self as i64
    }
}

impl fmt::Display for TraceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for TraceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INFO" => Ok(TraceLevel::Info),
            "WARN" | "WARNING" => Ok(TraceLevel::Warning),
            "ERROR" => Ok(TraceLevel::Error),
            _ => Err(format!("Invalid trace level: '{}'", s)),
        }
    }
}

impl TryFrom<i64> for TraceLevel {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, String> {
        match value {
            0 => Ok(TraceLevel::Info),
            1 => Ok(TraceLevel::Warning),
            2 => Ok(TraceLevel::Error),
            _ => Err(format!("Trace level selector out of range: {}", value)),
        }
    }
}
