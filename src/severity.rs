use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Severity of a logged event.
///
/// Lower numeric value means higher severity. The numeric value is what
/// ends up in the `severity` field of a rendered record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Severity {
    Fatal = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
}

impl Severity {
    /// Integer encoding used on the wire.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode the wire integer. Returns `None` for anything outside `0..=3`.
    pub const fn from_u8(value: u8) -> Option<Severity> {
        match value {
            0 => Some(Severity::Fatal),
            1 => Some(Severity::Error),
            2 => Some(Severity::Warn),
            3 => Some(Severity::Info),
            _ => None,
        }
    }

    /// Translate into the leveled scale used for filtering.
    pub const fn level(self) -> Level {
        match self {
            Severity::Fatal => Level::FATAL,
            Severity::Error => Level::ERROR,
            Severity::Warn => Level::WARN,
            Severity::Info => Level::INFO,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Severity::Fatal => "FATAL",
            Severity::Error => "ERROR",
            Severity::Warn => "WARN",
            Severity::Info => "INFO",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

/// Position on the leveled logging scale.
///
/// Higher is more important. The scale leaves room between the named
/// levels and has no upper bound, so `FATAL` sits above `ERROR` even though
/// `tracing` itself stops at `ERROR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Level(pub i32);

impl Level {
    pub const TRACE: Level = Level(-8);
    pub const DEBUG: Level = Level(-4);
    pub const INFO: Level = Level(0);
    pub const WARN: Level = Level(4);
    pub const ERROR: Level = Level(8);
    pub const FATAL: Level = Level(12);

    /// Translate back into a severity. Only the exact FATAL, ERROR and WARN
    /// levels map to their own severity, everything else is INFO.
    pub const fn severity(self) -> Severity {
        match self.0 {
            12 => Severity::Fatal,
            8 => Severity::Error,
            4 => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::INFO
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Level::TRACE => f.write_str("TRACE"),
            Level::DEBUG => f.write_str("DEBUG"),
            Level::INFO => f.write_str("INFO"),
            Level::WARN => f.write_str("WARN"),
            Level::ERROR => f.write_str("ERROR"),
            Level::FATAL => f.write_str("FATAL"),
            Level(other) => write!(f, "{}", other),
        }
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Level::TRACE,
            tracing::Level::DEBUG => Level::DEBUG,
            tracing::Level::INFO => Level::INFO,
            tracing::Level::WARN => Level::WARN,
            tracing::Level::ERROR => Level::ERROR,
        }
    }
}

impl From<Severity> for Level {
    fn from(severity: Severity) -> Self {
        severity.level()
    }
}

/// Error returned when a level string is neither a known name nor an integer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("log level string unrecognised: {0}")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TRACE" => return Ok(Level::TRACE),
            "DEBUG" => return Ok(Level::DEBUG),
            "INFO" => return Ok(Level::INFO),
            "WARN" => return Ok(Level::WARN),
            "ERROR" => return Ok(Level::ERROR),
            "FATAL" => return Ok(Level::FATAL),
            _ => {}
        }

        s.trim()
            .parse::<i32>()
            .map(Level)
            .map_err(|_| ParseLevelError(s.to_string()))
    }
}
