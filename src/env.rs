//! Environment variable names read by [`crate::Config::from_env`], and the
//! parsing helpers behind them.
//!
//! Nothing else in the crate touches the environment.

/// Pretty print events for humans instead of one JSON object per line.
pub const HUMAN_LOG_ENV: &str = "HUMAN_LOG";

/// Minimum level to log, by name (`DEBUG`, `INFO`, `WARN`, `ERROR`, `FATAL`)
/// or as an integer.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Use the low-allocation renderer.
pub const MINIMUM_ALLOC_ENV: &str = "MINIMUM_ALLOC";

/// Fail fast on caller misuse and encoding errors. Meant for test runs.
pub const LOG_STRICT_ENV: &str = "LOG_STRICT";

/// Read a boolean environment variable.
///
/// Unset, empty or unparseable values give `None`.
pub fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key).ok().and_then(|v| parse_bool(&v))
}

/// `1 t T TRUE true True` are true, `0 f F FALSE false False` are false.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
