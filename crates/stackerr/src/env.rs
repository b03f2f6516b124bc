//! Environment variable utilities
//!
//! Small typed readers for the environment variables that configure
//! stack capture here and the log sink in `stackerr-report`.
//!
//! # Usage
//!
//! ```
//! use stackerr::env::{env_get_opt, env_get_str, env_get_switch};
//!
//! let depth: Option<usize> = env_get_opt("STACKERR_EXAMPLE_DEPTH");
//! let level = env_get_str("LOG_LEVEL", "info");
//! let capture = env_get_switch("STACKERR_CAPTURE", true);
//! # let _ = (depth, level, capture);
//! ```

use std::str::FromStr;

/// Get an on/off switch, keeping the default for unrecognized values.
///
/// Accepts "1", "true", "yes", "on" and "0", "false", "no", "off"
/// (case-insensitive). A typo such as `STACKERR_CAPTURE=flase` leaves
/// the switch at its default instead of silently turning it off.
pub fn env_get_switch(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) if is_truthy(&val) => true,
        Ok(val) if is_falsy(&val) => false,
        _ => default,
    }
}

/// Get environment variable as optional value
///
/// Returns `Some(T)` if the variable is set and parses successfully,
/// `None` otherwise.
#[inline]
pub fn env_get_opt<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Get environment variable as string, or return default
#[inline]
pub fn env_get_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Check if environment variable is set (regardless of value)
#[inline]
pub fn env_is_set(key: &str) -> bool {
    std::env::var_os(key).is_some()
}

fn is_truthy(val: &str) -> bool {
    matches!(val.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn is_falsy(val: &str) -> bool {
    matches!(val.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off")
}
