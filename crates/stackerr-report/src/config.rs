//! Reporting configuration.
//!
//! # Environment Variables
//!
//! - `LOG_LEVEL=<level>` - trace, debug, info, warn, error (default: info)
//! - `RUST_LOG=<filter>` - full `EnvFilter` directive, overrides `LOG_LEVEL`
//! - `AWS_LAMBDA_FUNCTION_NAME` - when set, logs are emitted as JSON lines
//! - `SENTRY_DSN` - crash reporter endpoint, handed to the reporter in use

use std::fmt;
use std::str::FromStr;

use stackerr::env::{env_get_opt, env_get_str, env_is_set};

/// Log levels (matches common conventions)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Lenient parse: unknown or empty input falls back to `Info`.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl FromStr for LogLevel {
    type Err = stackerr::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(stackerr::err!("unknown log level", { "level" => other })),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LogLevel> for tracing_subscriber::filter::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}

/// Sink configuration for the top-level error handler.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct ReportConfig {
    /// Minimum level when `RUST_LOG` is not set.
    pub log_level: LogLevel,
    /// JSON lines instead of human-readable output.
    pub json: bool,
    /// Crash reporter endpoint, if one is configured.
    pub crash_dsn: Option<String>,
}

impl ReportConfig {
    /// Read `LOG_LEVEL`, `AWS_LAMBDA_FUNCTION_NAME` and `SENTRY_DSN`.
    pub fn from_env() -> Self {
        Self {
            log_level: LogLevel::parse_lenient(&env_get_str("LOG_LEVEL", "info")),
            json: env_is_set("AWS_LAMBDA_FUNCTION_NAME"),
            crash_dsn: env_get_opt::<String>("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
        }
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }

    pub fn crash_dsn(mut self, dsn: impl Into<String>) -> Self {
        self.crash_dsn = Some(dsn.into());
        self
    }

    /// True if a crash reporter endpoint is configured.
    pub fn crash_reporting_enabled(&self) -> bool {
        self.crash_dsn.is_some()
    }
}

impl fmt::Debug for ReportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportConfig")
            .field("log_level", &self.log_level)
            .field("json", &self.json)
            .field("crash_dsn", &self.crash_dsn.as_ref().map(|_| "<set>"))
            .finish()
    }
}
