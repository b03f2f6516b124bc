//! # stackerr-report
//!
//! The consumer side of `stackerr`: everything a process entry point needs
//! to turn a failed run into one useful log event.
//!
//! - [`ReportConfig`]: log level, output format and crash reporter endpoint,
//!   read from the environment.
//! - [`init`]: installs the `tracing` subscriber once.
//! - [`CrashReporter`]: seam for an external crash-reporting service.
//! - [`handle_error`] / [`run`]: report, tag with the event id, log message
//!   plus `error.values` and `error.stacktrace`.
//!
//! ```no_run
//! use stackerr::Error;
//! use stackerr_report::{init, run, NoopReporter, ReportConfig};
//!
//! fn main() -> stackerr::Result<()> {
//!     init(&ReportConfig::from_env())?;
//!     run(&NoopReporter, || Err(Error::new("no event data").with("source", "sqs")))
//! }
//! ```

pub mod config;
mod handle;
mod logger;
mod reporter;

pub use config::{LogLevel, ReportConfig};
pub use handle::{handle_dyn_error, handle_error, run, EVENT_ID_KEY, FLUSH_TIMEOUT};
pub use logger::{init, is_initialized};
pub use reporter::{CrashReporter, NoopReporter};
