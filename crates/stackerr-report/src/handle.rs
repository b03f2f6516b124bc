//! Top-level error handling: report, tag, log.

use std::error::Error as StdError;
use std::time::Duration;

use stackerr::{chain, Error};

use crate::reporter::CrashReporter;

/// Key the crash reporter's event id is stored under on the error.
pub const EVENT_ID_KEY: &str = "report.event_id";

/// How long [`run`] waits for the reporter to drain.
pub const FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// Report `err`, tag it with the returned event id, and log it.
///
/// The event carries `error.event_id`, `error.values` (merged diagnostic
/// map as JSON) and `error.stacktrace` (frames as JSON).
pub fn handle_error(err: &mut Error, reporter: &dyn CrashReporter) {
    let event_id = reporter.capture(&*err);
    if let Some(id) = &event_id {
        err.insert(EVENT_ID_KEY, id.as_str());
    }
    log_error(&*err, event_id.as_deref());
}

/// [`handle_error`] for errors the caller cannot mutate, such as a foreign
/// error with a `stackerr::Error` somewhere in its chain.
pub fn handle_dyn_error(err: &(dyn StdError + 'static), reporter: &dyn CrashReporter) {
    let event_id = reporter.capture(err);
    log_error(err, event_id.as_deref());
}

/// Run `f`; on failure handle the error, then return it unchanged.
///
/// The reporter is flushed either way, so reports are not lost when the
/// process exits right after.
pub fn run<T, F>(reporter: &dyn CrashReporter, f: F) -> stackerr::Result<T>
where
    F: FnOnce() -> stackerr::Result<T>,
{
    let outcome = match f() {
        Ok(value) => Ok(value),
        Err(mut err) => {
            handle_error(&mut err, reporter);
            Err(err)
        }
    };

    if !reporter.flush(FLUSH_TIMEOUT) {
        tracing::warn!(timeout = ?FLUSH_TIMEOUT, "crash reporter flush timed out");
    }
    outcome
}

fn log_error(err: &(dyn StdError + 'static), event_id: Option<&str>) {
    let message = chain::render(err);

    let (values, stacktrace) = match Error::find_in(err) {
        Some(node) => (
            serde_json::to_string(&node.values()).ok(),
            serde_json::to_string(node.stacks()).ok(),
        ),
        None => (None, None),
    };

    tracing::error!(
        error.event_id = event_id,
        error.values = values.as_deref(),
        error.stacktrace = stacktrace.as_deref(),
        "{}",
        message
    );
}
