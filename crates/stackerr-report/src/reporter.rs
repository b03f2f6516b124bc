use std::error::Error as StdError;
use std::time::Duration;

/// Seam for an external crash-reporting service.
///
/// Transport lives outside this workspace. An implementation receives the
/// error before it is logged and may return a tracking id, which the
/// handler attaches to the error and the log event.
pub trait CrashReporter: Send + Sync {
    /// Submit `err`; returns the service's event id on success.
    fn capture(&self, err: &(dyn StdError + 'static)) -> Option<String>;

    /// Block until queued reports are sent or `timeout` elapses.
    /// Returns `false` on timeout.
    fn flush(&self, _timeout: Duration) -> bool {
        true
    }
}

/// Reporter used when no crash reporting is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl CrashReporter for NoopReporter {
    fn capture(&self, _err: &(dyn StdError + 'static)) -> Option<String> {
        None
    }
}

impl<R: CrashReporter + ?Sized> CrashReporter for &R {
    fn capture(&self, err: &(dyn StdError + 'static)) -> Option<String> {
        (**self).capture(err)
    }

    fn flush(&self, timeout: Duration) -> bool {
        (**self).flush(timeout)
    }
}

impl<R: CrashReporter + ?Sized> CrashReporter for Box<R> {
    fn capture(&self, err: &(dyn StdError + 'static)) -> Option<String> {
        (**self).capture(err)
    }

    fn flush(&self, timeout: Duration) -> bool {
        (**self).flush(timeout)
    }
}
