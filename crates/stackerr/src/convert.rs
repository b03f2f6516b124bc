use std::error::Error as StdError;
use std::io;

use crate::{Error, Result, StackCapture};

// ── Into<io::Error> ───────────────────────────────────────────────

impl From<Error> for io::Error {
    /// Wrap the `Error` as a custom `io::Error`, keeping it reachable via
    /// `get_ref` / `into_inner`.
    fn from(err: Error) -> Self {
        io::Error::new(io::ErrorKind::Other, err)
    }
}

// ── ResultExt: wrap on the way up ─────────────────────────────────

/// Extension trait for wrapping any `Result` error into an [`Error`].
///
/// The stack is captured at the call to `wrap_err`, so the trace points at
/// the code that noticed the failure, not at the adapter.
///
/// ```
/// use stackerr::ResultExt;
///
/// fn load() -> stackerr::Result<String> {
///     std::fs::read_to_string("/definitely/not/here.json").wrap_err("reading config")
/// }
///
/// let err = load().unwrap_err();
/// assert!(err.message().starts_with("reading config: "));
/// ```
pub trait ResultExt<T> {
    /// Wrap the error with `msg`.
    fn wrap_err(self, msg: impl Into<String>) -> Result<T>;

    /// Wrap the error with a lazily built message.
    fn wrap_err_with<M, F>(self, f: F) -> Result<T>
    where
        M: Into<String>,
        F: FnOnce() -> M;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    #[inline(never)]
    fn wrap_err(self, msg: impl Into<String>) -> Result<T> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Error::from_parts(
                msg.into(),
                Some(Box::new(e)),
                StackCapture::capture(1),
            )),
        }
    }

    #[inline(never)]
    fn wrap_err_with<M, F>(self, f: F) -> Result<T>
    where
        M: Into<String>,
        F: FnOnce() -> M,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Error::from_parts(
                f().into(),
                Some(Box::new(e)),
                StackCapture::capture(1),
            )),
        }
    }
}

// ── OptionExt: missing data ───────────────────────────────────────

/// Turn a missing value into an [`Error`] with a captured stack.
pub trait OptionExt<T> {
    fn ok_or_err(self, msg: impl Into<String>) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    #[inline(never)]
    fn ok_or_err(self, msg: impl Into<String>) -> Result<T> {
        match self {
            Some(v) => Ok(v),
            None => Err(Error::from_parts(msg.into(), None, StackCapture::capture(1))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing() -> std::result::Result<(), io::Error> {
        Err(io::Error::new(io::ErrorKind::NotFound, "missing"))
    }

    #[inline(never)]
    fn read_config() -> Result<()> {
        failing().wrap_err("reading config")
    }

    #[test]
    fn result_ext_wraps() {
        let err = read_config().unwrap_err();
        assert_eq!(err.message(), "reading config: missing");
        let io_err = err
            .unwrap()
            .and_then(|c| c.downcast_ref::<io::Error>())
            .expect("io cause");
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(feature = "native")]
    #[test]
    fn result_ext_captures_call_site() {
        let err = read_config().unwrap_err();
        assert!(
            err.stacks()[0].func.ends_with("read_config"),
            "got {:?}",
            err.stacks()[0]
        );
    }

    #[test]
    fn result_ext_with_closure() {
        let id = 7;
        let err = failing().wrap_err_with(|| format!("loading item {}", id)).unwrap_err();
        assert_eq!(err.message(), "loading item 7: missing");
    }

    #[test]
    fn ok_passes_through() {
        let ok: std::result::Result<u8, io::Error> = Ok(3);
        assert_eq!(ok.wrap_err("unused").unwrap(), 3);
    }

    #[test]
    fn option_ext() {
        let none: Option<u8> = None;
        let err = none.ok_or_err("no event data").unwrap_err();
        assert_eq!(err.message(), "no event data");
        assert!(err.unwrap().is_none());
        assert_eq!(Some(1).ok_or_err("unused").unwrap(), 1);
    }

    #[test]
    fn into_io_error() {
        let io_err: io::Error = Error::new("boom").with("k", 1).into();
        assert_eq!(io_err.kind(), io::ErrorKind::Other);
        let inner = io_err
            .get_ref()
            .and_then(|e| e.downcast_ref::<Error>())
            .expect("stackerr inside");
        assert_eq!(inner.values()["k"], 1);
    }

    #[test]
    fn io_round_trip_keeps_context() {
        let io_err: io::Error = Error::new("x").with("k", 1).into();
        let err = Error::wrap(io_err, "z").with("stage", "read");
        assert_eq!(err.message(), "z: x");
        assert_eq!(err.values()["k"], 1);
        assert_eq!(err.values()["stage"], "read");

        let io_err: io::Error = Error::wrap(Error::new("a"), "b").into();
        assert_eq!(Error::wrap(io_err, "z").message(), "z: b: a");
    }
}
