/// Construct an [`Error`](crate::Error) capturing the caller's stack.
///
/// # Forms
///
/// ```
/// use stackerr::err;
///
/// let id = "evt-1";
///
/// // Plain message
/// let e = err!("no event data");
///
/// // format! arguments
/// let e = err!("invalid ARN: {}", id);
///
/// // Message plus diagnostic values
/// let e = err!("failed to decode secret", { "secret_id" => id, "attempt" => 2 });
/// assert_eq!(e.values()["attempt"], 2);
/// ```
#[macro_export]
macro_rules! err {
    // ── With diagnostic values ────────────────────────────────
    ($msg:expr, { $($key:literal => $value:expr),* $(,)? }) => {{
        #[allow(unused_mut)]
        let mut e = $crate::Error::new($msg);
        $( e.insert($key, $value); )*
        e
    }};

    // ── Literal message (inline captures allowed) ─────────────
    ($msg:literal $(,)?) => {
        $crate::Error::new(::std::format!($msg))
    };

    // ── format! arguments ─────────────────────────────────────
    ($fmt:literal, $($arg:tt)+) => {
        $crate::Error::new(::std::format!($fmt, $($arg)+))
    };

    // ── Any message expression ────────────────────────────────
    ($msg:expr $(,)?) => {
        $crate::Error::new($msg)
    };
}

/// Return early with an [`Error`](crate::Error) built by [`err!`].
///
/// ```
/// use stackerr::{bail, Result};
///
/// fn parse(port: u32) -> Result<u16> {
///     if port > u16::MAX as u32 {
///         bail!("port out of range: {}", port);
///     }
///     Ok(port as u16)
/// }
///
/// assert_eq!(parse(70000).unwrap_err().message(), "port out of range: 70000");
/// ```
#[macro_export]
macro_rules! bail {
    ($($t:tt)+) => {
        return ::core::result::Result::Err(::core::convert::From::from($crate::err!($($t)+)))
    };
}

/// Return early with an [`Error`](crate::Error) unless `cond` holds.
///
/// ```
/// use stackerr::{ensure, Result};
///
/// fn check(body: &str) -> Result<()> {
///     ensure!(!body.is_empty(), "no event data");
///     Ok(())
/// }
///
/// assert!(check("").is_err());
/// assert!(check("{}").is_ok());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($t:tt)+) => {
        if !$cond {
            $crate::bail!($($t)+);
        }
    };
}
