//! Stack capture backends.
//!
//! The error type never talks to the unwinder directly. It goes through a
//! [`StackBackend`], chosen once per process:
//!
//! | Backend            | Capture                  | Resolve                      |
//! |--------------------|--------------------------|------------------------------|
//! | [`NativeBackend`]  | `backtrace::trace`       | `backtrace::resolve`         |
//! | [`DisabledBackend`]| nothing                  | always [`Frame::unknown`]    |
//!
//! # Environment Variables
//!
//! - `STACKERR_CAPTURE=0` - Disable stack capture (`0`, `false`, `no`, `off`)

use std::fmt;
use std::sync::OnceLock;

use crate::env::env_get_switch;
use crate::Frame;

/// Maximum number of caller frames kept per capture.
pub const MAX_DEPTH: usize = 32;

/// Capability for capturing and symbolizing call stacks.
pub trait StackBackend: Send + Sync + fmt::Debug {
    /// Record caller program counters.
    ///
    /// `marker` is the entry address of the function that requested the
    /// capture; frames up to and including it are dropped, then `skip` more.
    /// At most [`MAX_DEPTH`] addresses are returned. Never fails.
    fn capture(&self, marker: usize, skip: usize) -> Vec<usize>;

    /// Map one captured address to a [`Frame`], or [`Frame::unknown`].
    fn resolve(&self, addr: usize) -> Frame;
}

/// Unwinds and symbolizes through the `backtrace` crate.
#[cfg(feature = "native")]
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeBackend;

/// Frames walked looking for the marker before giving up on it.
#[cfg(feature = "native")]
const MARKER_SEARCH_LIMIT: usize = 64;

#[cfg(feature = "native")]
impl StackBackend for NativeBackend {
    fn capture(&self, marker: usize, skip: usize) -> Vec<usize> {
        let mut raw = Vec::with_capacity(MAX_DEPTH);
        let mut start: Option<usize> = None;

        backtrace::trace(|frame| {
            if start.is_none() && frame.symbol_address() as usize == marker {
                start = Some(raw.len() + 1);
            }
            raw.push(frame.ip() as usize);

            let limit = start.map_or(MARKER_SEARCH_LIMIT, |s| s + skip + MAX_DEPTH);
            raw.len() < limit
        });

        // Without a marker (unwinder cannot report symbol addresses) keep
        // everything; the trace is noisier but still useful.
        let begin = start.unwrap_or(0) + skip;
        raw.into_iter().skip(begin).take(MAX_DEPTH).collect()
    }

    fn resolve(&self, addr: usize) -> Frame {
        let mut resolved: Option<Frame> = None;

        backtrace::resolve(addr as *mut std::ffi::c_void, |symbol| {
            // Inlined calls report several symbols; the first is innermost.
            if resolved.is_some() {
                return;
            }
            let func = symbol.name().map(|name| format!("{:#}", name));
            let file = symbol.filename().map(|path| path.display().to_string());
            if func.is_none() && file.is_none() {
                return;
            }
            resolved = Some(Frame {
                func: func.unwrap_or_else(|| crate::frame::UNKNOWN.to_string()),
                file: file.unwrap_or_else(|| crate::frame::UNKNOWN.to_string()),
                line: symbol.lineno().unwrap_or(0),
            });
        });

        resolved.unwrap_or_else(Frame::unknown)
    }
}

/// Captures nothing. Every address resolves to the unknown frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledBackend;

impl StackBackend for DisabledBackend {
    fn capture(&self, _marker: usize, _skip: usize) -> Vec<usize> {
        Vec::new()
    }

    fn resolve(&self, _addr: usize) -> Frame {
        Frame::unknown()
    }
}

static BACKEND: OnceLock<&'static dyn StackBackend> = OnceLock::new();

/// The process-wide backend.
///
/// Chosen on first use from `STACKERR_CAPTURE` unless [`set_backend`] ran
/// earlier.
pub fn backend() -> &'static dyn StackBackend {
    *BACKEND.get_or_init(default_backend)
}

/// Install a backend before the first capture.
///
/// Returns `false` if a backend was already chosen; the existing one stays.
pub fn set_backend(backend: &'static dyn StackBackend) -> bool {
    BACKEND.set(backend).is_ok()
}

/// Whether stack capture is enabled by the environment (default: on).
pub fn capture_enabled() -> bool {
    env_get_switch("STACKERR_CAPTURE", true)
}

fn default_backend() -> &'static dyn StackBackend {
    if !capture_enabled() {
        tracing::trace!("stack capture disabled by STACKERR_CAPTURE");
        return &DisabledBackend;
    }

    #[cfg(feature = "native")]
    {
        &NativeBackend
    }

    #[cfg(not(feature = "native"))]
    {
        tracing::trace!("stack capture unavailable without the `native` feature");
        &DisabledBackend
    }
}
