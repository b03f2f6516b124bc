//! # stackerr: structured errors with stacks and context
//!
//! An error value that captures the call stack where it is created,
//! carries a key/value diagnostic payload, and composes through a chain of
//! causes.
//!
//! ## Design
//!
//! - **[`StackCapture`]**: program counters recorded eagerly at the throw
//!   site, resolved to [`Frame`]s lazily and memoized. Capture and
//!   resolution go through a [`StackBackend`] so platforms without an
//!   unwinder can swap in [`DisabledBackend`].
//!
//! - **[`Error`]**: message, optional owned cause, own capture, diagnostic
//!   map. Chain-aware reads:
//!
//!   | Read               | Result                                            |
//!   |--------------------|---------------------------------------------------|
//!   | `message()`        | `"outer: middle: inner"`                          |
//!   | `values()`         | every node's map merged, outer keys win           |
//!   | `stacks()`         | this node's frames, call site first               |
//!   | `unwrap()`         | the cause, for external chain walkers             |
//!
//! Every walk is bounded at [`MAX_CHAIN_DEPTH`] links, so a foreign error
//! whose `source()` loops cannot hang a reader.
//!
//! ## Quick Start
//!
//! ```rust
//! use stackerr::{Error, ResultExt};
//!
//! fn read_config(path: &str) -> stackerr::Result<String> {
//!     std::fs::read_to_string(path)
//!         .wrap_err("decode failed")
//!         .map_err(|e| e.with("file", path))
//! }
//!
//! let err = read_config("/no/such/a.json").unwrap_err();
//! let err = Error::wrap(err, "load config").with("stage", "startup");
//!
//! assert!(err.message().starts_with("load config: decode failed: "));
//! assert_eq!(err.values()["file"], "/no/such/a.json");
//! assert_eq!(err.values()["stage"], "startup");
//! println!("{:#}", err); // message plus stack trace
//! ```
//!
//! ## Feature Flags
//!
//! | Flag     | Effect |
//! |----------|--------|
//! | `native` | (default) unwinding and symbolization via the `backtrace` crate |
//!
//! ## Environment
//!
//! - `STACKERR_CAPTURE=0` disables capture process-wide (read once).

mod frame;
mod stack;
mod error;
#[macro_use]
mod macros;
mod convert;

pub mod backend;
pub mod chain;
pub mod env;

// ── Public API ────────────────────────────────────────────────────

pub use frame::Frame;
pub use stack::StackCapture;
pub use error::{BoxError, Error, DEFAULT_WRAP_MESSAGE};
pub use convert::{OptionExt, ResultExt};
pub use chain::{Chain, MAX_CHAIN_DEPTH};
pub use backend::{DisabledBackend, StackBackend, MAX_DEPTH};
#[cfg(feature = "native")]
pub use backend::NativeBackend;

/// Diagnostic values are JSON values; re-exported for callers building them.
pub use serde_json::Value;

/// Convenience Result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;
