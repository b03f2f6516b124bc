use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;

use serde_json::Value;

use crate::chain::Chain;
use crate::{Frame, StackCapture};

/// Message used by [`Error::wrap_default`] when the caller supplies none.
pub const DEFAULT_WRAP_MESSAGE: &str = "wrapped error";

/// The cause slot: exclusively owned, any thread-safe error.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Structured error: one node in a cause chain.
///
/// Each node carries:
///
/// - a **message** of its own,
/// - an optional **cause** (another `Error` or any foreign error),
/// - a **stack** captured where the node was built,
/// - a **diagnostic map** of string keys to JSON values.
///
/// Reads are chain-aware: [`message`](Error::message) joins every link,
/// [`values`](Error::values) merges every node's map (outer wins), and
/// [`stacks`](Error::stacks) resolves this node's capture.
///
/// None of the operations fail or panic; a cyclic foreign cause is cut off
/// after [`MAX_CHAIN_DEPTH`](crate::MAX_CHAIN_DEPTH) links.
///
/// ```
/// use stackerr::Error;
///
/// let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
/// let err = Error::wrap(io, "decode failed").with("file", "a.json");
/// let err = Error::wrap(err, "load config").with("stage", "startup");
///
/// assert_eq!(err.message(), "load config: decode failed: no such file");
/// assert_eq!(err.values()["file"], "a.json");
/// ```
pub struct Error {
    message: String,
    cause: Option<BoxError>,
    stack: StackCapture,
    values: BTreeMap<String, Value>,
}

// ── Constructors ──────────────────────────────────────────────────

impl Error {
    /// A fresh error with no cause, capturing the caller's stack.
    #[inline(never)]
    pub fn new(message: impl Into<String>) -> Self {
        Self::from_parts(message.into(), None, StackCapture::capture(1))
    }

    /// Wrap `cause` with a message, capturing the stack at this call.
    #[inline(never)]
    pub fn wrap<E>(cause: E, message: impl Into<String>) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::from_parts(message.into(), Some(Box::new(cause)), StackCapture::capture(1))
    }

    /// Wrap `cause` with [`DEFAULT_WRAP_MESSAGE`].
    #[inline(never)]
    pub fn wrap_default<E>(cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::from_parts(
            DEFAULT_WRAP_MESSAGE.to_string(),
            Some(Box::new(cause)),
            StackCapture::capture(1),
        )
    }

    /// Wrap an already boxed error.
    #[inline(never)]
    pub fn wrap_boxed(cause: BoxError, message: impl Into<String>) -> Self {
        Self::from_parts(message.into(), Some(cause), StackCapture::capture(1))
    }

    /// Assemble a node from a capture taken elsewhere.
    ///
    /// Adapters capture first and hand the result here, so the trace
    /// starts at their caller rather than inside the adapter.
    pub fn from_parts(message: String, cause: Option<BoxError>, stack: StackCapture) -> Self {
        Self {
            message,
            cause,
            stack,
            values: BTreeMap::new(),
        }
    }
}

// ── Diagnostic values ─────────────────────────────────────────────

impl Error {
    /// Set `key` on this node and return it, for fluent attachment.
    ///
    /// Later writes to the same key win. Causes are never touched.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// In-place form of [`with`](Error::with), for code holding `&mut Error`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

// ── Accessors ─────────────────────────────────────────────────────

impl Error {
    /// This node's message joined with every cause as `"own: cause: ..."`.
    ///
    /// `Error` links contribute their own message; foreign links their
    /// `Display` output.
    pub fn message(&self) -> String {
        crate::chain::render(self)
    }

    /// Every node's diagnostic map merged, innermost first, so entries
    /// set closer to the surface override deeper ones.
    pub fn values(&self) -> BTreeMap<String, Value> {
        let nodes: Vec<&Error> = self
            .chain()
            .filter_map(|link| link.downcast_ref::<Error>())
            .collect();

        let mut merged = BTreeMap::new();
        for node in nodes.into_iter().rev() {
            for (key, value) in &node.values {
                merged.insert(key.clone(), value.clone());
            }
        }
        merged
    }

    /// This node's own capture, resolved.
    ///
    /// Frame 0 is the call site of `new`/`wrap`; later frames walk outward.
    /// Causes keep their own captures; walk the chain to reach them.
    pub fn stacks(&self) -> &[Frame] {
        self.stack.resolve()
    }

    /// The cause, if any.
    pub fn unwrap(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Take ownership of the cause.
    pub fn into_cause(self) -> Option<BoxError> {
        self.cause
    }

    /// This node's message only.
    pub fn own_message(&self) -> &str {
        &self.message
    }

    /// This node's diagnostic map only.
    pub fn own_values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    /// The unresolved capture behind [`stacks`](Error::stacks).
    pub fn stack(&self) -> &StackCapture {
        &self.stack
    }

    /// This error and its causes, outermost first.
    pub fn chain(&self) -> Chain<'_> {
        Chain::new(self)
    }

    /// First `Error` node anywhere in a (possibly foreign-rooted) chain.
    pub fn find_in<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a Error> {
        crate::chain::find::<Error>(err)
    }
}

// ── std::error::Error ─────────────────────────────────────────────

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause.as_deref().map(|e| e as &(dyn StdError + 'static))
    }
}

// ── Display ───────────────────────────────────────────────────────

/// `{}` is the composed message. `{:#}` adds this node's stack trace, one
/// `func` / `file:line` pair per frame.
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())?;
        if f.alternate() {
            for frame in self.stacks() {
                write!(f, "\n{:#}", frame)?;
            }
        }
        Ok(())
    }
}

// ── Debug ─────────────────────────────────────────────────────────

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Error");
        d.field("message", &self.message);
        if !self.values.is_empty() {
            d.field("values", &self.values);
        }
        if let Some(cause) = &self.cause {
            d.field("cause", cause);
        }
        d.field("stack", &format_args!("{} frames", self.stack.len()));
        d.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io;

    #[derive(Debug)]
    struct Foreign(Error);

    impl fmt::Display for Foreign {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("foreign")
        }
    }

    impl StdError for Foreign {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[inline(never)]
    fn oops() -> Error {
        Error::new("omg")
    }

    fn normal_error() -> io::Error {
        io::Error::new(io::ErrorKind::Other, "red")
    }

    #[inline(never)]
    fn wrap_error() -> Error {
        let err = normal_error();
        Error::wrap(err, "orange")
    }

    #[test]
    fn new_error() {
        let err = oops();
        assert_eq!(err.message(), "omg");
        assert_eq!(err.to_string(), "omg");
        assert!(err.unwrap().is_none());
        assert!(err.values().is_empty());
    }

    #[test]
    fn wrap_foreign_error() {
        let err = wrap_error();
        assert_eq!(err.message(), "orange: red");
        assert_eq!(err.own_message(), "orange");
        assert!(err.source().is_some());
        assert_eq!(err.unwrap().map(|c| c.to_string()), Some("red".to_string()));
    }

    #[test]
    fn message_joins_every_node() {
        let err = Error::wrap(Error::wrap(Error::new("a"), "b"), "c");
        assert_eq!(err.message(), "c: b: a");
        assert_eq!(err.message().split(": ").count(), 3);
    }

    #[test]
    fn wrap_without_message_uses_default() {
        let err = Error::wrap_default(normal_error());
        assert_eq!(err.message(), "wrapped error: red");
    }

    #[test]
    fn wrap_boxed_cause() {
        let cause: BoxError = Box::new(normal_error());
        let err = Error::wrap_boxed(cause, "boxed");
        assert_eq!(err.message(), "boxed: red");
        assert!(err.into_cause().is_some());
    }

    #[test]
    fn outer_values_win() {
        let inner = Error::new("a").with("x", 1);
        let outer = Error::wrap(inner, "b").with("x", 2).with("y", 3);
        let values = outer.values();
        assert_eq!(values.len(), 2);
        assert_eq!(values["x"], json!(2));
        assert_eq!(values["y"], json!(3));
    }

    #[test]
    fn fluent_last_write_wins() {
        let values = Error::new("m").with("a", 1).with("a", 2).values();
        assert_eq!(values.len(), 1);
        assert_eq!(values["a"], json!(2));
    }

    #[test]
    fn with_does_not_touch_cause() {
        let outer = Error::wrap(Error::new("inner").with("k", "inner"), "outer").with("k", "outer");
        let inner = outer
            .unwrap()
            .and_then(|c| c.downcast_ref::<Error>())
            .expect("inner node");
        assert_eq!(inner.own_values()["k"], json!("inner"));
        assert_eq!(outer.own_values()["k"], json!("outer"));
    }

    #[test]
    fn insert_in_place() {
        let mut err = Error::new("m");
        err.insert("report.event_id", "abc").insert("count", 3);
        assert_eq!(err.values()["report.event_id"], json!("abc"));
        assert_eq!(err.values()["count"], json!(3));
    }

    #[test]
    fn values_reach_through_foreign_links() {
        let deep = Error::new("deep").with("id", "42");
        let err = Error::wrap(Foreign(deep), "top").with("stage", "run");
        assert_eq!(err.message(), "top: foreign: deep");
        let values = err.values();
        assert_eq!(values["id"], json!("42"));
        assert_eq!(values["stage"], json!("run"));
    }

    #[cfg(feature = "native")]
    #[test]
    fn stack_starts_at_caller() {
        let err = oops();
        let frames = err.stacks();
        assert!(!frames.is_empty());
        assert!(frames[0].func.ends_with("oops"), "got {:?}", frames[0]);
    }

    #[cfg(feature = "native")]
    #[test]
    fn wrap_captures_wrap_site_not_cause_site() {
        let err = wrap_error();
        let frames = err.stacks();
        assert!(frames[0].func.ends_with("wrap_error"), "got {:?}", frames[0]);
        assert!(frames.iter().all(|f| !f.func.ends_with("normal_error")));
    }

    #[test]
    fn stacks_are_idempotent() {
        let err = oops();
        assert_eq!(err.stacks().to_vec(), err.stacks().to_vec());
    }

    #[cfg(feature = "native")]
    #[test]
    fn alternate_display_appends_trace() {
        let err = wrap_error();
        let verbose = format!("{:#}", err);
        assert!(verbose.starts_with("orange: red\n"));
        assert!(verbose.contains("wrap_error\n\t"), "got {}", verbose);
        assert_eq!(format!("{}", err), "orange: red");
    }

    #[test]
    fn debug_lists_fields() {
        let err = Error::wrap(normal_error(), "orange").with("k", "v");
        let s = format!("{:?}", err);
        assert!(s.contains("message: \"orange\""), "got {}", s);
        assert!(s.contains("values"), "got {}", s);
        assert!(s.contains("cause"), "got {}", s);
    }

    #[test]
    fn find_in_foreign_root() {
        let foreign = Foreign(Error::new("inside").with("k", 1));
        let found = Error::find_in(&foreign).expect("stackerr node");
        assert_eq!(found.own_message(), "inside");
    }

    #[test]
    fn send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
