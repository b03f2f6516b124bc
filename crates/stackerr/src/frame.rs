use std::fmt;

use serde::Serialize;

/// Placeholder used when an address cannot be mapped to a symbol or file.
pub const UNKNOWN: &str = "unknown";

/// One resolved stack entry.
///
/// Produced by a [`StackBackend`](crate::StackBackend) from an opaque
/// program counter. Immutable once resolved.
///
/// `{}` renders `file:line`; `{:#}` renders `func\n\tfile:line`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Frame {
    pub func: String,
    pub file: String,
    pub line: u32,
}

impl Frame {
    pub fn new(func: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            func: func.into(),
            file: file.into(),
            line,
        }
    }

    /// The sentinel frame for addresses that do not resolve.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN, UNKNOWN, 0)
    }

    /// True if neither the function nor the file could be resolved.
    pub fn is_unknown(&self) -> bool {
        self.func == UNKNOWN && self.file == UNKNOWN
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "{}\n\t{}:{}", self.func, self.file, self.line)
        } else {
            write!(f, "{}:{}", self.file, self.line)
        }
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("func", &self.func)
            .field("location", &format_args!("{}:{}", self.file, self.line))
            .finish()
    }
}
