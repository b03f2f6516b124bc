use std::fmt;
use std::sync::OnceLock;

use crate::backend::{backend, StackBackend};
use crate::Frame;

/// A call-stack snapshot taken at error construction.
///
/// Capture is eager (the stack is gone once the caller returns); resolution
/// to [`Frame`]s is lazy and memoized, so the symbol-table walk is only paid
/// when a trace is actually rendered.
///
/// The first address belongs to the function that requested the capture
/// (after `skip` wrapper frames); later ones walk outward toward `main`.
pub struct StackCapture {
    addrs: Vec<usize>,
    backend: &'static dyn StackBackend,
    frames: OnceLock<Vec<Frame>>,
}

impl StackCapture {
    /// Capture the caller's stack with the process-wide backend.
    ///
    /// `skip` counts wrapper frames between the caller of interest and this
    /// call: `0` makes the function calling `capture` the first frame.
    #[inline(never)]
    pub fn capture(skip: usize) -> Self {
        Self::capture_in(backend(), skip + 1)
    }

    /// Capture through an explicit backend.
    #[inline(never)]
    pub fn capture_in(backend: &'static dyn StackBackend, skip: usize) -> Self {
        let marker = Self::capture_in as usize;
        Self {
            addrs: backend.capture(marker, skip),
            backend,
            frames: OnceLock::new(),
        }
    }

    /// Build a capture from raw addresses, resolved by the process-wide
    /// backend.
    pub fn from_addresses(addrs: Vec<usize>) -> Self {
        Self::from_addresses_in(backend(), addrs)
    }

    /// Build a capture from raw addresses and a specific backend.
    pub fn from_addresses_in(backend: &'static dyn StackBackend, addrs: Vec<usize>) -> Self {
        Self {
            addrs,
            backend,
            frames: OnceLock::new(),
        }
    }

    /// An empty capture. Resolves to no frames.
    pub fn empty() -> Self {
        Self::from_addresses(Vec::new())
    }

    /// The raw program counters, innermost first.
    pub fn addresses(&self) -> &[usize] {
        &self.addrs
    }

    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }

    /// Resolve every address, memoizing the result.
    ///
    /// Repeated calls return the same frames; concurrent callers resolve at
    /// most once.
    pub fn resolve(&self) -> &[Frame] {
        self.frames
            .get_or_init(|| self.resolve_with(self.backend))
    }

    /// Resolve through another backend, bypassing the memo.
    pub fn resolve_with(&self, backend: &dyn StackBackend) -> Vec<Frame> {
        self.addrs.iter().map(|&addr| backend.resolve(addr)).collect()
    }
}

impl Clone for StackCapture {
    fn clone(&self) -> Self {
        Self {
            addrs: self.addrs.clone(),
            backend: self.backend,
            frames: self.frames.clone(),
        }
    }
}

/// `{}` renders one `file:line` per line; `{:#}` renders
/// `func\n\tfile:line` per frame.
impl fmt::Display for StackCapture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, frame) in self.resolve().iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            if f.alternate() {
                write!(f, "{:#}", frame)?;
            } else {
                write!(f, "{}", frame)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for StackCapture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("StackCapture");
        d.field("depth", &self.addrs.len());
        d.field("backend", &self.backend);
        if let Some(frames) = self.frames.get() {
            d.field("frames", frames);
        }
        d.finish()
    }
}
