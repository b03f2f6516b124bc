//! Bounded walks over `std::error::Error::source` chains.
//!
//! Foreign error types implement `source()` however they like, so a chain
//! may loop back on itself. Every walk here stops after
//! [`MAX_CHAIN_DEPTH`] links.
//!
//! A custom `io::Error` is transparent: its `source()` skips the error it
//! wraps, so walks step into `get_ref()` when that error carries more than
//! its text (an [`Error`] node, or a source of its own).

use std::error::Error as StdError;
use std::fmt::Write as _;
use std::io;

use crate::Error;

/// Maximum number of links visited in one chain walk, the head included.
pub const MAX_CHAIN_DEPTH: usize = 16;

/// Iterator over an error and its causes, outermost first.
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
    remaining: usize,
}

impl<'a> Chain<'a> {
    pub fn new(head: &'a (dyn StdError + 'static)) -> Self {
        Self {
            next: Some(head),
            remaining: MAX_CHAIN_DEPTH,
        }
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next.take()?;
        self.remaining -= 1;
        self.next = transparent_inner(current).or_else(|| current.source());
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.remaining == 0 {
            return (0, Some(0));
        }
        match self.next {
            Some(_) => (1, Some(self.remaining)),
            None => (0, Some(0)),
        }
    }
}

impl std::fmt::Debug for Chain<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.clone().map(|e| e.to_string())).finish()
    }
}

/// The error a custom `io::Error` wraps, when it is worth a link of its own.
fn transparent_inner<'a>(link: &'a (dyn StdError + 'static)) -> Option<&'a (dyn StdError + 'static)> {
    let inner: &(dyn StdError + 'static) = link.downcast_ref::<io::Error>()?.get_ref()?;
    if inner.is::<Error>() || inner.source().is_some() {
        Some(inner)
    } else {
        None
    }
}

/// First link in the chain of concrete type `T`.
pub fn find<'a, T>(err: &'a (dyn StdError + 'static)) -> Option<&'a T>
where
    T: StdError + 'static,
{
    Chain::new(err).find_map(|link| link.downcast_ref::<T>())
}

/// True if any link in the chain is a `T`.
pub fn contains<T>(err: &(dyn StdError + 'static)) -> bool
where
    T: StdError + 'static,
{
    find::<T>(err).is_some()
}

/// Every link's text joined with `": "`, outermost first.
///
/// [`Error`] links contribute their own message only (their `Display`
/// already includes the causes); foreign links contribute `Display`. A
/// custom `io::Error` shows its inner error's text, so it is skipped when
/// that inner error is the next link.
pub fn render(err: &(dyn StdError + 'static)) -> String {
    let mut out = String::new();
    let mut links = Chain::new(err).peekable();
    let mut first = true;
    while let Some(link) = links.next() {
        if transparent_inner(link).is_some() && links.peek().is_some() {
            continue;
        }
        if !first {
            out.push_str(": ");
        }
        first = false;
        match link.downcast_ref::<Error>() {
            Some(node) => out.push_str(node.own_message()),
            None => {
                let _ = write!(out, "{}", link);
            }
        }
    }
    out
}

/// The innermost reachable link (bounded like every other walk).
pub fn root_cause<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    Chain::new(err).last().unwrap_or(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;
    use std::io;

    #[derive(Debug)]
    struct Looping;

    static LOOP: Looping = Looping;

    impl fmt::Display for Looping {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("loop")
        }
    }

    impl StdError for Looping {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&LOOP)
        }
    }

    #[derive(Debug)]
    struct Outer(io::Error);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("outer")
        }
    }

    impl StdError for Outer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn walks_outermost_first() {
        let err = Outer(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let links: Vec<String> = Chain::new(&err).map(|e| e.to_string()).collect();
        assert_eq!(links, vec!["outer", "gone"]);
    }

    #[test]
    fn cycle_is_bounded() {
        assert_eq!(Chain::new(&LOOP).count(), MAX_CHAIN_DEPTH);
        assert!(!contains::<io::Error>(&LOOP));

        let mut chain = Chain::new(&LOOP);
        chain.by_ref().take(MAX_CHAIN_DEPTH).for_each(drop);
        assert_eq!(chain.size_hint(), (0, Some(0)));
        assert!(chain.next().is_none());
    }

    #[test]
    fn steps_through_custom_io_error() {
        let io_err: io::Error = Error::wrap(Error::new("a").with("k", 1), "b").into();
        let err = Error::wrap(io_err, "z");

        assert_eq!(Chain::new(&err).count(), 4);
        assert_eq!(render(&err), "z: b: a");
        assert_eq!(err.message(), "z: b: a");
        assert_eq!(err.values()["k"], 1);
        assert!(contains::<io::Error>(&err));
    }

    #[test]
    fn plain_io_error_is_one_link() {
        let err = Error::wrap(io::Error::new(io::ErrorKind::NotFound, "gone"), "open");
        assert_eq!(Chain::new(&err).count(), 2);
        assert_eq!(render(&err), "open: gone");
    }

    #[test]
    fn custom_io_error_at_head_renders_once() {
        let io_err: io::Error = Error::new("gone").into();
        assert_eq!(render(&io_err), "gone");
        assert_eq!(root_cause(&io_err).to_string(), "gone");
    }

    #[test]
    fn find_and_contains() {
        let err = Outer(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let io_err = find::<io::Error>(&err).expect("io error in chain");
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);
        assert!(contains::<Outer>(&err));
        assert!(!contains::<Looping>(&err));
    }

    #[test]
    fn render_foreign_root() {
        let err = Outer(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(render(&err), "outer: gone");
        assert_eq!(render(&LOOP).split(": ").count(), MAX_CHAIN_DEPTH);
    }

    #[test]
    fn render_mixed_chain() {
        let inner = Error::new("inner");
        let err = Error::wrap(inner, "outer");
        assert_eq!(render(&err), "outer: inner");
        assert_eq!(render(&err), err.message());
    }

    #[test]
    fn root_cause_is_innermost() {
        let err = Outer(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(root_cause(&err).to_string(), "gone");
        assert_eq!(root_cause(&LOOP).to_string(), "loop");
    }
}
