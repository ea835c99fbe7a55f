use std::fmt;
use std::rc::Rc;

use crate::error;
use crate::key::Key;
use crate::value::Value;

/// A boxed cursor over the pairs of a traversable value.
pub type PairIter = Box<dyn Iterator<Item = error::Result<(Key, Value)>>>;

/// A restartable lazy sequence.
///
/// A stream holds a factory rather than a cursor: every call to
/// [`Stream::iter`] starts a fresh traversal from the front. Nothing is
/// computed until that traversal is pulled.
#[derive(Clone)]
pub struct Stream(Rc<dyn Fn() -> PairIter>);

impl Stream {
    pub fn new<F, I>(factory: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: Iterator<Item = error::Result<(Key, Value)>> + 'static,
    {
        Stream(Rc::new(move || Box::new(factory()) as PairIter))
    }

    /// Start a new traversal.
    pub fn iter(&self) -> PairIter {
        (self.0)()
    }

    /// The number of items a traversal yields, if the stream can tell
    /// without being pulled.
    pub fn known_len(&self) -> Option<usize> {
        let (lower, upper) = self.iter().size_hint();
        if upper == Some(lower) {
            Some(lower)
        } else {
            None
        }
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Stream(..)")
    }
}

// streams are compared by identity; two distinct factories are never equal
impl PartialEq for Stream {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}
