//! Single-sequence transforms.
//!
//! Each adapter pulls from its source only when it is pulled itself. An
//! `Err` coming from the source is passed on as is; an `Err` returned by a
//! callable is passed on and finishes the adapter.

use crate::error;
use crate::validate;

/// Apply a function to each value, keeping keys.
pub fn map<S, K, V, U, E, F>(f: F, seq: S) -> MapValues<S::IntoIter, F>
where
    S: IntoIterator<Item = Result<(K, V), E>>,
    F: FnMut(V) -> Result<U, E>,
{
    MapValues::new(seq.into_iter(), f)
}

/// Keep the items for which the predicate holds, keeping keys.
pub fn filter<S, K, V, E, F>(pred: F, seq: S) -> Filter<S::IntoIter, F>
where
    S: IntoIterator<Item = Result<(K, V), E>>,
    F: FnMut(&V) -> Result<bool, E>,
{
    Filter::new(seq.into_iter(), pred, true)
}

/// Keep the items for which the predicate does not hold, keeping keys.
pub fn filter_not<S, K, V, E, F>(pred: F, seq: S) -> Filter<S::IntoIter, F>
where
    S: IntoIterator<Item = Result<(K, V), E>>,
    F: FnMut(&V) -> Result<bool, E>,
{
    Filter::new(seq.into_iter(), pred, false)
}

/// Take up to `n` items, sampling every `step`-th item from the front.
///
/// The source must report its exact length.
pub fn take<S, K, V, E>(seq: S, n: usize, step: usize) -> error::Result<TakeStep<S::IntoIter>>
where
    S: IntoIterator<Item = Result<(K, V), E>>,
{
    TakeStep::new(seq.into_iter(), n, step)
}

/// Yield items while the predicate holds, stopping at the first failure.
pub fn take_while<S, K, V, E, F>(pred: F, seq: S) -> TakeWhile<S::IntoIter, F>
where
    S: IntoIterator<Item = Result<(K, V), E>>,
    F: FnMut(&V) -> Result<bool, E>,
{
    TakeWhile::new(seq.into_iter(), pred)
}

/// Skip the first `n` items; the rest is keyed by position.
pub fn drop<S, K, V, E>(seq: S, n: usize) -> DropFirst<S::IntoIter>
where
    S: IntoIterator<Item = Result<(K, V), E>>,
{
    DropFirst::new(seq.into_iter(), n)
}

/// Skip items while the predicate holds, then yield everything.
pub fn drop_while<S, K, V, E, F>(pred: F, seq: S) -> DropWhile<S::IntoIter, F>
where
    S: IntoIterator<Item = Result<(K, V), E>>,
    F: FnMut(&V) -> Result<bool, E>,
{
    DropWhile::new(seq.into_iter(), pred)
}

pub struct MapValues<I, F> {
    iter: I,
    f: F,
    done: bool,
}

impl<I, F> MapValues<I, F> {
    pub(crate) fn new(iter: I, f: F) -> Self {
        Self {
            iter,
            f,
            done: false,
        }
    }
}

impl<I, K, V, U, E, F> Iterator for MapValues<I, F>
where
    I: Iterator<Item = Result<(K, V), E>>,
    F: FnMut(V) -> Result<U, E>,
{
    type Item = Result<(K, U), E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let (key, value) = match self.iter.next()? {
            Ok(pair) => pair,
            Err(e) => return Some(Err(e)),
        };
        match (self.f)(value) {
            Ok(value) => Some(Ok((key, value))),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            self.iter.size_hint()
        }
    }
}

pub struct Filter<I, F> {
    iter: I,
    pred: F,
    // the predicate outcome that lets an item through
    keep: bool,
    done: bool,
}

impl<I, F> Filter<I, F> {
    pub(crate) fn new(iter: I, pred: F, keep: bool) -> Self {
        Self {
            iter,
            pred,
            keep,
            done: false,
        }
    }
}

impl<I, K, V, E, F> Iterator for Filter<I, F>
where
    I: Iterator<Item = Result<(K, V), E>>,
    F: FnMut(&V) -> Result<bool, E>,
{
    type Item = Result<(K, V), E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let (key, value) = match self.iter.next()? {
                Ok(pair) => pair,
                Err(e) => return Some(Err(e)),
            };
            match (self.pred)(&value) {
                Ok(outcome) if outcome == self.keep => return Some(Ok((key, value))),
                Ok(_) => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let (_, upper) = self.iter.size_hint();
        (0, upper)
    }
}

/// Sample every `step`th item, at most `n` of them.
///
/// `size_hint` counts the sampled items only. A source `Err` is always
/// passed on, even at a position that is not sampled, so a failing source
/// can yield more items than the hint reported.
pub struct TakeStep<I> {
    iter: I,
    // raw positions below this bound are candidates
    bound: usize,
    step: usize,
    position: usize,
}

impl<I: Iterator> TakeStep<I> {
    pub(crate) fn new(iter: I, n: usize, step: usize) -> error::Result<Self> {
        let step = validate::non_zero(step, 3)?;
        let len = validate::exact_len(&iter, 1)?;
        Ok(Self {
            iter,
            bound: len.min(n.saturating_mul(step)),
            step,
            position: 0,
        })
    }

    fn remaining(&self) -> usize {
        if self.position >= self.bound {
            return 0;
        }
        // first sampled position at or after the cursor
        let first = self.position.div_ceil(self.step) * self.step;
        if first >= self.bound {
            0
        } else {
            (self.bound - 1 - first) / self.step + 1
        }
    }
}

impl<I, K, V, E> Iterator for TakeStep<I>
where
    I: Iterator<Item = Result<(K, V), E>>,
{
    type Item = Result<(K, V), E>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.position >= self.bound {
                return None;
            }
            let pair = self.iter.next()?;
            let position = self.position;
            self.position += 1;
            if pair.is_err() || position % self.step == 0 {
                return Some(pair);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

pub struct TakeWhile<I, F> {
    iter: I,
    pred: F,
    done: bool,
}

impl<I, F> TakeWhile<I, F> {
    pub(crate) fn new(iter: I, pred: F) -> Self {
        Self {
            iter,
            pred,
            done: false,
        }
    }
}

impl<I, K, V, E, F> Iterator for TakeWhile<I, F>
where
    I: Iterator<Item = Result<(K, V), E>>,
    F: FnMut(&V) -> Result<bool, E>,
{
    type Item = Result<(K, V), E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let (key, value) = match self.iter.next()? {
            Ok(pair) => pair,
            Err(e) => return Some(Err(e)),
        };
        match (self.pred)(&value) {
            Ok(true) => Some(Ok((key, value))),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let (_, upper) = self.iter.size_hint();
        (0, upper)
    }
}

pub struct DropFirst<I> {
    iter: I,
    skip: usize,
    index: usize,
}

impl<I> DropFirst<I> {
    pub(crate) fn new(iter: I, n: usize) -> Self {
        Self {
            iter,
            skip: n,
            index: 0,
        }
    }
}

impl<I, K, V, E> Iterator for DropFirst<I>
where
    I: Iterator<Item = Result<(K, V), E>>,
{
    type Item = Result<(usize, V), E>;

    fn next(&mut self) -> Option<Self::Item> {
        // errors are passed on without counting as a skipped item
        while self.skip > 0 {
            if let Err(e) = self.iter.next()? {
                return Some(Err(e));
            }
            self.skip -= 1;
        }
        let pair = self.iter.next()?;
        Some(pair.map(|(_, value)| {
            let index = self.index;
            self.index += 1;
            (index, value)
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.iter.size_hint();
        (
            lower.saturating_sub(self.skip),
            upper.map(|upper| upper.saturating_sub(self.skip)),
        )
    }
}

pub struct DropWhile<I, F> {
    iter: I,
    pred: F,
    dropping: bool,
    done: bool,
}

impl<I, F> DropWhile<I, F> {
    pub(crate) fn new(iter: I, pred: F) -> Self {
        Self {
            iter,
            pred,
            dropping: true,
            done: false,
        }
    }
}

impl<I, K, V, E, F> Iterator for DropWhile<I, F>
where
    I: Iterator<Item = Result<(K, V), E>>,
    F: FnMut(&V) -> Result<bool, E>,
{
    type Item = Result<(K, V), E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        // once the predicate has failed it is never consulted again
        while self.dropping {
            let (key, value) = match self.iter.next()? {
                Ok(pair) => pair,
                Err(e) => return Some(Err(e)),
            };
            match (self.pred)(&value) {
                Ok(true) => continue,
                Ok(false) => {
                    self.dropping = false;
                    return Some(Ok((key, value)));
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let (lower, upper) = self.iter.size_hint();
        if self.dropping {
            (0, upper)
        } else {
            (lower, upper)
        }
    }
}
