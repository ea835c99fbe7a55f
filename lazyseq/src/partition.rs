use std::cell::RefCell;
use std::hash::Hash;
use std::rc::Rc;

use ahash::{HashMap, HashMapExt};

/// Split a sequence in two by a predicate.
///
/// The first producer yields the items for which the predicate holds, the
/// second the others; both keep the source keys. Each producer traverses its
/// own clone of the source, and the predicate outcome is remembered per key,
/// so the predicate runs at most once per key however the two producers are
/// interleaved.
///
/// Both producers share their memo through an `Rc`; they are meant to be
/// driven from a single thread.
pub fn partition<S, K, V, E, F>(
    pred: F,
    seq: S,
) -> (Partition<S::IntoIter, K, F>, Partition<S::IntoIter, K, F>)
where
    S: IntoIterator<Item = Result<(K, V), E>>,
    S::IntoIter: Clone,
    K: Hash + Eq + Clone,
    F: Fn(&V) -> Result<bool, E>,
{
    let checked = Rc::new(Checked::new(pred));
    let iter = seq.into_iter();
    (
        Partition::new(iter.clone(), true, Rc::clone(&checked)),
        Partition::new(iter, false, checked),
    )
}

/// Predicate outcomes by key, shared by both sides of a partition.
pub(crate) struct Checked<K, F> {
    pred: F,
    outcomes: RefCell<HashMap<K, bool>>,
}

impl<K, F> Checked<K, F> {
    pub(crate) fn new(pred: F) -> Self {
        Self {
            pred,
            outcomes: RefCell::new(HashMap::new()),
        }
    }
}

impl<K: Hash + Eq + Clone, F> Checked<K, F> {
    fn outcome<V, E>(&self, key: &K, value: &V) -> Result<bool, E>
    where
        F: Fn(&V) -> Result<bool, E>,
    {
        if let Some(outcome) = self.outcomes.borrow().get(key) {
            return Ok(*outcome);
        }
        let outcome = (self.pred)(value)?;
        self.outcomes.borrow_mut().insert(key.clone(), outcome);
        Ok(outcome)
    }
}

pub struct Partition<I, K, F> {
    iter: I,
    side: bool,
    checked: Rc<Checked<K, F>>,
    done: bool,
}

impl<I, K, F> Partition<I, K, F> {
    pub(crate) fn new(iter: I, side: bool, checked: Rc<Checked<K, F>>) -> Self {
        Self {
            iter,
            side,
            checked,
            done: false,
        }
    }
}

impl<I, K, V, E, F> Iterator for Partition<I, K, F>
where
    I: Iterator<Item = Result<(K, V), E>>,
    K: Hash + Eq + Clone,
    F: Fn(&V) -> Result<bool, E>,
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
            match self.checked.outcome(&key, &value) {
                Ok(outcome) if outcome == self.side => return Some(Ok((key, value))),
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

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::convert::Infallible;

    use super::*;
    use crate::error::Error;
    use crate::pairs::positional;

    fn values<K, V>(iter: impl Iterator<Item = Result<(K, V), Infallible>>) -> Vec<V> {
        iter.map(|pair| pair.map(|(_, v)| v))
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_partition_even_odd() {
        let calls = Cell::new(0);
        let (even, odd) = partition(
            |v: &i32| {
                calls.set(calls.get() + 1);
                Ok::<_, Infallible>(v % 2 == 0)
            },
            positional(vec![1, 2, 3, 4, 5]),
        );
        assert_eq!(values(even), vec![2, 4]);
        assert_eq!(values(odd), vec![1, 3, 5]);
        assert_eq!(calls.get(), 5);
    }

    #[test]
    fn test_partition_interleaved() {
        let calls = Cell::new(0);
        let (mut even, mut odd) = partition(
            |v: &i32| {
                calls.set(calls.get() + 1);
                Ok::<_, Infallible>(v % 2 == 0)
            },
            positional(vec![1, 2, 3, 4, 5]),
        );
        assert_eq!(odd.next(), Some(Ok((0, 1))));
        assert_eq!(even.next(), Some(Ok((1, 2))));
        assert_eq!(even.next(), Some(Ok((3, 4))));
        assert_eq!(odd.next(), Some(Ok((2, 3))));
        assert_eq!(odd.next(), Some(Ok((4, 5))));
        assert_eq!(even.next(), None);
        assert_eq!(odd.next(), None);
        assert_eq!(calls.get(), 5);
    }

    #[test]
    fn test_partition_one_side_abandoned() {
        let calls = Cell::new(0);
        let (even, odd) = partition(
            |v: &i32| {
                calls.set(calls.get() + 1);
                Ok::<_, Infallible>(v % 2 == 0)
            },
            positional(vec![1, 2, 3]),
        );
        std::mem::drop(odd);
        assert_eq!(values(even), vec![2]);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_partition_keeps_keys() {
        let source = vec![("a", 1), ("b", 2), ("c", 3)];
        let (big, small) = partition(
            |v: &i32| Ok::<_, Infallible>(*v > 1),
            crate::pairs::keyed(source),
        );
        assert_eq!(
            big.collect::<Result<Vec<_>, _>>(),
            Ok(vec![("b", 2), ("c", 3)])
        );
        assert_eq!(small.collect::<Result<Vec<_>, _>>(), Ok(vec![("a", 1)]));
    }

    #[test]
    fn test_partition_error_is_not_cached() {
        let (mut yes, _no) = partition(
            |v: &i32| {
                if *v == 2 {
                    Err(Error::raised("bad"))
                } else {
                    Ok(true)
                }
            },
            positional(vec![1, 2, 3]),
        );
        assert_eq!(yes.next(), Some(Ok((0, 1))));
        assert_eq!(yes.next(), Some(Err(Error::raised("bad"))));
        assert_eq!(yes.next(), None);
    }
}
