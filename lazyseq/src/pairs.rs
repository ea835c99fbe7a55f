use std::hash::Hash;
use std::marker::PhantomData;

use crate::error;
use crate::flatten::{Depth, FlatMap, Flatten, Nested};
use crate::partition::{self, Partition};
use crate::transform::{DropFirst, DropWhile, Filter, MapValues, TakeStep, TakeWhile};

/// Lift a plain iterator into a pair stream keyed by position.
pub fn positional<I, E>(iter: I) -> Positional<I::IntoIter, E>
where
    I: IntoIterator,
{
    Positional {
        iter: iter.into_iter(),
        index: 0,
        error: PhantomData,
    }
}

/// Lift an iterator of `(key, value)` tuples into a pair stream.
pub fn keyed<I, K, V, E>(iter: I) -> Keyed<I::IntoIter, E>
where
    I: IntoIterator<Item = (K, V)>,
{
    Keyed {
        iter: iter.into_iter(),
        error: PhantomData,
    }
}

pub struct Positional<I, E> {
    iter: I,
    index: usize,
    error: PhantomData<fn() -> E>,
}

// derive(Clone) would require E: Clone
impl<I: Clone, E> Clone for Positional<I, E> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
            index: self.index,
            error: PhantomData,
        }
    }
}

impl<I: Iterator, E> Iterator for Positional<I, E> {
    type Item = Result<(usize, I::Item), E>;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.iter.next()?;
        let index = self.index;
        self.index += 1;
        Some(Ok((index, value)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

pub struct Keyed<I, E> {
    iter: I,
    error: PhantomData<fn() -> E>,
}

impl<I: Clone, E> Clone for Keyed<I, E> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
            error: PhantomData,
        }
    }
}

impl<I, K, V, E> Iterator for Keyed<I, E>
where
    I: Iterator<Item = (K, V)>,
{
    type Item = Result<(K, V), E>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(Ok)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// The sequence operations as methods on any pair stream.
pub trait PairsExt<K, V, E>: Iterator<Item = Result<(K, V), E>> + Sized {
    fn map_values<U, F>(self, f: F) -> MapValues<Self, F>
    where
        F: FnMut(V) -> Result<U, E>,
    {
        MapValues::new(self, f)
    }

    fn filter_values<F>(self, pred: F) -> Filter<Self, F>
    where
        F: FnMut(&V) -> Result<bool, E>,
    {
        Filter::new(self, pred, true)
    }

    fn filter_not<F>(self, pred: F) -> Filter<Self, F>
    where
        F: FnMut(&V) -> Result<bool, E>,
    {
        Filter::new(self, pred, false)
    }

    /// See [`take`](crate::take).
    fn take_step(self, n: usize, step: usize) -> error::Result<TakeStep<Self>> {
        TakeStep::new(self, n, step)
    }

    fn take_while_values<F>(self, pred: F) -> TakeWhile<Self, F>
    where
        F: FnMut(&V) -> Result<bool, E>,
    {
        TakeWhile::new(self, pred)
    }

    fn drop_items(self, n: usize) -> DropFirst<Self> {
        DropFirst::new(self, n)
    }

    fn drop_while_values<F>(self, pred: F) -> DropWhile<Self, F>
    where
        F: FnMut(&V) -> Result<bool, E>,
    {
        DropWhile::new(self, pred)
    }

    fn flat_map_values<J, U, F>(self, f: F) -> FlatMap<Self, F, J::IntoIter>
    where
        F: FnMut(V) -> Result<J, E>,
        J: IntoIterator<Item = Result<U, E>>,
    {
        FlatMap::new(self, f)
    }

    fn flatten_values(self, depth: impl Into<Depth>) -> Flatten<Self, V>
    where
        V: Nested<Error = E>,
    {
        Flatten::new(self, depth.into())
    }

    fn partition_values<F>(self, pred: F) -> (Partition<Self, K, F>, Partition<Self, K, F>)
    where
        Self: Clone,
        K: Hash + Eq + Clone,
        F: Fn(&V) -> Result<bool, E>,
    {
        partition::partition(pred, self)
    }
}

impl<I, K, V, E> PairsExt<K, V, E> for I where I: Iterator<Item = Result<(K, V), E>> {}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;

    #[test]
    fn test_positional() {
        let pairs = positional::<_, Infallible>(["a", "b"]).collect::<Result<Vec<_>, _>>();
        assert_eq!(pairs, Ok(vec![(0, "a"), (1, "b")]));
    }

    #[test]
    fn test_keyed() {
        let pairs = keyed::<_, _, _, Infallible>([("x", 1), ("y", 2)]);
        assert_eq!(pairs.size_hint(), (2, Some(2)));
        assert_eq!(
            pairs.collect::<Result<Vec<_>, _>>(),
            Ok(vec![("x", 1), ("y", 2)])
        );
    }

    #[test]
    fn test_chained_methods() {
        let result = positional::<_, Infallible>(1..=10)
            .filter_values(|v| Ok(v % 2 == 1))
            .map_values(|v| Ok(v * v))
            .drop_items(1)
            .take_while_values(|v| Ok(*v < 50))
            .map(|pair| pair.map(|(_, v)| v))
            .collect::<Result<Vec<_>, _>>();
        assert_eq!(result, Ok(vec![9, 25, 49]));
    }

    #[test]
    fn test_take_step_after_map_keeps_exact_length() {
        let result = positional::<_, Infallible>(vec![1, 2, 3, 4, 5, 6])
            .map_values(|v| Ok(v + 100))
            .take_step(3, 2)
            .unwrap()
            .map(|pair| pair.map(|(_, v)| v))
            .collect::<Result<Vec<_>, _>>();
        assert_eq!(result, Ok(vec![101, 103, 105]));
    }

    #[test]
    fn test_take_step_after_filter_is_rejected() {
        let result = positional::<_, Infallible>(vec![1, 2, 3])
            .filter_values(|v| Ok(*v > 1))
            .take_step(1, 1);
        assert!(result.is_err());
    }
}
