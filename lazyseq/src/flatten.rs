use crate::error;
use crate::value::{Traversable, Value, Values};

/// How many levels of nesting `flatten` expands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Depth {
    /// Expand every nested value, however deep.
    #[default]
    Unbounded,
    /// Expand this many levels. `Limited(0)` expands nothing.
    Limited(usize),
}

impl Depth {
    // the depth to use for the children of an expanded value, or `None` if
    // values at this depth are not expanded
    fn descend(self) -> Option<Depth> {
        match self {
            Depth::Unbounded => Some(Depth::Unbounded),
            Depth::Limited(0) => None,
            Depth::Limited(n) => Some(Depth::Limited(n - 1)),
        }
    }
}

impl From<Option<usize>> for Depth {
    fn from(depth: Option<usize>) -> Self {
        depth.map_or(Depth::Unbounded, Depth::Limited)
    }
}

impl From<usize> for Depth {
    fn from(depth: usize) -> Self {
        Depth::Limited(depth)
    }
}

/// A value that may itself contain values.
pub trait Nested: Sized {
    type Error;
    type Children: Iterator<Item = Result<Self, Self::Error>>;

    /// The direct children, or `None` for a leaf.
    fn children(&self) -> Option<Self::Children>;
}

impl Nested for Value {
    type Error = error::Error;
    type Children = Values;

    fn children(&self) -> Option<Values> {
        Traversable::new(self).map(|t| t.values())
    }
}

/// Expand nested values into one sequence, keyed by position.
pub fn flatten<S, K, V, E>(seq: S, depth: impl Into<Depth>) -> Flatten<S::IntoIter, V>
where
    S: IntoIterator<Item = Result<(K, V), E>>,
    V: Nested<Error = E>,
{
    Flatten::new(seq.into_iter(), depth.into())
}

/// Map each value to an iterable and yield its elements, keyed by position.
pub fn flat_map<S, K, V, U, E, F, J>(f: F, seq: S) -> FlatMap<S::IntoIter, F, J::IntoIter>
where
    S: IntoIterator<Item = Result<(K, V), E>>,
    F: FnMut(V) -> Result<J, E>,
    J: IntoIterator<Item = Result<U, E>>,
{
    FlatMap::new(seq.into_iter(), f)
}

pub struct Flatten<I, V: Nested> {
    outer: I,
    depth: Depth,
    // children being expanded, innermost last, each with the depth its own
    // items are expanded at
    stack: Vec<(V::Children, Depth)>,
    index: usize,
}

impl<I, V: Nested> Flatten<I, V> {
    pub(crate) fn new(outer: I, depth: Depth) -> Self {
        Self {
            outer,
            depth,
            stack: Vec::new(),
            index: 0,
        }
    }
}

impl<I, K, V> Iterator for Flatten<I, V>
where
    I: Iterator<Item = Result<(K, V), V::Error>>,
    V: Nested,
{
    type Item = Result<(usize, V), V::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let pulled = match self.stack.last_mut() {
                Some((children, depth)) => Some((children.next(), *depth)),
                None => None,
            };
            let (item, depth) = match pulled {
                Some((Some(item), depth)) => (item, depth),
                Some((None, _)) => {
                    self.stack.pop();
                    continue;
                }
                None => (self.outer.next()?.map(|(_, value)| value), self.depth),
            };
            let value = match item {
                Ok(value) => value,
                Err(e) => return Some(Err(e)),
            };
            if let Some(child_depth) = depth.descend() {
                if let Some(children) = value.children() {
                    self.stack.push((children, child_depth));
                    continue;
                }
            }
            let index = self.index;
            self.index += 1;
            return Some(Ok((index, value)));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.stack.is_empty() && self.depth == Depth::Limited(0) {
            self.outer.size_hint()
        } else {
            (0, None)
        }
    }
}

pub struct FlatMap<I, F, J> {
    iter: I,
    f: F,
    inner: Option<J>,
    index: usize,
    done: bool,
}

impl<I, F, J> FlatMap<I, F, J> {
    pub(crate) fn new(iter: I, f: F) -> Self {
        Self {
            iter,
            f,
            inner: None,
            index: 0,
            done: false,
        }
    }
}

impl<I, K, V, U, E, F, J, JI> Iterator for FlatMap<I, F, J>
where
    I: Iterator<Item = Result<(K, V), E>>,
    F: FnMut(V) -> Result<JI, E>,
    JI: IntoIterator<IntoIter = J, Item = Result<U, E>>,
    J: Iterator<Item = Result<U, E>>,
{
    type Item = Result<(usize, U), E>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(inner) = &mut self.inner {
                match inner.next() {
                    Some(Ok(value)) => {
                        let index = self.index;
                        self.index += 1;
                        return Some(Ok((index, value)));
                    }
                    Some(Err(e)) => return Some(Err(e)),
                    None => self.inner = None,
                }
            }
            if self.done {
                return None;
            }
            let (_, value) = match self.iter.next()? {
                Ok(pair) => pair,
                Err(e) => return Some(Err(e)),
            };
            match (self.f)(value) {
                Ok(inner) => self.inner = Some(inner.into_iter()),
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;
    use crate::error::Error;
    use crate::pairs::positional;

    #[derive(Debug, Clone, PartialEq)]
    enum Tree {
        Leaf(i32),
        Node(Vec<Tree>),
    }

    impl Nested for Tree {
        type Error = Infallible;
        type Children =
            std::iter::Map<std::vec::IntoIter<Tree>, fn(Tree) -> Result<Tree, Infallible>>;

        fn children(&self) -> Option<Self::Children> {
            match self {
                Tree::Leaf(_) => None,
                Tree::Node(children) => Some(
                    children
                        .clone()
                        .into_iter()
                        .map(Ok as fn(Tree) -> Result<Tree, Infallible>),
                ),
            }
        }
    }

    fn leaf(i: i32) -> Tree {
        Tree::Leaf(i)
    }

    fn sample() -> Vec<Tree> {
        // [1, [2, 3], [4, [5, 6]]]
        vec![
            leaf(1),
            Tree::Node(vec![leaf(2), leaf(3)]),
            Tree::Node(vec![leaf(4), Tree::Node(vec![leaf(5), leaf(6)])]),
        ]
    }

    fn flattened(depth: Depth) -> Vec<Tree> {
        flatten(positional::<_, Infallible>(sample()), depth)
            .map(|pair| pair.map(|(_, v)| v))
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_flatten_unbounded() {
        assert_eq!(
            flattened(Depth::Unbounded),
            (1..=6).map(leaf).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_flatten_one_level() {
        assert_eq!(
            flattened(Depth::Limited(1)),
            vec![
                leaf(1),
                leaf(2),
                leaf(3),
                leaf(4),
                Tree::Node(vec![leaf(5), leaf(6)])
            ]
        );
    }

    #[test]
    fn test_flatten_zero_levels_is_identity() {
        assert_eq!(flattened(Depth::Limited(0)), sample());
    }

    #[test]
    fn test_flatten_renumbers_keys() {
        let keys = flatten(positional::<_, Infallible>(sample()), Depth::Unbounded)
            .map(|pair| pair.map(|(k, _)| k))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(keys, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_flatten_skips_empty_children() {
        let source = vec![Tree::Node(vec![]), leaf(1), Tree::Node(vec![Tree::Node(vec![])])];
        let flat = flatten(positional::<_, Infallible>(source), Depth::Unbounded)
            .map(|pair| pair.map(|(_, v)| v))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(flat, vec![leaf(1)]);
    }

    #[test]
    fn test_depth_from_option() {
        assert_eq!(Depth::from(None::<usize>), Depth::Unbounded);
        assert_eq!(Depth::from(Some(2)), Depth::Limited(2));
    }

    #[test]
    fn test_flat_map() {
        let result = flat_map(
            |v: i32| Ok::<_, Infallible>(vec![Ok(v), Ok(v)]),
            positional(vec![1, 2]),
        )
        .collect::<Result<Vec<_>, _>>();
        assert_eq!(result, Ok(vec![(0, 1), (1, 1), (2, 2), (3, 2)]));
    }

    #[test]
    fn test_flat_map_error_terminates() {
        let mut result = flat_map(
            |v: i32| {
                if v == 2 {
                    Err(Error::raised("no"))
                } else {
                    Ok(vec![Ok(v)])
                }
            },
            positional(vec![1, 2, 3]),
        );
        assert_eq!(result.next(), Some(Ok((0, 1))));
        assert_eq!(result.next(), Some(Err(Error::raised("no"))));
        assert_eq!(result.next(), None);
    }
}
