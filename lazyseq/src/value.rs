use std::rc::Rc;

use ahash::RandomState;
use indexmap::IndexMap;
use ordered_float::OrderedFloat;

use crate::error::{self, Kind};
use crate::key::Key;
use crate::stream::{PairIter, Stream};

/// A dynamically typed value.
///
/// Lists, maps and lazy sequences are traversable; every other value is a
/// leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Str(Rc<str>),
    /// An ordered list, keyed by position.
    List(Rc<[Value]>),
    /// An ordered associative container.
    Map(Rc<[(Key, Value)]>),
    /// A lazy sequence, such as the result of an operation.
    Seq(Stream),
}

// a static assertion to ensure that Value never grows in size
#[cfg(target_arch = "x86_64")]
static_assertions::assert_eq_size!(Value, [u8; 24]);

impl Value {
    pub fn list(values: impl IntoIterator<Item = Value>) -> Self {
        Value::List(values.into_iter().collect())
    }

    /// Build a map. A repeated key keeps its first position and takes the
    /// last value given for it.
    pub fn map<K: Into<Key>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v))
            .collect::<IndexMap<Key, Value, RandomState>>();
        Value::Map(entries.into_iter().collect())
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Str(_) => Kind::Str,
            Value::List(_) => Kind::List,
            Value::Map(_) => Kind::Map,
            Value::Seq(_) => Kind::Seq,
        }
    }

    pub fn is_traversable(&self) -> bool {
        Traversable::new(self).is_some()
    }

    /// A fresh cursor over the pairs of this value, if it is traversable.
    pub fn pairs(&self) -> Option<PairIter> {
        Traversable::new(self).map(|t| t.iter())
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(OrderedFloat(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::List(values.into())
    }
}

impl From<Stream> for Value {
    fn from(stream: Stream) -> Self {
        Value::Seq(stream)
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::List(iter.into_iter().map(Into::into).collect())
    }
}

/// A value known to be traversable.
///
/// Obtained by checking a [`Value`]; it can always start a traversal.
#[derive(Debug, Clone, PartialEq)]
pub enum Traversable {
    List(Rc<[Value]>),
    Map(Rc<[(Key, Value)]>),
    Seq(Stream),
}

impl Traversable {
    pub fn new(value: &Value) -> Option<Self> {
        match value {
            Value::List(list) => Some(Traversable::List(Rc::clone(list))),
            Value::Map(map) => Some(Traversable::Map(Rc::clone(map))),
            Value::Seq(stream) => Some(Traversable::Seq(stream.clone())),
            _ => None,
        }
    }

    pub fn iter(&self) -> PairIter {
        match self {
            Traversable::List(list) => Box::new(ListIter {
                list: Rc::clone(list),
                index: 0,
            }),
            Traversable::Map(map) => Box::new(MapIter {
                map: Rc::clone(map),
                index: 0,
            }),
            Traversable::Seq(stream) => stream.iter(),
        }
    }

    /// The number of items, if it is known without traversing.
    pub fn known_len(&self) -> Option<usize> {
        match self {
            Traversable::List(list) => Some(list.len()),
            Traversable::Map(map) => Some(map.len()),
            Traversable::Seq(stream) => stream.known_len(),
        }
    }

    /// A cursor over the values only.
    pub fn values(&self) -> Values {
        Values(self.iter())
    }
}

struct ListIter {
    list: Rc<[Value]>,
    index: usize,
}

impl Iterator for ListIter {
    type Item = error::Result<(Key, Value)>;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.list.get(self.index)?.clone();
        let key = Key::from(self.index);
        self.index += 1;
        Some(Ok((key, value)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.list.len() - self.index;
        (remaining, Some(remaining))
    }
}

struct MapIter {
    map: Rc<[(Key, Value)]>,
    index: usize,
}

impl Iterator for MapIter {
    type Item = error::Result<(Key, Value)>;

    fn next(&mut self) -> Option<Self::Item> {
        let pair = self.map.get(self.index)?.clone();
        self.index += 1;
        Some(Ok(pair))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.map.len() - self.index;
        (remaining, Some(remaining))
    }
}

/// An iterator over the values of a traversal, discarding keys.
pub struct Values(PairIter);

impl Iterator for Values {
    type Item = error::Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|pair| pair.map(|(_, value)| value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_pairs_are_positional() {
        let value = Value::from(vec![Value::from("a"), Value::from("b")]);
        let pairs = value
            .pairs()
            .unwrap()
            .collect::<error::Result<Vec<_>>>()
            .unwrap();
        assert_eq!(
            pairs,
            vec![
                (Key::Int(0), Value::from("a")),
                (Key::Int(1), Value::from("b"))
            ]
        );
    }

    #[test]
    fn test_map_pairs_keep_keys() {
        let value = Value::map([("x", Value::from(1)), ("y", Value::from(2))]);
        let keys = value
            .pairs()
            .unwrap()
            .map(|pair| pair.map(|(k, _)| k))
            .collect::<error::Result<Vec<_>>>()
            .unwrap();
        assert_eq!(keys, vec![Key::from("x"), Key::from("y")]);
    }

    #[test]
    fn test_map_repeated_key_last_value_wins() {
        let value = Value::map([
            ("a", Value::from(1)),
            ("b", Value::from(2)),
            ("a", Value::from(3)),
        ]);
        let pairs = value
            .pairs()
            .unwrap()
            .collect::<error::Result<Vec<_>>>()
            .unwrap();
        assert_eq!(
            pairs,
            vec![
                (Key::from("a"), Value::from(3)),
                (Key::from("b"), Value::from(2))
            ]
        );
    }

    #[test]
    fn test_leaves_are_not_traversable() {
        for value in [
            Value::Null,
            Value::from(true),
            Value::from(1),
            Value::from(1.5),
            Value::from("s"),
        ] {
            assert!(!value.is_traversable());
            assert!(value.pairs().is_none());
        }
    }

    #[test]
    fn test_known_len() {
        let value = [1, 2, 3].into_iter().collect::<Value>();
        let traversable = Traversable::new(&value).unwrap();
        assert_eq!(traversable.known_len(), Some(3));
        let mut iter = traversable.iter();
        iter.next();
        assert_eq!(iter.size_hint(), (2, Some(2)));
    }
}
