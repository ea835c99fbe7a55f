use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use ahash::RandomState;
use indexmap::IndexMap;

/// How a missing value is produced.
pub enum DefaultValue<V> {
    /// Clone this value.
    Fixed(V),
    /// Call this to build a fresh value.
    Factory(Box<dyn Fn() -> V>),
}

impl<V> DefaultValue<V> {
    pub fn factory(f: impl Fn() -> V + 'static) -> Self {
        DefaultValue::Factory(Box::new(f))
    }
}

impl<V: Clone> DefaultValue<V> {
    pub fn produce(&self) -> V {
        match self {
            DefaultValue::Fixed(value) => value.clone(),
            DefaultValue::Factory(f) => f(),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for DefaultValue<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            DefaultValue::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// A map that fills in a default for keys it does not hold.
///
/// Entries iterate in insertion order.
pub struct DefaultMap<K, V> {
    entries: IndexMap<K, V, RandomState>,
    default: DefaultValue<V>,
}

impl<K, V> DefaultMap<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    pub fn new(default: DefaultValue<V>) -> Self {
        Self {
            entries: IndexMap::with_hasher(RandomState::new()),
            default,
        }
    }

    pub fn with_fixed(value: V) -> Self {
        Self::new(DefaultValue::Fixed(value))
    }

    pub fn with_factory(f: impl Fn() -> V + 'static) -> Self {
        Self::new(DefaultValue::factory(f))
    }

    /// Build a map holding `pairs`; later pairs replace earlier ones with
    /// the same key but keep its position.
    pub fn from_pairs(default: DefaultValue<V>, pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut map = Self::new(default);
        for (key, value) in pairs {
            map.insert(key, value);
        }
        map
    }

    /// The stored value, without falling back to the default.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    /// The stored value, or a freshly produced default. Nothing is inserted.
    pub fn value<Q>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.entries.get(key) {
            Some(value) => value.clone(),
            None => self.default.produce(),
        }
    }

    /// The stored value, inserting a produced default first if the key is
    /// missing.
    pub fn entry(&mut self, key: K) -> &mut V {
        let default = &self.default;
        self.entries.entry(key).or_insert_with(|| default.produce())
    }

    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    /// Remove an entry, keeping the order of the remaining ones.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.shift_remove(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, K, V> {
        self.entries.iter()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, K, V> {
        self.entries.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, K, V> {
        self.entries.values()
    }

    pub fn default_value(&self) -> &DefaultValue<V> {
        &self.default
    }

    pub fn into_inner(self) -> IndexMap<K, V, RandomState> {
        self.entries
    }
}

impl<'a, K, V> IntoIterator for &'a DefaultMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = indexmap::map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for DefaultMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultMap")
            .field("entries", &self.entries)
            .field("default", &self.default)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use rstest::rstest;

    use super::*;

    #[test]
    fn test_fixed_default() {
        let map = DefaultMap::<&str, i32>::with_fixed(7);
        assert_eq!(map.value("missing"), 7);
        assert!(map.is_empty());
    }

    #[test]
    fn test_factory_called_per_miss() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let map = DefaultMap::<&str, Vec<i32>>::with_factory(move || {
            counter.set(counter.get() + 1);
            Vec::new()
        });
        assert_eq!(map.value("a"), Vec::<i32>::new());
        assert_eq!(map.value("b"), Vec::<i32>::new());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_entry_inserts_default() {
        let mut map = DefaultMap::with_factory(Vec::new);
        map.entry("a").push(1);
        map.entry("a").push(2);
        map.entry("b").push(3);
        assert_eq!(map.get("a"), Some(&vec![1, 2]));
        assert_eq!(map.get("b"), Some(&vec![3]));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_counting_with_fixed_default() {
        let mut counts = DefaultMap::with_fixed(0);
        for word in "a b a c b a".split(' ') {
            *counts.entry(word) += 1;
        }
        assert_eq!(
            counts.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(),
            vec![("a", 3), ("b", 2), ("c", 1)]
        );
    }

    #[test]
    fn test_stored_value_wins() {
        let map = DefaultMap::from_pairs(DefaultValue::Fixed(0), [("a", 5)]);
        assert_eq!(map.value("a"), 5);
        assert_eq!(map.get("z"), None);
    }

    #[rstest]
    #[case("b", vec!["a", "c"])]
    #[case("a", vec!["b", "c"])]
    #[case("x", vec!["a", "b", "c"])]
    fn test_remove_keeps_order(#[case] key: &str, #[case] expected: Vec<&str>) {
        let mut map =
            DefaultMap::from_pairs(DefaultValue::Fixed(0), [("a", 1), ("b", 2), ("c", 3)]);
        map.remove(key);
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_debug_hides_factory() {
        let map = DefaultMap::<i32, i32>::with_factory(|| 1);
        assert_eq!(
            format!("{:?}", map),
            "DefaultMap { entries: {}, default: Factory(..) }"
        );
    }
}
