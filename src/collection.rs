use crate::ordered_map::OrderedMap;
use std::hash::{BuildHasher, Hash};

/// Describes what an ordered collection is: the handful of operations a
/// generic caller needs to fill one, query it and read its keys back in
/// order, without knowing anything else about the type.
pub trait OrderedCollection<K, V>
where
    K: Eq + Hash,
{
    /// The number of keys in the collection right now.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds a new key at the end, or replaces the value of an existing key
    /// without moving it.
    fn set(&mut self, k: K, v: V);

    fn get(&self, k: &K) -> Option<&V>;

    /// Drops a key if it's there. Absent keys are not an error.
    fn delete(&mut self, k: &K);

    /// A snapshot of every key, in order.
    fn keys(&self) -> Vec<K>;
}

impl<K, V, S> OrderedCollection<K, V> for OrderedMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    fn len(&self) -> usize {
        OrderedMap::len(self)
    }

    fn set(&mut self, k: K, v: V) {
        self.insert(k, v);
    }

    fn get(&self, k: &K) -> Option<&V> {
        OrderedMap::get(self, k)
    }

    fn delete(&mut self, k: &K) {
        self.remove(k);
    }

    fn keys(&self) -> Vec<K> {
        OrderedMap::keys(self).cloned().collect()
    }
}
