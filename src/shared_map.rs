use parking_lot::RwLock;
use serde::Serialize;
use std::{
    collections::hash_map::RandomState,
    hash::{BuildHasher, Hash},
    sync::Arc,
};

use crate::{error::Result, ordered_map::OrderedMap, ser};

/// Wrapper for an OrderedMap which is shareable across thread boundaries.
///
/// The map itself has no synchronisation of its own; this puts it behind a
/// reader-writer lock. Reads hand back clones so the lock is never held
/// longer than the call.
pub struct SharedMap<K, V, S = RandomState>(Arc<RwLock<OrderedMap<K, V, S>>>);

impl<K, V, S> SharedMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    /// Wraps a map into a shared map accessor, making it safe to move across
    /// thread boundaries.
    pub fn with_map(map: OrderedMap<K, V, S>) -> Self {
        Self(Arc::new(RwLock::new(map)))
    }

    /// Inserts an item into the map.
    pub fn insert(&self, k: K, v: V) -> Option<V> {
        self.0.write().insert(k, v)
    }

    /// Get an item from the map. This clones it to minimize the lock time of
    /// the map.
    pub fn get(&self, k: &K) -> Option<V> {
        self.0.read().get(k).cloned()
    }

    /// Remove an item from the map, returning the removed item if it existed.
    pub fn remove(&self, k: &K) -> Option<V> {
        self.0.write().remove(k)
    }

    /// Every key, in insertion order, as of the moment of the call.
    pub fn keys(&self) -> Vec<K> {
        self.0.read().keys().cloned().collect()
    }

    /// Clears the map.
    pub fn clear(&self) {
        self.0.write().clear()
    }

    /// The number of elements in the map at present.
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    pub fn set_escape_html(&self, enabled: bool) {
        self.0.write().set_escape_html(enabled)
    }

    /// Clones the whole map out from under the lock.
    pub fn snapshot(&self) -> OrderedMap<K, V, S>
    where
        S: Clone,
    {
        self.0.read().clone()
    }

    /// Encodes the map as JSON while holding the read lock.
    pub fn encode(&self) -> Result<Vec<u8>>
    where
        K: Serialize,
        V: Serialize,
    {
        let map = self.0.read();
        ser::encode(&*map)
    }
}

impl<K, V, S> Clone for SharedMap<K, V, S> {
    fn clone(&self) -> Self {
        SharedMap(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use crate::{OrderedMap, SharedMap};

    #[test]
    fn test_insert_from_threads_then_read() {
        let map: SharedMap<String, usize> = SharedMap::with_map(OrderedMap::new());
        map.insert("main".to_owned(), 0);

        let thread_map = map.clone();
        let r = thread::spawn(move || {
            thread_map.insert("worker".to_owned(), 1);
            thread_map.get(&"main".to_owned())
        })
        .join();

        assert_eq!(Some(0), r.unwrap());
        assert_eq!(vec!["main", "worker"], map.keys());
        assert_eq!(2, map.len());
    }

    #[test]
    fn test_encode_under_lock() {
        let map = SharedMap::with_map(OrderedMap::new());
        map.insert("b".to_owned(), "<".to_owned());
        map.insert("a".to_owned(), "&".to_owned());
        map.set_escape_html(false);

        assert_eq!(br#"{"b":"<","a":"&"}"#.to_vec(), map.encode().unwrap());
        assert_eq!(Some("<".to_owned()), map.remove(&"b".to_owned()));
        assert_eq!(1, map.snapshot().len());
    }
}
