//! An insertion-ordered hash map.
//!
//! [`OrderedMap`] keeps a [`HashMap`] from each key to a handle into an
//! arena-backed linked list of `(key, value)` pairs. Lookups go through the
//! index, iteration walks the list. A new key is appended to the back of the
//! list; overwriting an existing key replaces its value in place and leaves
//! its position alone. Removal unlinks the node in O(1) and recycles its slot.

mod cursor;
mod iter;

pub use cursor::Cursor;
pub use iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};

use crate::linked_list::{LinkedList, NodeHandle};
use std::{
    borrow::Borrow,
    collections::{hash_map::RandomState, HashMap},
    fmt,
    hash::{BuildHasher, Hash},
    mem,
    ops::Index,
};

/// A hash map whose iteration order is the order in which keys were first
/// inserted.
///
/// Every map also carries an `escape_html` flag (on by default) which the
/// JSON encoder in this crate consults when it writes the map out. The flag
/// plays no part in lookups, equality or decoding.
///
/// ```
/// use jsonmap::OrderedMap;
///
/// let mut map = OrderedMap::new();
/// map.insert("b", 1);
/// map.insert("a", 2);
/// map.insert("b", 3);
///
/// assert_eq!(vec![&"b", &"a"], map.keys().collect::<Vec<_>>());
/// assert_eq!(Some(&3), map.get("b"));
/// ```
#[derive(Clone)]
pub struct OrderedMap<K, V, S = RandomState> {
    index: HashMap<K, NodeHandle, S>,
    entries: LinkedList<(K, V)>,
    escape_html: bool,
}

impl<K, V> OrderedMap<K, V, RandomState> {
    /// Makes a new, empty map with HTML escaping enabled.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Makes a new, empty map with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<K, V, S> OrderedMap<K, V, S> {
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            index: HashMap::with_capacity_and_hasher(capacity, hash_builder),
            entries: LinkedList::with_capacity(capacity),
            escape_html: true,
        }
    }

    /// The number of live keys in the map.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hasher(&self) -> &S {
        self.index.hasher()
    }

    /// Whether the JSON encoder escapes `<`, `>` and `&` when writing this
    /// map.
    pub fn escape_html(&self) -> bool {
        self.escape_html
    }

    /// Toggles HTML escaping for subsequent encodes of this map. Output that
    /// was already produced is unaffected, as is decoding.
    pub fn set_escape_html(&mut self, enabled: bool) {
        self.escape_html = enabled;
    }

    /// A cursor on the oldest entry, or `None` if the map is empty.
    pub fn first(&self) -> Option<Cursor<'_, K, V>> {
        self.entries
            .first()
            .and_then(|handle| Cursor::new(&self.entries, handle))
    }

    /// A cursor on the newest entry, or `None` if the map is empty.
    pub fn last(&self) -> Option<Cursor<'_, K, V>> {
        self.entries
            .last()
            .and_then(|handle| Cursor::new(&self.entries, handle))
    }

    pub fn front(&self) -> Option<(&K, &V)> {
        self.iter().next()
    }

    pub fn back(&self) -> Option<(&K, &V)> {
        self.iter().next_back()
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.entries.iter())
    }

    /// Iterates over the entries in insertion order, with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(self.entries.iter_mut())
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut::new(self.iter_mut())
    }
}

impl<K, V, S> OrderedMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn reserve(&mut self, additional: usize) {
        self.index.reserve(additional);
        self.entries.reserve(additional);
    }

    /// Inserts a key-value pair, returning the previous value at that key.
    ///
    /// A new key is appended after every existing key. An existing key keeps
    /// its position and only has its value replaced; the stored key is not
    /// updated.
    pub fn insert(&mut self, k: K, v: V) -> Option<V>
    where
        K: Clone,
    {
        #[cfg(test)]
        let original_len = self.len();

        if let Some(&handle) = self.index.get(&k) {
            if let Some((_, value)) = self.entries.get_mut(handle) {
                return Some(mem::replace(value, v));
            }
        }

        let handle = self.entries.push_back((k.clone(), v));
        self.index.insert(k, handle);

        #[cfg(test)]
        {
            assert_eq!(original_len + 1, self.len());
            self.continuity_test();
        }

        None
    }

    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(k)
    }

    pub fn get<Q>(&self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_key_value(k).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, k: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = self.index.get(k)?;
        self.entries.get(*handle).map(|(k, v)| (k, v))
    }

    pub fn get_mut<Q>(&mut self, k: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = self.index.get(k)?;
        self.entries.get_mut(*handle).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning its value if it was present.
    /// Removing an absent key is a no-op.
    pub fn remove<Q>(&mut self, k: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(k).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, k: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        #[cfg(test)]
        let original_len = self.len();

        // the index and the list are updated together so neither is left
        // holding a key the other has dropped
        let handle = self.index.remove(k)?;
        let removed = self.entries.remove_node(handle);

        #[cfg(test)]
        {
            assert_eq!(original_len - 1, self.len());
            self.continuity_test();
        }

        removed
    }

    /// Removes every entry. Keeps the allocated storage and the escape flag.
    pub fn clear(&mut self) {
        self.index.clear();
        self.entries.clear();

        #[cfg(test)]
        {
            assert_eq!(0, self.len());
            self.continuity_test();
        }
    }

    /// Removes and returns the oldest entry.
    pub fn pop_front(&mut self) -> Option<(K, V)> {
        let (k, v) = self.entries.pop_front()?;
        self.index.remove(&k);

        #[cfg(test)]
        self.continuity_test();

        Some((k, v))
    }

    /// Removes and returns the newest entry.
    pub fn pop_back(&mut self) -> Option<(K, V)> {
        let (k, v) = self.entries.pop_back()?;
        self.index.remove(&k);

        #[cfg(test)]
        self.continuity_test();

        Some((k, v))
    }

    #[cfg(test)]
    fn continuity_test(&self) {
        assert_eq!(self.index.len(), self.entries.len());

        let mut count = 0;

        // walk the list and make sure every key it holds is indexed at the
        // node we found it in
        let mut cursor = self.first();
        while let Some(c) = cursor {
            count += 1;
            assert!(count <= self.len());
            assert_eq!(Some(&c.handle()), self.index.get(c.key()));
            cursor = c.next();
        }

        assert_eq!(self.len(), count);
        count = 0;

        // and the same in reverse
        let mut cursor = self.last();
        while let Some(c) = cursor {
            count += 1;
            assert!(count <= self.len());
            cursor = c.prev();
        }

        assert_eq!(self.len(), count);
    }
}

impl<K, V, S> Default for OrderedMap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> fmt::Debug for OrderedMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Two maps are equal when they hold equal entries in the same order. The
/// escape flag is not compared.
impl<K, V, S> PartialEq for OrderedMap<K, V, S>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K, V, S> Eq for OrderedMap<K, V, S>
where
    K: Eq,
    V: Eq,
{
}

impl<K, V, S> FromIterator<(K, V)> for OrderedMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, S> Extend<(K, V)> for OrderedMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for OrderedMap<K, V, RandomState>
where
    K: Eq + Hash + Clone,
{
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

/// Panics if the key is not present, like [`HashMap`] does.
impl<K, Q, V, S> Index<&Q> for OrderedMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: Eq + Hash + ?Sized,
    S: BuildHasher,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(v) => v,
            None => panic!("key not present in OrderedMap"),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a OrderedMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut OrderedMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, S> IntoIterator for OrderedMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.entries.into_iter())
    }
}

#[cfg(test)]
mod tests {
    use super::OrderedMap;

    fn keys<V>(map: &OrderedMap<&'static str, V>) -> Vec<&'static str> {
        map.keys().copied().collect()
    }

    #[test]
    fn test_keys_follow_first_insertion() {
        let mut map = OrderedMap::new();
        for (i, k) in ["a", "c", "d", "b", "e"].iter().enumerate() {
            assert_eq!(None, map.insert(*k, i));
        }

        // overwrite everything a few times over, the order must not budge
        for round in 0..3 {
            for k in ["e", "b", "a", "d", "c"] {
                assert!(map.insert(k, round * 10).is_some());
            }
        }

        assert_eq!(vec!["a", "c", "d", "b", "e"], keys(&map));
        assert_eq!(5, map.len());
        assert_eq!(Some(&20), map.get("b"));
    }

    #[test]
    fn test_update_keeps_position() {
        let mut map = OrderedMap::new();
        map.insert("x", 1);
        map.insert("k", 1);
        map.insert("y", 1);

        assert_eq!(Some(1), map.insert("k", 2));
        assert_eq!(vec!["x", "k", "y"], keys(&map));
        assert_eq!(Some(&2), map.get("k"));
    }

    #[test]
    fn test_delete_removes_exactly_one_key() {
        let mut map = OrderedMap::new();
        map.insert("a", 1);
        map.insert("b", 2);

        assert_eq!(Some(1), map.remove("a"));
        assert_eq!(vec!["b"], keys(&map));
        assert_eq!(1, map.len());
        assert_eq!(None, map.get("a"));
    }

    #[test]
    fn test_absent_key_queries_leave_map_alone() {
        let mut map = OrderedMap::new();
        map.insert("a", 1);
        map.insert("b", 2);

        assert_eq!(None, map.get("z"));
        assert_eq!(None, map.remove("z"));
        assert_eq!(None, map.remove("z"));
        assert!(!map.contains_key("z"));

        assert_eq!(2, map.len());
        assert_eq!(vec!["a", "b"], keys(&map));
    }

    #[test]
    fn test_reinserting_deleted_key_goes_to_back() {
        let mut map = OrderedMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        map.insert("c", 3);

        map.remove("a");
        map.insert("a", 4);

        assert_eq!(vec!["b", "c", "a"], keys(&map));
    }

    /// Removes the middle, then the head node, to ensure the structure
    /// remains consistent throughout.
    #[test]
    fn test_head_removal() {
        let mut map = OrderedMap::with_capacity(5);
        map.insert(0u64, 0u64);
        map.insert(1, 1);
        map.insert(2, 2);

        assert!(matches!(map.remove(&1u64), Some(1)));
        assert!(matches!(map.remove(&0u64), Some(0)));
        assert!(matches!(map.remove(&2u64), Some(2)));
        assert!(map.is_empty());
        assert!(map.first().is_none());
    }

    /// Removes the middle, then the tail node.
    #[test]
    fn test_tail_removal() {
        let mut map = OrderedMap::with_capacity(5);
        map.insert(0u64, 0u64);
        map.insert(1, 1);
        map.insert(2, 2);

        assert!(matches!(map.remove(&1u64), Some(1)));
        assert!(matches!(map.remove(&2u64), Some(2)));
        assert!(matches!(map.remove(&0u64), Some(0)));
        assert!(map.is_empty());
        assert!(map.last().is_none());
    }

    #[test]
    fn test_pop_from_both_ends() {
        let mut map: OrderedMap<_, _> =
            [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();

        assert_eq!(Some(("a", 1)), map.pop_front());
        assert_eq!(Some(("c", 3)), map.pop_back());
        assert_eq!(vec!["b"], keys(&map));
        assert!(!map.contains_key("a"));
        assert!(!map.contains_key("c"));
    }

    #[test]
    fn test_clear_keeps_escape_flag() {
        let mut map = OrderedMap::new();
        map.set_escape_html(false);
        map.insert("a", 1);
        map.clear();

        assert!(map.is_empty());
        assert!(!map.escape_html());

        map.insert("b", 2);
        assert_eq!(vec!["b"], keys(&map));
    }

    #[test]
    fn test_new_map_escapes_html() {
        let map: OrderedMap<String, ()> = OrderedMap::new();
        assert!(map.escape_html());

        let map: OrderedMap<String, ()> = OrderedMap::default();
        assert!(map.escape_html());
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let ab = OrderedMap::from([("a", 1), ("b", 2)]);
        let ba = OrderedMap::from([("b", 2), ("a", 1)]);
        let mut ab_unescaped = ab.clone();
        ab_unescaped.set_escape_html(false);

        assert_ne!(ab, ba);
        assert_eq!(ab, ab_unescaped);
    }

    #[test]
    fn test_iteration_views() {
        let mut map = OrderedMap::from([("a", 1), ("b", 2), ("c", 3)]);

        for v in map.values_mut() {
            *v += 1;
        }
        for (_, v) in &mut map {
            *v *= 2;
        }

        assert_eq!(vec![4, 6, 8], map.values().copied().collect::<Vec<_>>());
        assert_eq!(
            vec![("c", 8), ("b", 6), ("a", 4)],
            map.iter().rev().map(|(k, v)| (*k, *v)).collect::<Vec<_>>()
        );
        assert_eq!(Some((&"a", &4)), map.front());
        assert_eq!(Some((&"c", &8)), map.back());
        assert_eq!(3, map.iter().len());
        assert_eq!(
            vec![("a", 4), ("b", 6), ("c", 8)],
            map.into_iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_index_and_debug() {
        let map = OrderedMap::from([("z", 1), ("a", 2)]);

        assert_eq!(2, map["a"]);
        assert_eq!(r#"{"z": 1, "a": 2}"#, format!("{:?}", map));
    }

    #[test]
    #[should_panic(expected = "key not present")]
    fn test_index_panics_on_missing_key() {
        let map = OrderedMap::from([("a", 1)]);
        let _ = map["b"];
    }

    #[test]
    fn test_churn_reuses_slots() {
        let mut map = OrderedMap::new();
        for i in 0..100u32 {
            map.insert(i, i);
            if i % 3 == 0 {
                map.remove(&(i / 2));
            }
        }

        // every key still present must come out in ascending order since
        // they were inserted that way
        let ks: Vec<u32> = map.keys().copied().collect();
        let mut sorted = ks.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, ks);
        assert_eq!(map.len(), ks.len());
        assert!(map.entries.len() <= 100);
    }
}
