use crate::linked_list::{LinkedList, NodeHandle};
use std::fmt;

/// A read-only position on one entry of an [`OrderedMap`].
///
/// Obtained from [`OrderedMap::first`] or [`OrderedMap::last`] and moved with
/// [`next`](Cursor::next) and [`prev`](Cursor::prev), which return `None` past
/// either end. The cursor borrows the map, so the map can't be mutated while
/// one is alive.
///
/// ```
/// use jsonmap::OrderedMap;
///
/// let map = OrderedMap::from([("a", 1), ("b", 2)]);
///
/// let mut seen = Vec::new();
/// let mut cursor = map.first();
/// while let Some(entry) = cursor {
///     seen.push((*entry.key(), *entry.value()));
///     cursor = entry.next();
/// }
/// assert_eq!(vec![("a", 1), ("b", 2)], seen);
/// ```
///
/// Inserting while a cursor is still in use does not compile:
///
/// ```compile_fail
/// use jsonmap::OrderedMap;
///
/// let mut map = OrderedMap::from([("a", 1)]);
///
/// let cursor = map.first();
/// map.insert("b", 2);
/// assert_eq!(Some(&"a"), cursor.map(|c| c.key()));
/// ```
///
/// [`OrderedMap`]: crate::OrderedMap
/// [`OrderedMap::first`]: crate::OrderedMap::first
/// [`OrderedMap::last`]: crate::OrderedMap::last
pub struct Cursor<'a, K, V> {
    list: &'a LinkedList<(K, V)>,
    handle: NodeHandle,
    entry: &'a (K, V),
}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) fn new(list: &'a LinkedList<(K, V)>, handle: NodeHandle) -> Option<Self> {
        list.get(handle).map(|entry| Self {
            list,
            handle,
            entry,
        })
    }

    #[cfg(test)]
    pub(crate) fn handle(&self) -> NodeHandle {
        self.handle
    }

    pub fn key(&self) -> &'a K {
        &self.entry.0
    }

    pub fn value(&self) -> &'a V {
        &self.entry.1
    }

    pub fn key_value(&self) -> (&'a K, &'a V) {
        let (k, v) = self.entry;
        (k, v)
    }

    /// The entry inserted right after this one, or `None` at the newest.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> Option<Self> {
        self.list
            .next_of(self.handle)
            .and_then(|handle| Self::new(self.list, handle))
    }

    /// The entry inserted right before this one, or `None` at the oldest.
    pub fn prev(&self) -> Option<Self> {
        self.list
            .prev_of(self.handle)
            .and_then(|handle| Self::new(self.list, handle))
    }
}

impl<'a, K, V> Clone for Cursor<'a, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K, V> Copy for Cursor<'a, K, V> {}

impl<'a, K, V> fmt::Debug for Cursor<'a, K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("key", self.key())
            .field("value", self.value())
            .finish()
    }
}
