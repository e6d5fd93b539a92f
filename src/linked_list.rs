//! A doubly linked list that flattens all its nodes onto a Vec for storage,
//! gaining data locality and O(1) random access by handle. Removed nodes are
//! freelisted and their slots reused by later pushes, so a handle stays valid
//! for exactly as long as the node it names is in the list.

use std::iter::FusedIterator;

/// Alias for the index of a node in the linked list's storage vec.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeHandle(usize);

/// A node that lives in a linked list.
#[derive(Clone)]
pub(crate) struct Node<T> {
    /// The value being stored.
    value: T,

    /// The index of the node previous to this one.
    prev: Option<NodeHandle>,

    /// The index of the next node in the list.
    next: Option<NodeHandle>,
}

/// Nodes are addressed by their position in a single contiguous Vec. A
/// vacant slot is `None` and its handle sits on the freelist until the next
/// push claims it. There is no compaction.
#[derive(Clone)]
pub(crate) struct LinkedList<T> {
    /// The node slots, occupied or vacant.
    store: Vec<Option<Node<T>>>,

    /// Slots in the store which aren't in use anymore. These will be reused.
    free: Vec<NodeHandle>,

    /// The first node in the list.
    head: Option<NodeHandle>,

    /// The last node in the list.
    tail: Option<NodeHandle>,
}

impl<T> LinkedList<T> {
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new linked list with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            store: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
        }
    }

    /// The length of this linked list.
    pub(crate) fn len(&self) -> usize {
        self.store.len() - self.free.len()
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.store.reserve(additional.saturating_sub(self.free.len()));
    }

    fn node(&self, node: NodeHandle) -> Option<&Node<T>> {
        self.store.get(node.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, node: NodeHandle) -> Option<&mut Node<T>> {
        self.store.get_mut(node.0).and_then(Option::as_mut)
    }

    /// Gets an element from the list.
    pub(crate) fn get(&self, node: NodeHandle) -> Option<&T> {
        self.node(node).map(|n| &n.value)
    }

    pub(crate) fn get_mut(&mut self, node: NodeHandle) -> Option<&mut T> {
        self.node_mut(node).map(|n| &mut n.value)
    }

    pub(crate) fn first(&self) -> Option<NodeHandle> {
        self.head
    }

    pub(crate) fn last(&self) -> Option<NodeHandle> {
        self.tail
    }

    /// The handle following `node`, or `None` at the tail.
    pub(crate) fn next_of(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.node(node).and_then(|n| n.next)
    }

    /// The handle preceding `node`, or `None` at the head.
    pub(crate) fn prev_of(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.node(node).and_then(|n| n.prev)
    }

    /// Pushes t onto the back of the list and returns a handle to the node.
    pub(crate) fn push_back(&mut self, t: T) -> NodeHandle {
        let n = Node {
            value: t,
            prev: self.tail,
            next: None,
        };

        // use the first available location in the storage vec, or infer what
        // the next location will be on push.
        let idx = match self.free.pop() {
            Some(idx) => {
                self.store[idx.0] = Some(n);
                idx
            }
            None => {
                self.store.push(Some(n));
                NodeHandle(self.store.len() - 1)
            }
        };

        match self.tail {
            Some(tail) => {
                if let Some(tail_node) = self.node_mut(tail) {
                    tail_node.next = Some(idx);
                }
            }
            None => self.head = Some(idx),
        }

        self.tail = Some(idx);

        idx
    }

    /// Remove an arbitrary node from the list, returning its value. Handles
    /// which don't name a live node are ignored.
    pub(crate) fn remove_node(&mut self, node: NodeHandle) -> Option<T> {
        let removed = self.store.get_mut(node.0)?.take()?;

        // link prev to next and next to prev so node doesn't exist in the
        // chain anymore; its slot gets reused at some later push by placing
        // its handle on the freelist
        match removed.prev {
            Some(prev) => {
                if let Some(prev_node) = self.node_mut(prev) {
                    prev_node.next = removed.next;
                }
            }
            None => self.head = removed.next,
        }

        match removed.next {
            Some(next) => {
                if let Some(next_node) = self.node_mut(next) {
                    next_node.prev = removed.prev;
                }
            }
            None => self.tail = removed.prev,
        }

        self.free.push(node);

        Some(removed.value)
    }

    pub(crate) fn pop_front(&mut self) -> Option<T> {
        let head = self.head?;
        self.remove_node(head)
    }

    pub(crate) fn pop_back(&mut self) -> Option<T> {
        let tail = self.tail?;
        self.remove_node(tail)
    }

    /// Clears this linked list. Does not free the underlying buffers.
    pub(crate) fn clear(&mut self) {
        self.store.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
    }

    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            front: self.head,
            back: self.tail,
            remaining: self.len(),
        }
    }

    /// Borrows every live node mutably, in list order. The slots are lent out
    /// up front so the walk can follow links without re-borrowing the store.
    pub(crate) fn iter_mut(&mut self) -> IterMut<'_, T> {
        let front = self.head;
        let back = self.tail;
        let remaining = self.len();

        IterMut {
            slots: self.store.iter_mut().map(Option::as_mut).collect(),
            front,
            back,
            remaining,
        }
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Walks the list from either end, stopping once both ends meet.
pub(crate) struct Iter<'a, T> {
    list: &'a LinkedList<T>,
    front: Option<NodeHandle>,
    back: Option<NodeHandle>,
    remaining: usize,
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Iter {
            list: self.list,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.list.node(self.front?)?;
        self.front = node.next;
        self.remaining -= 1;

        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.list.node(self.back?)?;
        self.back = node.prev;
        self.remaining -= 1;

        Some(&node.value)
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}

pub(crate) struct IterMut<'a, T> {
    slots: Vec<Option<&'a mut Node<T>>>,
    front: Option<NodeHandle>,
    back: Option<NodeHandle>,
    remaining: usize,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.slots.get_mut(self.front?.0)?.take()?;
        self.front = node.next;
        self.remaining -= 1;

        Some(&mut node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.slots.get_mut(self.back?.0)?.take()?;
        self.back = node.prev;
        self.remaining -= 1;

        Some(&mut node.value)
    }
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}

impl<'a, T> FusedIterator for IterMut<'a, T> {}

/// Drains the list front to back.
pub(crate) struct IntoIter<T>(LinkedList<T>);

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len(), Some(self.0.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for LinkedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self)
    }
}
