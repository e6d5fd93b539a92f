//! Iterators over an [`OrderedMap`](crate::OrderedMap), all in insertion
//! order and all double ended.

use crate::linked_list;
use std::iter::FusedIterator;

pub struct Iter<'a, K, V> {
    inner: linked_list::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(inner: linked_list::Iter<'a, (K, V)>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (k, v))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

pub struct IterMut<'a, K, V> {
    inner: linked_list::IterMut<'a, (K, V)>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(inner: linked_list::IterMut<'a, (K, V)>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (&*k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (&*k, v))
    }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {}

impl<'a, K, V> FusedIterator for IterMut<'a, K, V> {}

/// Owning iterator, yielding entries from oldest to newest.
pub struct IntoIter<K, V> {
    inner: linked_list::IntoIter<(K, V)>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(inner: linked_list::IntoIter<(K, V)>) -> Self {
        Self { inner }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

/// Defines a projection over one of the entry iterators above.
macro_rules! projection {
    ($name:ident, $inner:ident, $item:ty, |$k:pat_param, $v:pat_param| $out:expr) => {
        pub struct $name<'a, K, V> {
            inner: $inner<'a, K, V>,
        }

        impl<'a, K, V> $name<'a, K, V> {
            pub(crate) fn new(inner: $inner<'a, K, V>) -> Self {
                Self { inner }
            }
        }

        impl<'a, K, V> Iterator for $name<'a, K, V> {
            type Item = $item;

            fn next(&mut self) -> Option<Self::Item> {
                self.inner.next().map(|($k, $v)| $out)
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                self.inner.size_hint()
            }
        }

        impl<'a, K, V> DoubleEndedIterator for $name<'a, K, V> {
            fn next_back(&mut self) -> Option<Self::Item> {
                self.inner.next_back().map(|($k, $v)| $out)
            }
        }

        impl<'a, K, V> ExactSizeIterator for $name<'a, K, V> {}

        impl<'a, K, V> FusedIterator for $name<'a, K, V> {}
    };
}

projection!(Keys, Iter, &'a K, |k, _v| k);
projection!(Values, Iter, &'a V, |_k, v| v);
projection!(ValuesMut, IterMut, &'a mut V, |_k, v| v);
