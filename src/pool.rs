//! [`Pool`] implementation.

use std::{
    array::from_fn,
    iter::Enumerate,
    ops::{Index, IndexMut},
};

use crate::{
    bounding::Float,
    collider::Collider,
    node::Node,
    ColliderId, NodeId,
};

/// [`PoolItem`] data structure that combines both the vacancy flag
/// and the actual item together for better cache locality.
#[derive(Clone)]
pub(crate) enum PoolItem<T> {
    Filled(T),
    Empty,
}

impl<T> From<T> for PoolItem<T> {
    fn from(item: T) -> Self {
        PoolItem::Filled(item)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for PoolItem<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoolItem::Filled(item) => write!(f, "Filled({:?})", item),
            PoolItem::Empty => write!(f, "Empty"),
        }
    }
}

/// [`Pool`] data structure.
///
/// Removed slots are recorded as garbage and reused by the next insertion,
/// so ids of the remaining items never shift.
#[derive(Clone)]
pub struct Pool<T> {
    pub(crate) vec: Vec<PoolItem<T>>,
    pub(crate) garbage: Vec<usize>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Pool {
            vec: Default::default(),
            garbage: Default::default(),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("vec", &self.vec)
            .field("garbage", &self.garbage)
            .finish()
    }
}

/// Indexing a [`pool`](Pool) of [`nodes`](Node) with [`NodeId`]
///
/// ```ignore
/// let node = &tree.nodes[NodeId(42)];
/// // let node = &tree.nodes[ColliderId(42)]; // Error
/// ```
impl<F: Float> Index<NodeId> for Pool<Node<F>> {
    type Output = Node<F>;

    fn index(&self, index: NodeId) -> &Self::Output {
        self.get_unchecked(index)
    }
}

/// Mutable Indexing a [`pool`](Pool) of [`nodes`](Node) with [`NodeId`]
impl<F: Float> IndexMut<NodeId> for Pool<Node<F>> {
    fn index_mut(&mut self, index: NodeId) -> &mut Self::Output {
        self.get_mut_unchecked(index)
    }
}

/// Indexing a [`pool`](Pool) of [`colliders`](Collider) with [`ColliderId`]
///
/// ```ignore
/// let collider = &colliders[ColliderId(3)];
/// // let collider = &colliders[NodeId(3)]; // Error
/// ```
impl<F: Float> Index<ColliderId> for Pool<Collider<F>> {
    type Output = Collider<F>;

    fn index(&self, index: ColliderId) -> &Self::Output {
        self.get_unchecked(index)
    }
}

/// Mutable Indexing a [`pool`](Pool) of [`colliders`](Collider) with [`ColliderId`]
impl<F: Float> IndexMut<ColliderId> for Pool<Collider<F>> {
    fn index_mut(&mut self, index: ColliderId) -> &mut Self::Output {
        self.get_mut_unchecked(index)
    }
}

impl<F: Float> Pool<Node<F>> {
    /// Allocates the 8 octants of `parent`.
    #[inline(always)]
    pub(crate) fn branch(&mut self, parent: NodeId, depth: u32) -> [NodeId; 8] {
        let aabbs = self[parent].aabb.split();
        from_fn(|i| self.insert(Node::from_aabb(aabbs[i], depth, Some(parent))))
    }
}

impl<T> Pool<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Pool {
            vec: Vec::with_capacity(capacity),
            garbage: Default::default(),
        }
    }

    #[inline(always)]
    fn _insert(&mut self, t: T) -> usize {
        if let Some(idx) = self.garbage.pop() {
            self.vec[idx] = PoolItem::Filled(t);
            idx
        } else {
            self.vec.push(PoolItem::Filled(t));
            self.vec.len() - 1
        }
    }

    #[inline(always)]
    pub(crate) fn insert<I: From<usize>>(&mut self, t: T) -> I {
        self._insert(t).into()
    }

    /// Takes an item out of the pool, leaving its slot for reuse.
    pub(crate) fn remove(&mut self, index: impl Into<usize>) -> Option<T> {
        let index: usize = index.into();
        let slot = self.vec.get_mut(index)?;
        match std::mem::replace(slot, PoolItem::Empty) {
            PoolItem::Filled(item) => {
                self.garbage.push(index);
                Some(item)
            }
            PoolItem::Empty => None,
        }
    }

    /// Clears all the items in the pool
    pub fn clear(&mut self) {
        self.vec.clear();
        self.garbage.clear();
    }

    /// Returns the number of actual items.
    ///
    /// Vacant slots are not counted.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.vec.len() - self.garbage_len()
    }

    /// Is the pool is empty.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of vacant slots awaiting reuse.
    #[inline(always)]
    pub fn garbage_len(&self) -> usize {
        self.garbage.len()
    }

    #[inline(always)]
    pub fn get(&self, index: impl Into<usize>) -> Option<&T> {
        self.vec.get(index.into()).and_then(|item| {
            if let PoolItem::Filled(ref item) = item {
                Some(item)
            } else {
                None
            }
        })
    }

    #[inline(always)]
    pub fn get_mut(&mut self, index: impl Into<usize>) -> Option<&mut T> {
        self.vec.get_mut(index.into()).and_then(|item| {
            if let PoolItem::Filled(ref mut item) = item {
                Some(item)
            } else {
                None
            }
        })
    }

    #[inline(always)]
    pub(crate) fn get_unchecked(&self, index: impl Into<usize>) -> &T {
        let index: usize = index.into();
        if let PoolItem::Filled(ref item) = self.vec[index] {
            item
        } else {
            unreachable!("Accessing vacant slot: {index}")
        }
    }

    #[inline(always)]
    pub(crate) fn get_mut_unchecked(&mut self, index: impl Into<usize>) -> &mut T {
        let index: usize = index.into();
        if let PoolItem::Filled(ref mut item) = self.vec[index] {
            item
        } else {
            unreachable!("Accessing vacant slot: {index}")
        }
    }

    /// Returns a [`PoolIterator`], which iterates over an actual items.
    ///
    /// Vacant slots are skipped.
    pub fn iter(&self) -> PoolIterator<'_, T> {
        PoolIterator::new(self)
    }

    /// Returns a [`PoolIteratorMut`], which iterates over an actual items.
    ///
    /// Vacant slots are skipped.
    pub fn iter_mut(&mut self) -> PoolIteratorMut<'_, T> {
        PoolIteratorMut::new(self)
    }

    /// Returns a [`PoolElementIterator`], which iterates over an actual items and their ids.
    ///
    /// Vacant slots are skipped.
    pub fn iter_elements<I: From<usize>>(&self) -> PoolElementIterator<'_, T, I> {
        PoolElementIterator::new(self)
    }
}

/// Iterator for a [`Pool`].
///
/// Yields only an actual items.
#[derive(Clone)]
pub struct PoolIterator<'pool, T> {
    inner: std::slice::Iter<'pool, PoolItem<T>>,
    garbage_len: usize,
}

impl<'pool, T> PoolIterator<'pool, T> {
    fn new(pool: &'pool Pool<T>) -> Self {
        PoolIterator {
            inner: pool.vec.iter(),
            garbage_len: pool.garbage_len(),
        }
    }
}

impl<'pool, T> Iterator for PoolIterator<'pool, T> {
    type Item = &'pool T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                PoolItem::Filled(item) => return Some(item),
                PoolItem::Empty => continue,
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let hint = self.inner.size_hint();
        (hint.0.saturating_sub(self.garbage_len), hint.1)
    }
}

impl<T> DoubleEndedIterator for PoolIterator<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next_back()? {
                PoolItem::Filled(item) => return Some(item),
                PoolItem::Empty => continue,
            }
        }
    }
}

impl<T> std::iter::FusedIterator for PoolIterator<'_, T> {}

/// Mutable iterator for a [`Pool`].
///
/// Yields only an actual items.
pub struct PoolIteratorMut<'pool, T> {
    inner: std::slice::IterMut<'pool, PoolItem<T>>,
    garbage_len: usize,
}

impl<'pool, T> PoolIteratorMut<'pool, T> {
    fn new(pool: &'pool mut Pool<T>) -> Self {
        Self {
            garbage_len: pool.garbage_len(),
            inner: pool.vec.iter_mut(),
        }
    }
}

impl<'pool, T> Iterator for PoolIteratorMut<'pool, T> {
    type Item = &'pool mut T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                PoolItem::Filled(item) => return Some(item),
                PoolItem::Empty => continue,
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let hint = self.inner.size_hint();
        (hint.0.saturating_sub(self.garbage_len), hint.1)
    }
}

impl<T> std::iter::FusedIterator for PoolIteratorMut<'_, T> {}

/// Iterator for a [`Pool`] that includes item ids
///
/// Yields only an actual items.
#[derive(Clone)]
pub struct PoolElementIterator<'pool, T, I> {
    inner: Enumerate<std::slice::Iter<'pool, PoolItem<T>>>,
    garbage_len: usize,
    _id: std::marker::PhantomData<I>,
}

impl<'pool, T, I> PoolElementIterator<'pool, T, I> {
    fn new(pool: &'pool Pool<T>) -> Self {
        PoolElementIterator {
            inner: pool.vec.iter().enumerate(),
            garbage_len: pool.garbage_len(),
            _id: std::marker::PhantomData,
        }
    }
}

impl<'pool, T, I: From<usize>> Iterator for PoolElementIterator<'pool, T, I> {
    type Item = (I, &'pool T);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                (idx, PoolItem::Filled(item)) => return Some((idx.into(), item)),
                (_, PoolItem::Empty) => continue,
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let hint = self.inner.size_hint();
        (hint.0.saturating_sub(self.garbage_len), hint.1)
    }
}

impl<T, I: From<usize>> std::iter::FusedIterator for PoolElementIterator<'_, T, I> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove() {
        let mut pool = Pool::<u32>::with_capacity(16);
        for i in 0..16u32 {
            let id: NodeId = pool.insert(i);
            assert_eq!(id, NodeId(i));
            assert_eq!(pool.len(), (i + 1) as usize);
            assert_eq!(pool.garbage_len(), 0_usize);
        }

        for i in 0..8u32 {
            assert_eq!(pool.remove(NodeId(i)), Some(i));
            assert_eq!(pool.len(), (15 - i) as usize);
            assert_eq!(pool.garbage_len(), (i + 1) as usize);
        }

        for i in 0..8u32 {
            assert_eq!(pool.remove(NodeId(i)), None);
            assert_eq!(pool.len(), 8_usize);
            assert_eq!(pool.garbage_len(), 8_usize);
        }

        assert_eq!(pool.remove(NodeId(100)), None);
        assert_eq!(pool.get(NodeId(3)), None);
        assert_eq!(pool.get(NodeId(12)), Some(&12));
    }

    #[test]
    fn test_reuse_garbage() {
        let mut pool = Pool::<&str>::default();
        let a: ColliderId = pool.insert("a");
        let b: ColliderId = pool.insert("b");
        let c: ColliderId = pool.insert("c");

        assert_eq!(pool.remove(b), Some("b"));
        assert_eq!(pool.garbage_len(), 1);

        let d: ColliderId = pool.insert("d");
        assert_eq!(d, b);
        assert_eq!(pool.garbage_len(), 0);
        assert_eq!(pool.len(), 3);

        assert_eq!(pool.get(a), Some(&"a"));
        assert_eq!(pool.get(c), Some(&"c"));
        assert_eq!(pool.get(d), Some(&"d"));
    }

    #[test]
    fn test_iterators() {
        let mut pool = Pool::<u32>::default();
        for i in 0..6 {
            let _: NodeId = pool.insert(i);
        }
        pool.remove(NodeId(1));
        pool.remove(NodeId(4));

        assert_eq!(pool.iter().copied().collect::<Vec<_>>(), vec![0, 2, 3, 5]);
        assert_eq!(
            pool.iter().rev().copied().collect::<Vec<_>>(),
            vec![5, 3, 2, 0]
        );

        for item in pool.iter_mut() {
            *item *= 10;
        }

        let ids: Vec<(NodeId, u32)> = pool.iter_elements().map(|(id, v)| (id, *v)).collect();
        assert_eq!(
            ids,
            vec![
                (NodeId(0), 0),
                (NodeId(2), 20),
                (NodeId(3), 30),
                (NodeId(5), 50)
            ]
        );

        pool.clear();
        assert!(pool.is_empty());
        assert_eq!(pool.iter().count(), 0);
    }
}
