use core::borrow::Borrow;
use core::ops::{Index, IndexMut};

use super::{Keys, OrderedMap, Range};
use crate::raw::Traversal;
use crate::{Error, Rank, Result};

impl<K, V> OrderedMap<K, V> {
    /// Returns the smallest key in the map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCollection`] if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use osbst::{Error, OrderedMap};
    ///
    /// let mut map = OrderedMap::new();
    /// assert_eq!(map.min(), Err(Error::EmptyCollection));
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// assert_eq!(map.min(), Ok(&1));
    /// ```
    pub fn min(&self) -> Result<&K> {
        let root = self.raw.root().ok_or(Error::EmptyCollection)?;
        Ok(&self.raw.node(self.raw.min_node(root)).key)
    }

    /// Returns the largest key in the map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCollection`] if the map is empty.
    pub fn max(&self) -> Result<&K> {
        let root = self.raw.root().ok_or(Error::EmptyCollection)?;
        Ok(&self.raw.node(self.raw.max_node(root)).key)
    }

    /// Removes the entry with the smallest key and returns it.
    ///
    /// The minimum has no left child, so it is replaced by its right subtree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCollection`] if the map is empty; the map is not
    /// modified.
    ///
    /// # Examples
    ///
    /// ```
    /// use osbst::{Error, OrderedMap};
    ///
    /// let mut map = OrderedMap::from([(2, "b"), (1, "a"), (3, "c")]);
    /// assert_eq!(map.delete_min(), Ok((1, "a")));
    /// assert_eq!(map.delete_max(), Ok((3, "c")));
    /// assert_eq!(map.delete_min(), Ok((2, "b")));
    /// assert_eq!(map.delete_min(), Err(Error::EmptyCollection));
    /// ```
    pub fn delete_min(&mut self) -> Result<(K, V)> {
        self.raw.pop_first().ok_or(Error::EmptyCollection)
    }

    /// Removes the entry with the largest key and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCollection`] if the map is empty; the map is not
    /// modified.
    pub fn delete_max(&mut self) -> Result<(K, V)> {
        self.raw.pop_last().ok_or(Error::EmptyCollection)
    }

    /// Returns the key at zero-based position `rank` in sorted order.
    ///
    /// At each node the rank is compared with the size of the left subtree:
    /// equal means this node, smaller means descend left, larger means descend
    /// right with the left subtree and the node itself subtracted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `rank >= self.size()`.
    ///
    /// # Complexity
    ///
    /// O(h)
    ///
    /// # Examples
    ///
    /// ```
    /// use osbst::{Error, OrderedMap};
    ///
    /// let map = OrderedMap::from([("c", 3), ("a", 1), ("b", 2)]);
    /// assert_eq!(map.select(1), Ok(&"b"));
    /// assert_eq!(map.select(3), Err(Error::InvalidArgument { rank: 3, size: 3 }));
    /// ```
    pub fn select(&self, rank: usize) -> Result<&K> {
        self.raw
            .select(rank)
            .map(|handle| &self.raw.node(handle).key)
            .ok_or(Error::InvalidArgument {
                rank,
                size: self.size(),
            })
    }

    /// Returns the entry at zero-based position `rank` in sorted order, or
    /// `None` if `rank` is out of bounds.
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<(&K, &V)> {
        let node = self.raw.node(self.raw.select(rank)?);
        Some((&node.key, &node.value))
    }

    /// Returns the key and a mutable reference to the value at position `rank`.
    ///
    /// The key stays shared because changing it could break the ordering.
    #[must_use]
    pub fn get_by_rank_mut(&mut self, rank: usize) -> Option<(&K, &mut V)> {
        let handle = self.raw.select(rank)?;
        let node = self.raw.node_mut(handle);
        Some((&node.key, &mut node.value))
    }
}

impl<K: Ord, V> OrderedMap<K, V> {
    /// Returns the number of keys strictly less than `key`.
    ///
    /// `key` does not need to be present.
    ///
    /// # Complexity
    ///
    /// O(h)
    ///
    /// # Examples
    ///
    /// ```
    /// use osbst::OrderedMap;
    ///
    /// let map = OrderedMap::from([(10, ()), (20, ()), (30, ())]);
    /// assert_eq!(map.rank(&20), 1);
    /// assert_eq!(map.rank(&25), 2);
    /// assert_eq!(map.rank(&5), 0);
    /// ```
    pub fn rank<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.rank(key)
    }

    /// Returns the largest key less than or equal to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use osbst::OrderedMap;
    ///
    /// let map = OrderedMap::from([(10, ()), (20, ()), (30, ())]);
    /// assert_eq!(map.floor(&25), Some(&20));
    /// assert_eq!(map.floor(&30), Some(&30));
    /// assert_eq!(map.floor(&5), None);
    /// ```
    pub fn floor<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.floor(key).map(|handle| &self.raw.node(handle).key)
    }

    /// Returns the smallest key greater than or equal to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use osbst::OrderedMap;
    ///
    /// let map = OrderedMap::from([(10, ()), (20, ()), (30, ())]);
    /// assert_eq!(map.ceiling(&25), Some(&30));
    /// assert_eq!(map.ceiling(&35), None);
    /// ```
    pub fn ceiling<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.ceiling(key).map(|handle| &self.raw.node(handle).key)
    }

    /// Returns the number of keys in the closed range `[lo, hi]`.
    ///
    /// Computed from two ranks and a membership test rather than by walking
    /// the range. Returns 0 when `lo > hi`.
    ///
    /// # Complexity
    ///
    /// O(h)
    ///
    /// # Examples
    ///
    /// ```
    /// use osbst::OrderedMap;
    ///
    /// let map = OrderedMap::from([(1, ()), (3, ()), (5, ()), (7, ())]);
    /// assert_eq!(map.size_between(&2, &5), 2);
    /// assert_eq!(map.size_between(&5, &2), 0);
    /// ```
    pub fn size_between<Q>(&self, lo: &Q, hi: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.count_between(lo, hi)
    }

    /// Gets an iterator over the keys in the closed range `[lo, hi]`, in
    /// ascending order. The iterator is empty when `lo > hi`.
    ///
    /// Subtrees that lie entirely outside the range are never visited.
    ///
    /// # Examples
    ///
    /// ```
    /// use osbst::OrderedMap;
    ///
    /// let map = OrderedMap::from([("b", 2), ("a", 1), ("d", 4), ("c", 3)]);
    /// let keys: Vec<_> = map.keys_between("b", "c").copied().collect();
    /// assert_eq!(keys, ["b", "c"]);
    /// assert_eq!(map.keys_between("c", "b").count(), 0);
    /// ```
    pub fn keys_between<Q>(&self, lo: &Q, hi: &Q) -> Keys<'_, K, V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        Keys {
            inner: Traversal::between(&self.raw, lo, hi),
        }
    }

    /// Gets an iterator over the entries whose keys fall in the closed range
    /// `[lo, hi]`. The iterator is empty when `lo > hi`.
    pub fn range<Q>(&self, lo: &Q, hi: &Q) -> Range<'_, K, V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        Range {
            inner: Traversal::between(&self.raw, lo, hi),
        }
    }
}

/// Indexes into the map by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use osbst::{OrderedMap, Rank};
///
/// let map = OrderedMap::from([("b", 2), ("a", 1)]);
/// assert_eq!(map[Rank(1)], 2);
/// ```
impl<K, V> Index<Rank> for OrderedMap<K, V> {
    type Output = V;

    fn index(&self, rank: Rank) -> &V {
        match self.get_by_rank(rank.0) {
            Some((_, value)) => value,
            None => panic!("{}", Error::InvalidArgument { rank: rank.0, size: self.size() }),
        }
    }
}

/// Mutably indexes into the map by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use osbst::{OrderedMap, Rank};
///
/// let mut map = OrderedMap::from([("a", 1), ("b", 2)]);
/// map[Rank(1)] = 5;
/// assert_eq!(map.get("b"), Some(&5));
/// ```
impl<K, V> IndexMut<Rank> for OrderedMap<K, V> {
    fn index_mut(&mut self, rank: Rank) -> &mut V {
        let size = self.size();
        match self.get_by_rank_mut(rank.0) {
            Some((_, value)) => value,
            None => panic!("{}", Error::InvalidArgument { rank: rank.0, size }),
        }
    }
}
