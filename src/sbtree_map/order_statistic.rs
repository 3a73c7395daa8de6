use core::borrow::Borrow;
use core::ops::{Index, IndexMut};

use super::SbTreeMap;
use crate::Rank;

impl<K, V> SbTreeMap<K, V> {
    /// Returns the key-value pair at position `rank` in sorted order.
    ///
    /// Ranks are one-based: rank 1 is the smallest key and rank `len()` the
    /// largest. Rank zero and ranks past `len()` return `None`.
    ///
    /// This is an order-statistic extension and is not part of the standard
    /// `BTreeMap` API.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::SbTreeMap;
    ///
    /// let mut map = SbTreeMap::new();
    /// map.insert("a", 10);
    /// map.insert("c", 30);
    /// map.insert("b", 20);
    ///
    /// assert_eq!(map.select(1), Some((&"a", &10)));
    /// assert_eq!(map.select(2), Some((&"b", &20)));
    /// assert_eq!(map.select(0), None);
    /// assert_eq!(map.select(4), None);
    /// ```
    #[must_use]
    pub fn select(&self, rank: usize) -> Option<(&K, &V)> {
        let handle = self.raw.select(rank)?;
        Some(self.raw.key_value(handle))
    }

    /// Returns the key and a mutable reference to the value at position
    /// `rank` in sorted order.
    ///
    /// Ranks are one-based: rank 1 is the smallest key and rank `len()` the
    /// largest. Rank zero and ranks past `len()` return `None`. The key is
    /// returned as a shared reference because mutating it would violate the
    /// map's ordering invariants.
    ///
    /// This is an order-statistic extension and is not part of the standard
    /// `BTreeMap` API.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::SbTreeMap;
    ///
    /// let mut map = SbTreeMap::new();
    /// map.insert(10, "a");
    /// map.insert(5, "b");
    ///
    /// if let Some((key, value)) = map.select_mut(1) {
    ///     assert_eq!(*key, 5);
    ///     *value = "updated";
    /// }
    ///
    /// assert_eq!(map.get(&5), Some(&"updated"));
    /// ```
    #[must_use]
    pub fn select_mut(&mut self, rank: usize) -> Option<(&K, &mut V)> {
        let handle = self.raw.select(rank)?;
        Some(self.raw.key_value_mut(handle))
    }

    /// Returns the one-based rank of `key` in sorted order, or `None` if the
    /// key is not present.
    ///
    /// `rank_of` and [`select`](SbTreeMap::select) are inverses over the keys
    /// in the map.
    ///
    /// This is an order-statistic extension and is not part of the standard
    /// `BTreeMap` API.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::SbTreeMap;
    ///
    /// let mut map = SbTreeMap::new();
    /// map.insert(10, "a");
    /// map.insert(20, "b");
    ///
    /// assert_eq!(map.rank_of(&10), Some(1));
    /// assert_eq!(map.rank_of(&20), Some(2));
    /// assert_eq!(map.rank_of(&15), None);
    /// ```
    #[must_use]
    pub fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.rank_of(key)
    }
}
/// Indexes into the map by one-based rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds (zero, or greater than `len()`).
///
/// # Examples
///
/// ```
/// use sbtree::{Rank, SbTreeMap};
///
/// let mut map = SbTreeMap::new();
/// map.insert("a", 1);
/// map.insert("b", 2);
///
/// assert_eq!(map[Rank(1)], 1);
/// assert_eq!(map[Rank(2)], 2);
/// ```
impl<K, V> Index<Rank> for SbTreeMap<K, V> {
    type Output = V;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.select(rank.0).map(|(_, v)| v).expect("index out of bounds")
    }
}
/// Mutably indexes into the map by one-based rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds (zero, or greater than `len()`).
///
/// # Examples
///
/// ```
/// use sbtree::{Rank, SbTreeMap};
///
/// let mut map = SbTreeMap::from([("a", 1), ("b", 2)]);
/// map[Rank(2)] = 5;
///
/// assert_eq!(map.get(&"b"), Some(&5));
/// ```
impl<K, V> IndexMut<Rank> for SbTreeMap<K, V> {
    fn index_mut(&mut self, rank: Rank) -> &mut Self::Output {
        self.select_mut(rank.0).map(|(_, v)| v).expect("index out of bounds")
    }
}
