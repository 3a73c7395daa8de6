use super::{MapId, SbTreeMap};
use crate::raw::RawSbTreeMap;

impl<K, V> SbTreeMap<K, V> {
    /// Creates an empty `SbTreeMap` with at least the specified capacity.
    ///
    /// The map will be able to hold at least `capacity` elements without
    /// reallocating its arenas. This method is permitted to allocate more
    /// space than requested. If `capacity` is zero, nothing is allocated.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Complexity
    ///
    /// O(capacity)
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::SbTreeMap;
    ///
    /// let mut map = SbTreeMap::with_capacity(10);
    /// assert!(map.capacity() >= 10);
    ///
    /// // The map contains no elements, even though it has capacity for more.
    /// assert_eq!(map.len(), 0);
    ///
    /// map.insert(1, "a");
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> SbTreeMap<K, V> {
        SbTreeMap {
            raw: RawSbTreeMap::with_capacity(capacity),
            id: MapId::next(),
        }
    }

    /// Returns the total number of elements the map can hold without
    /// reallocating.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::SbTreeMap;
    ///
    /// let map: SbTreeMap<i32, i32> = SbTreeMap::with_capacity(10);
    /// assert!(map.capacity() >= 10);
    /// ```
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
