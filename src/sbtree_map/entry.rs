use core::fmt;
use core::mem;

use crate::raw::{Handle, RawSbTreeMap};

/// A view into a single entry in a map, which may either be vacant or
/// occupied.
///
/// This `enum` is constructed from the [`entry`] method on [`SbTreeMap`].
///
/// [`entry`]: crate::SbTreeMap::entry
/// [`SbTreeMap`]: crate::SbTreeMap
pub enum Entry<'a, K, V> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Entry<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Vacant(v) => f.debug_tuple("Entry").field(v).finish(),
            Entry::Occupied(o) => f.debug_tuple("Entry").field(o).finish(),
        }
    }
}

/// A view into a vacant entry in a [`SbTreeMap`]. It is part of the [`Entry`]
/// enum.
///
/// [`SbTreeMap`]: crate::SbTreeMap
pub struct VacantEntry<'a, K, V> {
    pub(crate) key: K,
    pub(crate) tree: &'a mut RawSbTreeMap<K, V>,
}

impl<K: fmt::Debug, V> fmt::Debug for VacantEntry<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VacantEntry").field(&self.key).finish()
    }
}

/// A view into an occupied entry in a [`SbTreeMap`]. It is part of the
/// [`Entry`] enum.
///
/// [`SbTreeMap`]: crate::SbTreeMap
pub struct OccupiedEntry<'a, K, V> {
    // Valid for as long as the borrow lives; the only slot-freeing operation
    // reachable through an entry consumes the entry.
    pub(crate) handle: Handle,
    pub(crate) tree: &'a mut RawSbTreeMap<K, V>,
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OccupiedEntry<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OccupiedEntry")
            .field("key", self.key())
            .field("value", self.get())
            .finish()
    }
}

impl<'a, K: Ord, V> Entry<'a, K, V> {
    /// Ensures a value is in the entry by inserting the default if empty, and
    /// returns a mutable reference to the value in the entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::SbTreeMap;
    ///
    /// let mut map: SbTreeMap<&str, usize> = SbTreeMap::new();
    /// map.entry("lighthouse").or_insert(12);
    ///
    /// assert_eq!(map["lighthouse"], 12);
    /// ```
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Ensures a value is in the entry by inserting the result of the default
    /// function if empty, and returns a mutable reference to the value in the
    /// entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::SbTreeMap;
    ///
    /// let mut map: SbTreeMap<&str, String> = SbTreeMap::new();
    /// let s = String::from("keeper");
    ///
    /// map.entry("lighthouse").or_insert_with(|| s);
    ///
    /// assert_eq!(map["lighthouse"], "keeper");
    /// ```
    pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Ensures a value is in the entry by inserting, if empty, the result of
    /// the default function. This method allows for generating key-derived
    /// values for insertion by providing the default function a reference to
    /// the key that was moved during the `.entry(key)` method call.
    ///
    /// The reference to the moved key is provided so that cloning or copying
    /// the key is unnecessary, unlike with `.or_insert_with(|| ... )`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::SbTreeMap;
    ///
    /// let mut map: SbTreeMap<&str, usize> = SbTreeMap::new();
    ///
    /// map.entry("lighthouse").or_insert_with_key(|key| key.chars().count());
    ///
    /// assert_eq!(map["lighthouse"], 10);
    /// ```
    pub fn or_insert_with_key<F: FnOnce(&K) -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let value = default(entry.key());
                entry.insert(value)
            }
        }
    }

    /// Returns a reference to this entry's key.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::SbTreeMap;
    ///
    /// let mut map: SbTreeMap<&str, usize> = SbTreeMap::new();
    /// assert_eq!(map.entry("lighthouse").key(), &"lighthouse");
    /// ```
    #[allow(clippy::must_use_candidate)]
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts into the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::SbTreeMap;
    ///
    /// let mut map: SbTreeMap<&str, usize> = SbTreeMap::new();
    ///
    /// map.entry("lighthouse")
    ///    .and_modify(|e| { *e += 1 })
    ///    .or_insert(42);
    /// assert_eq!(map["lighthouse"], 42);
    ///
    /// map.entry("lighthouse")
    ///    .and_modify(|e| { *e += 1 })
    ///    .or_insert(42);
    /// assert_eq!(map["lighthouse"], 43);
    /// ```
    #[allow(clippy::return_self_not_must_use)]
    pub fn and_modify<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        if let Entry::Occupied(ref mut entry) = self {
            f(entry.get_mut());
        }
        self
    }

    /// Sets the value of the entry, and returns an `OccupiedEntry`.
    ///
    /// Unlike [`insert`](crate::SbTreeMap::insert) on the map, this **does**
    /// replace the stored value when the entry is occupied.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::SbTreeMap;
    ///
    /// let mut map: SbTreeMap<&str, String> = SbTreeMap::new();
    /// let entry = map.entry("lighthouse").insert_entry(String::from("dim"));
    ///
    /// assert_eq!(entry.key(), &"lighthouse");
    /// ```
    pub fn insert_entry(self, value: V) -> OccupiedEntry<'a, K, V> {
        match self {
            Entry::Occupied(mut entry) => {
                entry.insert(value);
                entry
            }
            Entry::Vacant(entry) => entry.insert_entry(value),
        }
    }
}

impl<'a, K: Ord, V: Default> Entry<'a, K, V> {
    /// Ensures a value is in the entry by inserting the default value if
    /// empty, and returns a mutable reference to the value in the entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::SbTreeMap;
    ///
    /// let mut map: SbTreeMap<&str, Option<usize>> = SbTreeMap::new();
    /// map.entry("lighthouse").or_default();
    ///
    /// assert_eq!(map["lighthouse"], None);
    /// ```
    #[allow(clippy::must_use_candidate)]
    pub fn or_default(self) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(V::default()),
        }
    }
}

impl<'a, K: Ord, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting a value
    /// through the `VacantEntry`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::SbTreeMap;
    ///
    /// let mut map: SbTreeMap<&str, usize> = SbTreeMap::new();
    /// assert_eq!(map.entry("lighthouse").key(), &"lighthouse");
    /// ```
    #[allow(clippy::must_use_candidate)]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Take ownership of the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::SbTreeMap;
    /// use sbtree::sbtree_map::Entry;
    ///
    /// let mut map: SbTreeMap<&str, usize> = SbTreeMap::new();
    ///
    /// if let Entry::Vacant(v) = map.entry("lighthouse") {
    ///     v.into_key();
    /// }
    /// ```
    #[allow(clippy::must_use_candidate)]
    pub fn into_key(self) -> K {
        self.key
    }

    /// Sets the value of the entry with the `VacantEntry`'s key, and returns
    /// a mutable reference to it.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::SbTreeMap;
    /// use sbtree::sbtree_map::Entry;
    ///
    /// let mut map: SbTreeMap<&str, u32> = SbTreeMap::new();
    ///
    /// if let Entry::Vacant(o) = map.entry("lighthouse") {
    ///     o.insert(37);
    /// }
    /// assert_eq!(map["lighthouse"], 37);
    /// ```
    pub fn insert(self, value: V) -> &'a mut V {
        let VacantEntry { key, tree } = self;
        let (handle, _) = tree.insert(key, value);
        tree.key_value_mut(handle).1
    }

    /// Sets the value of the entry with the `VacantEntry`'s key, and returns
    /// an `OccupiedEntry`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::SbTreeMap;
    /// use sbtree::sbtree_map::Entry;
    ///
    /// let mut map: SbTreeMap<&str, u32> = SbTreeMap::new();
    ///
    /// if let Entry::Vacant(o) = map.entry("lighthouse") {
    ///     let entry = o.insert_entry(37);
    ///     assert_eq!(entry.get(), &37);
    /// }
    /// ```
    pub fn insert_entry(self, value: V) -> OccupiedEntry<'a, K, V> {
        let VacantEntry { key, tree } = self;
        let (handle, _) = tree.insert(key, value);
        OccupiedEntry { handle, tree }
    }
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the key in the entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::SbTreeMap;
    ///
    /// let mut map: SbTreeMap<&str, usize> = SbTreeMap::new();
    /// map.entry("lighthouse").or_insert(12);
    /// assert_eq!(map.entry("lighthouse").key(), &"lighthouse");
    /// ```
    #[must_use]
    pub fn key(&self) -> &K {
        self.tree.key_value(self.handle).0
    }

    /// Take ownership of the key and value from the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::SbTreeMap;
    /// use sbtree::sbtree_map::Entry;
    ///
    /// let mut map: SbTreeMap<&str, usize> = SbTreeMap::new();
    /// map.entry("lighthouse").or_insert(12);
    ///
    /// if let Entry::Occupied(o) = map.entry("lighthouse") {
    ///     assert_eq!(o.remove_entry(), ("lighthouse", 12));
    /// }
    /// assert!(!map.contains_key("lighthouse"));
    /// ```
    #[allow(clippy::must_use_candidate)]
    pub fn remove_entry(self) -> (K, V) {
        self.tree.erase(self.handle)
    }

    /// Gets a reference to the value in the entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::SbTreeMap;
    /// use sbtree::sbtree_map::Entry;
    ///
    /// let mut map: SbTreeMap<&str, usize> = SbTreeMap::new();
    /// map.entry("lighthouse").or_insert(12);
    ///
    /// if let Entry::Occupied(o) = map.entry("lighthouse") {
    ///     assert_eq!(o.get(), &12);
    /// }
    /// ```
    #[must_use]
    pub fn get(&self) -> &V {
        self.tree.key_value(self.handle).1
    }

    /// Gets a mutable reference to the value in the entry.
    ///
    /// If you need a reference to the `OccupiedEntry` that may outlive the
    /// destruction of the `Entry` value, see [`into_mut`].
    ///
    /// [`into_mut`]: OccupiedEntry::into_mut
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::SbTreeMap;
    /// use sbtree::sbtree_map::Entry;
    ///
    /// let mut map: SbTreeMap<&str, usize> = SbTreeMap::new();
    /// map.entry("lighthouse").or_insert(12);
    ///
    /// if let Entry::Occupied(mut o) = map.entry("lighthouse") {
    ///     *o.get_mut() += 10;
    ///     assert_eq!(o.get(), &22);
    ///
    ///     // We can use the same Entry multiple times.
    ///     *o.get_mut() += 2;
    /// }
    /// assert_eq!(map["lighthouse"], 24);
    /// ```
    pub fn get_mut(&mut self) -> &mut V {
        self.tree.key_value_mut(self.handle).1
    }

    /// Converts the entry into a mutable reference to its value.
    ///
    /// If you need multiple references to the `OccupiedEntry`, see
    /// [`get_mut`].
    ///
    /// [`get_mut`]: OccupiedEntry::get_mut
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::SbTreeMap;
    /// use sbtree::sbtree_map::Entry;
    ///
    /// let mut map: SbTreeMap<&str, usize> = SbTreeMap::new();
    /// map.entry("lighthouse").or_insert(12);
    ///
    /// if let Entry::Occupied(o) = map.entry("lighthouse") {
    ///     *o.into_mut() += 10;
    /// }
    /// assert_eq!(map["lighthouse"], 22);
    /// ```
    #[must_use = "`self` will be dropped if the result is not used"]
    pub fn into_mut(self) -> &'a mut V {
        self.tree.key_value_mut(self.handle).1
    }

    /// Sets the value of the entry with the `OccupiedEntry`'s key, and
    /// returns the entry's old value.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::SbTreeMap;
    /// use sbtree::sbtree_map::Entry;
    ///
    /// let mut map: SbTreeMap<&str, usize> = SbTreeMap::new();
    /// map.entry("lighthouse").or_insert(12);
    ///
    /// if let Entry::Occupied(mut o) = map.entry("lighthouse") {
    ///     assert_eq!(o.insert(15), 12);
    /// }
    /// assert_eq!(map["lighthouse"], 15);
    /// ```
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }

    /// Takes the value of the entry out of the map, and returns it.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::SbTreeMap;
    /// use sbtree::sbtree_map::Entry;
    ///
    /// let mut map: SbTreeMap<&str, usize> = SbTreeMap::new();
    /// map.entry("lighthouse").or_insert(12);
    ///
    /// if let Entry::Occupied(o) = map.entry("lighthouse") {
    ///     assert_eq!(o.remove(), 12);
    /// }
    /// assert!(!map.contains_key("lighthouse"));
    /// ```
    #[allow(clippy::must_use_candidate)]
    pub fn remove(self) -> V {
        self.remove_entry().1
    }
}
