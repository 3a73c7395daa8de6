use core::borrow::Borrow;
use core::sync::atomic::{AtomicU64, Ordering};

use super::SbTreeMap;
use crate::Error;
use crate::raw::{Handle, NodeRef};

/// The process-unique identity of one map instance. Cursors carry the id of
/// the map that issued them so foreign cursors can be rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct MapId(u64);

impl MapId {
    pub(crate) fn next() -> MapId {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        // Distinctness is all that matters here, so relaxed ordering is enough.
        MapId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A detached position in a [`SbTreeMap`].
///
/// A cursor is a `Copy` token naming either one element of a specific map or
/// that map's past-the-end position. It borrows nothing, so it can be held
/// across arbitrary map operations; every use goes back through the map
/// ([`cursor_key`](SbTreeMap::cursor_key), [`advance`](SbTreeMap::advance),
/// [`erase`](SbTreeMap::erase), and friends), which validates the cursor
/// before touching the tree. A cursor whose element has been erased (even if
/// the storage slot has been reused since) or that was issued by a different
/// map fails every operation with
/// [`InvalidCursor`](crate::Error::InvalidCursor).
///
/// Cursors survive all operations that do not remove their element. In
/// particular rebalancing rotations and erasure of *other* elements never
/// invalidate them. [`clear`](SbTreeMap::clear) invalidates every cursor,
/// and a [`Clone`] of the map gets a fresh identity, so cursors never carry
/// over to the copy.
///
/// Two cursors are equal when they were issued by the same map and name the
/// same position; `find` of an absent key compares equal to
/// [`cursor_end`](SbTreeMap::cursor_end).
///
/// Cursors are an extension and are not part of the standard `BTreeMap` API.
///
/// # Examples
///
/// ```
/// use sbtree::{Error, SbTreeMap};
///
/// let mut map = SbTreeMap::from([(1, "a"), (2, "b")]);
///
/// let cursor = map.find(&1);
/// map.insert(3, "c"); // does not disturb the cursor
/// assert_eq!(map.cursor_key(cursor), Ok(&1));
///
/// map.erase(cursor).unwrap();
/// assert_eq!(map.cursor_key(cursor), Err(Error::InvalidCursor));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Cursor {
    pub(crate) map: MapId,
    pub(crate) node: Option<NodeRef>,
}

impl Cursor {
    /// Returns `true` if this is a past-the-end cursor.
    ///
    /// This inspects only the token itself, so the end cursor of *any* map
    /// reports `true`. It says nothing about staleness; ask the issuing map
    /// to find out whether an element cursor is still live.
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
    /// let mut map = SbTreeMap::new();
    /// assert!(map.cursor_end().is_end());
    ///
    /// let (cursor, _) = map.insert(1, "a");
    /// assert!(!cursor.is_end());
    /// ```
    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.node.is_none()
    }
}

impl<K, V> SbTreeMap<K, V> {
    /// Validates that `cursor` was issued by this map and still names a live
    /// element, and returns that element's handle.
    fn live_handle(&self, cursor: Cursor) -> Result<Handle, Error> {
        if cursor.map != self.id {
            return Err(Error::InvalidCursor);
        }
        let node = cursor.node.ok_or(Error::InvalidCursor)?;
        self.raw.resolve(node).ok_or(Error::InvalidCursor)
    }

    fn element_cursor(&self, handle: Handle) -> Cursor {
        Cursor {
            map: self.id,
            node: Some(self.raw.node_ref(handle)),
        }
    }

    /// Returns a cursor at the first element, in key order. On an empty map
    /// this is the past-the-end cursor.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
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
    /// assert!(map.cursor_first().is_end());
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// assert_eq!(map.cursor_key(map.cursor_first()), Ok(&1));
    /// ```
    #[must_use]
    pub fn cursor_first(&self) -> Cursor {
        match self.raw.first() {
            Some(handle) => self.element_cursor(handle),
            None => self.cursor_end(),
        }
    }

    /// Returns the past-the-end cursor, the position one past the last
    /// element. It never names an element, but it is a valid starting point
    /// for [`recede`](SbTreeMap::recede).
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
    /// let map: SbTreeMap<i32, &str> = SbTreeMap::new();
    /// assert!(map.cursor_end().is_end());
    /// assert_eq!(map.cursor_first(), map.cursor_end());
    /// ```
    #[must_use]
    pub const fn cursor_end(&self) -> Cursor {
        Cursor {
            map: self.id,
            node: None,
        }
    }

    /// Returns a cursor at the element matching `key`, or the past-the-end
    /// cursor if there is no such element.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form *must* match the ordering on the key
    /// type.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
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
    /// map.insert("a", 1);
    ///
    /// let cursor = map.find("a");
    /// assert_eq!(map.cursor_value(cursor), Ok(&1));
    /// assert_eq!(map.find("missing"), map.cursor_end());
    /// ```
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        match self.raw.search(key) {
            Some(handle) => self.element_cursor(handle),
            None => self.cursor_end(),
        }
    }

    /// Returns the cursor one position after `cursor`, in key order.
    ///
    /// Advancing off the last element yields the past-the-end cursor.
    /// Advancing the past-the-end cursor itself fails, as does advancing a
    /// stale or foreign cursor.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCursor`] if `cursor` does not name a live element of
    /// this map.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::{Error, SbTreeMap};
    ///
    /// let map = SbTreeMap::from([(1, "a"), (2, "b")]);
    ///
    /// let cursor = map.cursor_first();
    /// let cursor = map.advance(cursor).unwrap();
    /// assert_eq!(map.cursor_key(cursor), Ok(&2));
    ///
    /// // The last element advances to past-the-end, which cannot advance.
    /// let cursor = map.advance(cursor).unwrap();
    /// assert!(cursor.is_end());
    /// assert_eq!(map.advance(cursor), Err(Error::InvalidCursor));
    /// ```
    pub fn advance(&self, cursor: Cursor) -> Result<Cursor, Error> {
        let handle = self.live_handle(cursor)?;
        Ok(match self.raw.successor(handle) {
            Some(next) => self.element_cursor(next),
            None => self.cursor_end(),
        })
    }

    /// Returns the cursor one position before `cursor`, in key order.
    ///
    /// Receding from the past-the-end cursor lands on the last element, so
    /// `map.recede(map.cursor_end())` starts a backward walk. Receding from
    /// the first element fails, as does receding on an empty map or through
    /// a stale or foreign cursor.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCursor`] if there is no previous element or `cursor`
    /// was not issued by this map.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::{Error, SbTreeMap};
    ///
    /// let map = SbTreeMap::from([(1, "a"), (2, "b")]);
    ///
    /// // Receding from past-the-end lands on the last element.
    /// let cursor = map.recede(map.cursor_end()).unwrap();
    /// assert_eq!(map.cursor_key(cursor), Ok(&2));
    ///
    /// let cursor = map.recede(cursor).unwrap();
    /// assert_eq!(map.cursor_key(cursor), Ok(&1));
    ///
    /// // The first element has no predecessor.
    /// assert_eq!(map.recede(cursor), Err(Error::InvalidCursor));
    /// ```
    pub fn recede(&self, cursor: Cursor) -> Result<Cursor, Error> {
        if cursor.map != self.id {
            return Err(Error::InvalidCursor);
        }
        let previous = match cursor.node {
            None => self.raw.last(),
            Some(node) => {
                let handle = self.raw.resolve(node).ok_or(Error::InvalidCursor)?;
                self.raw.predecessor(handle)
            }
        };
        let handle = previous.ok_or(Error::InvalidCursor)?;
        Ok(self.element_cursor(handle))
    }

    /// Returns a reference to the key of the element `cursor` names.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCursor`] on a past-the-end, stale, or foreign cursor.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::{Error, SbTreeMap};
    ///
    /// let mut map = SbTreeMap::new();
    /// let (cursor, _) = map.insert(1, "a");
    /// assert_eq!(map.cursor_key(cursor), Ok(&1));
    /// assert_eq!(map.cursor_key(map.cursor_end()), Err(Error::InvalidCursor));
    /// ```
    pub fn cursor_key(&self, cursor: Cursor) -> Result<&K, Error> {
        let handle = self.live_handle(cursor)?;
        Ok(self.raw.key_value(handle).0)
    }

    /// Returns a reference to the value of the element `cursor` names.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCursor`] on a past-the-end, stale, or foreign cursor.
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
    /// let mut map = SbTreeMap::new();
    /// let (cursor, _) = map.insert(1, "a");
    /// assert_eq!(map.cursor_value(cursor), Ok(&"a"));
    /// ```
    pub fn cursor_value(&self, cursor: Cursor) -> Result<&V, Error> {
        let handle = self.live_handle(cursor)?;
        Ok(self.raw.key_value(handle).1)
    }

    /// Returns references to the key and value of the element `cursor` names.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCursor`] on a past-the-end, stale, or foreign cursor.
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
    /// let mut map = SbTreeMap::new();
    /// let (cursor, _) = map.insert(1, "a");
    /// assert_eq!(map.cursor_key_value(cursor), Ok((&1, &"a")));
    /// ```
    pub fn cursor_key_value(&self, cursor: Cursor) -> Result<(&K, &V), Error> {
        let handle = self.live_handle(cursor)?;
        Ok(self.raw.key_value(handle))
    }

    /// Returns a mutable reference to the value of the element `cursor`
    /// names. The key is not reachable through a cursor mutably; keys are
    /// immutable while in the map.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCursor`] on a past-the-end, stale, or foreign cursor.
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
    /// let mut map = SbTreeMap::new();
    /// let (cursor, _) = map.insert(1, "a");
    /// *map.cursor_value_mut(cursor).unwrap() = "b";
    /// assert_eq!(map[&1], "b");
    /// ```
    pub fn cursor_value_mut(&mut self, cursor: Cursor) -> Result<&mut V, Error> {
        let handle = self.live_handle(cursor)?;
        Ok(self.raw.key_value_mut(handle).1)
    }

    /// Removes the element `cursor` names and returns its key and value.
    ///
    /// On failure nothing is changed. A successful erase invalidates exactly
    /// the cursors that named the removed element; every other cursor stays
    /// valid, including cursors to the neighboring element the removal may
    /// relocate internally.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCursor`] on a past-the-end, stale, or foreign cursor.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtree::{Error, SbTreeMap};
    ///
    /// let mut map = SbTreeMap::from([(1, "a"), (2, "b")]);
    ///
    /// let cursor = map.find(&1);
    /// assert_eq!(map.erase(cursor), Ok((1, "a")));
    /// assert_eq!(map.len(), 1);
    ///
    /// // The cursor is now stale; erasing again fails and changes nothing.
    /// assert_eq!(map.erase(cursor), Err(Error::InvalidCursor));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn erase(&mut self, cursor: Cursor) -> Result<(K, V), Error> {
        let handle = self.live_handle(cursor)?;
        Ok(self.raw.erase(handle))
    }
}
