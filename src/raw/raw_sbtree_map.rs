use core::borrow::Borrow;
use core::cmp::Ordering;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::{Handle, NodeRef};
use super::node::Node;
use super::size::Size;

/// The core size-balanced tree implementation backing `SbTreeMap`.
///
/// Nodes carry parent links, so every traversal is an iterative walk over
/// arena handles; the call stack never grows with the tree. Balance is
/// restored by rotations on insertion only. Removal splices nodes out
/// without rebalancing, which cannot increase the height of the tree.
pub(crate) struct RawSbTreeMap<K, V> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K>>,
    /// Arena storing all values (separate from nodes so node surgery and
    /// outstanding value borrows never overlap).
    values: Arena<V>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Total number of key-value pairs in the tree.
    len: usize,
}

impl<K, V> RawSbTreeMap<K, V> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            values: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Creates a new tree with the specified capacity.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            values: Arena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    /// Returns the number of key-value pairs in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no elements.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the capacity of the tree.
    pub(crate) fn capacity(&self) -> usize {
        self.values.capacity()
    }

    /// Clears all elements from the tree. Slot generations are bumped, so
    /// references issued before the clear can never resolve again.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.values.clear();
        self.root = None;
        self.len = 0;
    }

    /// Drains all key-value pairs from the tree in ascending key order.
    /// The handles are collected up front because taking a node mid-walk
    /// would break the parent climbs the walk relies on.
    pub(crate) fn drain_to_vec(&mut self) -> alloc::vec::Vec<(K, V)> {
        let mut handles = alloc::vec::Vec::with_capacity(self.len);
        let mut current = self.first();

        while let Some(handle) = current {
            handles.push(handle);
            current = self.successor(handle);
        }

        let mut result = alloc::vec::Vec::with_capacity(handles.len());
        for handle in handles {
            let node = self.nodes.take(handle);
            result.push((node.key, self.values.take(node.value)));
        }

        self.root = None;
        self.len = 0;

        result
    }

    /// Returns a reference to a node by handle.
    pub(crate) fn node(&self, handle: Handle) -> &Node<K> {
        self.nodes.get(handle)
    }

    /// Returns a reference to a node by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawSbTreeMap<K, V>`.
    pub(crate) unsafe fn node_ptr<'a>(ptr: *const Self, handle: Handle) -> &'a Node<K> {
        // SAFETY: We only access the `nodes` field through addr_of, avoiding aliasing with
        // the `values` field.
        unsafe { Arena::get_ptr(core::ptr::addr_of!((*ptr).nodes), handle) }
    }

    /// Returns a reference to a value by handle.
    pub(crate) fn value(&self, handle: Handle) -> &V {
        self.values.get(handle)
    }

    /// Returns a mutable reference to a value by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawSbTreeMap<K, V>`.
    /// - The caller must have logical exclusive access to the value at `handle`.
    pub(crate) unsafe fn value_mut_ptr<'a>(ptr: *mut Self, handle: Handle) -> &'a mut V {
        // SAFETY: We only access the `values` field, avoiding aliasing with the `nodes`
        // field. Exclusivity for this value is the caller's obligation.
        unsafe { Arena::get_mut_ptr(core::ptr::addr_of_mut!((*ptr).values), handle) }
    }

    /// Returns the key-value pair stored at a node.
    pub(crate) fn key_value(&self, handle: Handle) -> (&K, &V) {
        let node = self.nodes.get(handle);
        (&node.key, self.values.get(node.value))
    }

    /// Returns the key and a mutable reference to the value stored at a node.
    pub(crate) fn key_value_mut(&mut self, handle: Handle) -> (&K, &mut V) {
        let node = self.nodes.get(handle);
        (&node.key, self.values.get_mut(node.value))
    }

    /// Stamps `handle` with its slot's current generation.
    pub(crate) fn node_ref(&self, handle: Handle) -> NodeRef {
        self.nodes.node_ref(handle)
    }

    /// Resolves a stamped reference back to a live handle, or `None` if the
    /// node has been removed since the reference was issued.
    pub(crate) fn resolve(&self, node: NodeRef) -> Option<Handle> {
        self.nodes.resolve(node)
    }

    /// Returns the handle of the node with the smallest key, if any.
    pub(crate) fn first(&self) -> Option<Handle> {
        let mut current = self.root?;
        while let Some(left) = self.nodes.get(current).left {
            current = left;
        }
        Some(current)
    }

    /// Returns the handle of the node with the largest key, if any.
    pub(crate) fn last(&self) -> Option<Handle> {
        let mut current = self.root?;
        while let Some(right) = self.nodes.get(current).right {
            current = right;
        }
        Some(current)
    }

    /// Returns the first key-value pair in the tree.
    pub(crate) fn first_key_value(&self) -> Option<(&K, &V)> {
        let handle = self.first()?;
        Some(self.key_value(handle))
    }

    /// Returns the last key-value pair in the tree.
    pub(crate) fn last_key_value(&self) -> Option<(&K, &V)> {
        let handle = self.last()?;
        Some(self.key_value(handle))
    }

    /// Returns the handle of the node with the next larger key, if any.
    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        // SAFETY: `self` is a valid reference.
        unsafe { Self::successor_ptr(self, handle) }
    }

    /// Returns the handle of the node with the next smaller key, if any.
    pub(crate) fn predecessor(&self, handle: Handle) -> Option<Handle> {
        // SAFETY: `self` is a valid reference.
        unsafe { Self::predecessor_ptr(self, handle) }
    }

    /// Returns the handle of the node with the next larger key from a raw
    /// pointer. Descends into the right subtree when there is one, otherwise
    /// climbs until arriving from a left child.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawSbTreeMap<K, V>`.
    pub(crate) unsafe fn successor_ptr(ptr: *const Self, handle: Handle) -> Option<Handle> {
        // SAFETY: Only the `nodes` arena is read, so the caller may hold live
        // value references throughout.
        unsafe {
            let node = Self::node_ptr(ptr, handle);
            if let Some(right) = node.right {
                let mut current = right;
                while let Some(left) = Self::node_ptr(ptr, current).left {
                    current = left;
                }
                return Some(current);
            }

            let mut current = handle;
            let mut parent = node.parent;
            while let Some(above) = parent {
                let above_node = Self::node_ptr(ptr, above);
                if above_node.left == Some(current) {
                    return Some(above);
                }
                current = above;
                parent = above_node.parent;
            }
            None
        }
    }

    /// Returns the handle of the node with the next smaller key from a raw
    /// pointer. Mirror image of [`Self::successor_ptr`].
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawSbTreeMap<K, V>`.
    pub(crate) unsafe fn predecessor_ptr(ptr: *const Self, handle: Handle) -> Option<Handle> {
        // SAFETY: Only the `nodes` arena is read, so the caller may hold live
        // value references throughout.
        unsafe {
            let node = Self::node_ptr(ptr, handle);
            if let Some(left) = node.left {
                let mut current = left;
                while let Some(right) = Self::node_ptr(ptr, current).right {
                    current = right;
                }
                return Some(current);
            }

            let mut current = handle;
            let mut parent = node.parent;
            while let Some(above) = parent {
                let above_node = Self::node_ptr(ptr, above);
                if above_node.right == Some(current) {
                    return Some(above);
                }
                current = above;
                parent = above_node.parent;
            }
            None
        }
    }

    /// Returns the handle of the node holding the key with the given 1-based
    /// rank, or `None` if the rank is 0 or past the end.
    pub(crate) fn select(&self, rank: usize) -> Option<Handle> {
        if rank == 0 || rank > self.len {
            return None;
        }

        let mut current = self.root;
        let mut remaining = rank;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let left_size = self.subtree_size(node.left);

            if remaining <= left_size {
                current = node.left;
            } else if remaining == left_size + 1 {
                return Some(handle);
            } else {
                remaining -= left_size + 1;
                current = node.right;
            }
        }

        debug_assert!(
            false,
            "select: tree size invariant violated - rank {rank} not found (len: {})",
            self.len
        );
        None
    }

    /// Removes the node at `handle` from the tree and returns its key-value
    /// pair. Removal never rebalances: rotations only run on insertion, so
    /// the height stays within the bound established while the tree grew.
    pub(crate) fn erase(&mut self, target: Handle) -> (K, V) {
        // Every proper ancestor loses one key from its subtree.
        let mut ancestor = self.nodes.get(target).parent;
        while let Some(handle) = ancestor {
            let node = self.nodes.get_mut(handle);
            node.size = node.size.decrement();
            ancestor = node.parent;
        }

        let node = self.nodes.get(target);
        let (parent, left, right, size) = (node.parent, node.left, node.right, node.size);

        match (left, right) {
            (None, None) => {
                self.replace_child(parent, target, None);
            }
            (Some(child), None) | (None, Some(child)) => {
                // One child: splice it up into the target's place.
                self.nodes.get_mut(child).parent = parent;
                self.replace_child(parent, target, Some(child));
            }
            (Some(left), Some(right)) => {
                // Two children: relocate the in-order predecessor into the
                // target's place. Nodes on the way down to it each lose the
                // predecessor from their subtree; the predecessor itself
                // takes over the target's pre-removal size less one.
                let mut pred_parent = target;
                let mut pred = left;
                while let Some(next) = self.nodes.get(pred).right {
                    let node = self.nodes.get_mut(pred);
                    node.size = node.size.decrement();
                    pred_parent = pred;
                    pred = next;
                }

                if pred_parent == target {
                    // The left child is itself the predecessor; it keeps its
                    // own left subtree and only gains the right subtree.
                    let node = self.nodes.get_mut(pred);
                    node.parent = parent;
                    node.right = Some(right);
                    node.size = size.decrement();
                } else {
                    // Unhook the predecessor (a right child with no right
                    // child of its own), splicing its left subtree up.
                    let pred_left = self.nodes.get(pred).left;
                    self.nodes.get_mut(pred_parent).right = pred_left;
                    if let Some(pred_left) = pred_left {
                        self.nodes.get_mut(pred_left).parent = Some(pred_parent);
                    }

                    let node = self.nodes.get_mut(pred);
                    node.parent = parent;
                    node.left = Some(left);
                    node.right = Some(right);
                    node.size = size.decrement();
                    self.nodes.get_mut(left).parent = Some(pred);
                }

                self.nodes.get_mut(right).parent = Some(pred);
                self.replace_child(parent, target, Some(pred));
            }
        }

        self.len -= 1;
        let node = self.nodes.take(target);
        let value = self.values.take(node.value);
        (node.key, value)
    }

    /// Points the parent's child slot from `old` to `new`, or re-roots the
    /// tree when `parent` is `None`.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let node = self.nodes.get_mut(parent);
                if node.left == Some(old) {
                    node.left = new;
                } else {
                    node.right = new;
                }
            }
        }
    }

    /// Returns the size of an optional subtree, counting an absent child
    /// as zero.
    fn subtree_size(&self, node: Option<Handle>) -> usize {
        node.map_or(0, |handle| self.nodes.get(handle).size.to_usize())
    }

    /// Rotates the subtree at `t` to the left, promoting its right child.
    /// The promoted child takes over `t`'s parent slot and its subtree size;
    /// `t`'s size is recomputed from its remaining children. Handles are
    /// untouched, only links and sizes change.
    fn rotate_left(&mut self, t: Handle) -> Handle {
        let node = self.nodes.get(t);
        let parent = node.parent;
        let size = node.size;
        let right = node.right.expect("`RawSbTreeMap::rotate_left()` - right child must exist!");
        let right_left = self.nodes.get(right).left;

        self.replace_child(parent, t, Some(right));

        let right_node = self.nodes.get_mut(right);
        right_node.parent = parent;
        right_node.left = Some(t);
        right_node.size = size;

        let node = self.nodes.get_mut(t);
        node.parent = Some(right);
        node.right = right_left;

        if let Some(right_left) = right_left {
            self.nodes.get_mut(right_left).parent = Some(t);
        }

        let node = self.nodes.get(t);
        let size = Size::from_usize(self.subtree_size(node.left) + self.subtree_size(node.right) + 1);
        self.nodes.get_mut(t).size = size;

        right
    }

    /// Rotates the subtree at `t` to the right, promoting its left child.
    /// Mirror image of [`Self::rotate_left`].
    fn rotate_right(&mut self, t: Handle) -> Handle {
        let node = self.nodes.get(t);
        let parent = node.parent;
        let size = node.size;
        let left = node.left.expect("`RawSbTreeMap::rotate_right()` - left child must exist!");
        let left_right = self.nodes.get(left).right;

        self.replace_child(parent, t, Some(left));

        let left_node = self.nodes.get_mut(left);
        left_node.parent = parent;
        left_node.right = Some(t);
        left_node.size = size;

        let node = self.nodes.get_mut(t);
        node.parent = Some(left);
        node.left = left_right;

        if let Some(left_right) = left_right {
            self.nodes.get_mut(left_right).parent = Some(t);
        }

        let node = self.nodes.get(t);
        let size = Size::from_usize(self.subtree_size(node.left) + self.subtree_size(node.right) + 1);
        self.nodes.get_mut(t).size = size;

        left
    }

    /// Restores the size-balance property at `t` after the subtree on the
    /// indicated side grew, returning the handle that now roots the subtree.
    ///
    /// The tree is size-balanced when neither child of a node is smaller
    /// than either grandchild on the other side. Growth on one side can only
    /// push that side's grandchildren past the opposite child, so only the
    /// two cases on the grown side are checked.
    fn maintain(&mut self, t: Handle, grew_right: bool) -> Handle {
        let node = self.nodes.get(t);
        let (left, right) = (node.left, node.right);

        let root = if grew_right {
            let Some(right) = right else { return t };
            let left_size = self.subtree_size(left);
            let right_node = self.nodes.get(right);
            let (right_left, right_right) = (right_node.left, right_node.right);

            if self.subtree_size(right_right) > left_size {
                self.rotate_left(t)
            } else if self.subtree_size(right_left) > left_size {
                self.rotate_right(right);
                self.rotate_left(t)
            } else {
                return t;
            }
        } else {
            let Some(left) = left else { return t };
            let right_size = self.subtree_size(right);
            let left_node = self.nodes.get(left);
            let (left_left, left_right) = (left_node.left, left_node.right);

            if self.subtree_size(left_left) > right_size {
                self.rotate_right(t)
            } else if self.subtree_size(left_right) > right_size {
                self.rotate_left(left);
                self.rotate_right(t)
            } else {
                return t;
            }
        };

        // A rotation can surface new violations below; re-validate both
        // children, then the new subtree root from both sides. Recursion
        // depth is bounded by the height of the subtree.
        let root_node = self.nodes.get(root);
        let (left, right) = (root_node.left, root_node.right);
        if let Some(left) = left {
            self.maintain(left, false);
        }
        if let Some(right) = right {
            self.maintain(right, true);
        }
        let root = self.maintain(root, true);
        self.maintain(root, false)
    }
}

impl<K: Ord, V> RawSbTreeMap<K, V> {
    /// Searches for a key and returns its node's handle if present.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            match key.cmp(node.key.borrow()) {
                Ordering::Less => current = node.left,
                Ordering::Greater => current = node.right,
                Ordering::Equal => return Some(handle),
            }
        }
        None
    }

    /// Returns a reference to the value corresponding to the key.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        Some(self.values.get(self.nodes.get(handle).value))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        let value = self.nodes.get(handle).value;
        Some(self.values.get_mut(value))
    }

    /// Returns the key-value pair corresponding to the key.
    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        Some(self.key_value(handle))
    }

    /// Returns true if the tree contains the specified key.
    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).is_some()
    }

    /// Returns the 1-based rank of a key: one more than the number of keys
    /// smaller than it. `None` if the key is absent.
    pub(crate) fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        let mut preceding = 0;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            match key.cmp(node.key.borrow()) {
                Ordering::Less => current = node.left,
                Ordering::Greater => {
                    preceding += self.subtree_size(node.left) + 1;
                    current = node.right;
                }
                Ordering::Equal => return Some(preceding + self.subtree_size(node.left) + 1),
            }
        }
        None
    }

    /// Inserts a key-value pair into the tree. Returns the handle of the
    /// node holding the key and whether an insertion happened: when the key
    /// is already present the existing mapping is kept untouched and the new
    /// pair is dropped.
    pub(crate) fn insert(&mut self, key: K, value: V) -> (Handle, bool) {
        // Handle empty tree case.
        let Some(root) = self.root else {
            let value = self.values.alloc(value);
            let handle = self.nodes.alloc(Node::new(key, value, None));
            self.root = Some(handle);
            self.len = 1;
            return (handle, true);
        };

        // Find the attachment point first; nothing is touched until the key
        // is known to be absent.
        let mut current = root;
        let (parent, attach_right) = loop {
            let node = self.nodes.get(current);
            match key.cmp(&node.key) {
                Ordering::Equal => return (current, false),
                Ordering::Less => match node.left {
                    Some(left) => current = left,
                    None => break (current, false),
                },
                Ordering::Greater => match node.right {
                    Some(right) => current = right,
                    None => break (current, true),
                },
            }
        };

        let value = self.values.alloc(value);
        let handle = self.nodes.alloc(Node::new(key, value, Some(parent)));
        if attach_right {
            self.nodes.get_mut(parent).right = Some(handle);
        } else {
            self.nodes.get_mut(parent).left = Some(handle);
        }
        self.len += 1;

        // Climb back to the root, growing subtree sizes and restoring the
        // balance at each ancestor. A rotation re-roots the subtree, so the
        // climb continues from whatever handle `maintain` settles on.
        let mut child = handle;
        while let Some(above) = self.nodes.get(child).parent {
            let grew_right = self.nodes.get(above).right == Some(child);
            let node = self.nodes.get_mut(above);
            node.size = node.size.increment();
            child = self.maintain(above, grew_right);
        }

        (handle, true)
    }

    /// Removes a key from the tree and returns the key-value pair.
    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        Some(self.erase(handle))
    }
}

impl<K: Clone, V: Clone> RawSbTreeMap<K, V> {
    /// Copies one node and its value from `source` into this tree, leaving
    /// the child links for the caller to wire up.
    fn clone_node(&mut self, source: &Self, handle: Handle, parent: Option<Handle>) -> Handle {
        let node = source.nodes.get(handle);
        let value = self.values.alloc(source.values.get(node.value).clone());
        self.nodes.alloc(Node {
            key: node.key.clone(),
            value,
            parent,
            left: None,
            right: None,
            size: node.size,
        })
    }
}

impl<K: Clone, V: Clone> Clone for RawSbTreeMap<K, V> {
    /// Deep copy by pre-order traversal with an explicit stack. The copy is
    /// fully independent and its arenas are compact, regardless of how
    /// fragmented this tree's arenas have become.
    fn clone(&self) -> Self {
        let mut new = Self::with_capacity(self.len);
        let Some(root) = self.root else {
            return new;
        };

        let new_root = new.clone_node(self, root, None);
        new.root = Some(new_root);
        new.len = self.len;

        let mut stack: SmallVec<[(Handle, Handle); 16]> = SmallVec::new();
        stack.push((root, new_root));

        while let Some((source, copy)) = stack.pop() {
            let node = self.nodes.get(source);
            let (left, right) = (node.left, node.right);

            if let Some(left) = left {
                let left_copy = new.clone_node(self, left, Some(copy));
                new.nodes.get_mut(copy).left = Some(left_copy);
                stack.push((left, left_copy));
            }
            if let Some(right) = right {
                let right_copy = new.clone_node(self, right, Some(copy));
                new.nodes.get_mut(copy).right = Some(right_copy);
                stack.push((right, right_copy));
            }
        }

        new
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(
    clippy::uninlined_format_args,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap
)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    impl<K: Ord + core::fmt::Debug, V> RawSbTreeMap<K, V> {
        /// Validates the structural invariants: parent links, subtree sizes,
        /// strictly increasing in-order key sequence, and length bookkeeping.
        /// Panics with a descriptive message if any are violated.
        pub(crate) fn validate_invariants(&self) {
            let Some(root) = self.root else {
                assert_eq!(self.len, 0, "Empty tree should have len 0");
                assert!(self.nodes.is_empty(), "Empty tree should have no nodes");
                assert!(self.values.is_empty(), "Empty tree should have no values");
                return;
            };

            let mut errors: Vec<String> = Vec::new();

            if self.node(root).parent.is_some() {
                errors.push(alloc::format!("root {:?} has a parent link", root));
            }

            let total = self.validate_node(root, &mut errors);
            if total != self.len {
                errors.push(alloc::format!("len mismatch: self.len={}, computed={}", self.len, total));
            }
            if self.nodes.len() != self.len {
                errors.push(alloc::format!(
                    "node arena length mismatch: arena={}, len={}",
                    self.nodes.len(),
                    self.len
                ));
            }
            if self.values.len() != self.len {
                errors.push(alloc::format!(
                    "value arena length mismatch: arena={}, len={}",
                    self.values.len(),
                    self.len
                ));
            }

            // The in-order walk must visit every node once, in strictly
            // increasing key order.
            let mut visited = 0;
            let mut previous: Option<Handle> = None;
            let mut current = self.first();
            while let Some(handle) = current {
                if let Some(previous) = previous {
                    let (previous, key) = (&self.node(previous).key, &self.node(handle).key);
                    if previous >= key {
                        errors.push(alloc::format!("keys out of order: {:?} before {:?}", previous, key));
                    }
                }
                previous = Some(handle);
                visited += 1;
                current = self.successor(handle);
            }
            if visited != self.len {
                errors.push(alloc::format!("in-order walk visited {} of {} nodes", visited, self.len));
            }

            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        fn validate_node(&self, handle: Handle, errors: &mut Vec<String>) -> usize {
            let node = self.node(handle);
            let mut total = 1;

            for child in [node.left, node.right] {
                if let Some(child) = child {
                    if self.node(child).parent != Some(handle) {
                        errors.push(alloc::format!(
                            "child {:?} of {:?} has parent link {:?}",
                            child,
                            handle,
                            self.node(child).parent
                        ));
                    }
                    total += self.validate_node(child, errors);
                }
            }

            if node.size.to_usize() != total {
                errors.push(alloc::format!(
                    "size mismatch at {:?}: stored={}, computed={}",
                    handle,
                    node.size.to_usize(),
                    total
                ));
            }
            total
        }

        /// Validates the size-balance inequalities: neither child of a node
        /// may be smaller than either grandchild on the other side. Only
        /// meaningful for trees built by insertion alone, since removal
        /// deliberately skips rebalancing.
        pub(crate) fn validate_balance(&self) {
            let mut errors: Vec<String> = Vec::new();
            if let Some(root) = self.root {
                self.validate_balance_node(root, &mut errors);
            }
            assert!(errors.is_empty(), "Balance violations:\n{}", errors.join("\n"));
        }

        fn validate_balance_node(&self, handle: Handle, errors: &mut Vec<String>) {
            let node = self.node(handle);
            let left_size = self.subtree_size(node.left);
            let right_size = self.subtree_size(node.right);

            if let Some(left) = node.left {
                let left_node = self.node(left);
                if self.subtree_size(left_node.left) > right_size
                    || self.subtree_size(left_node.right) > right_size
                {
                    errors.push(alloc::format!("left grandchild outweighs right subtree at {:?}", handle));
                }
                self.validate_balance_node(left, errors);
            }
            if let Some(right) = node.right {
                let right_node = self.node(right);
                if self.subtree_size(right_node.left) > left_size
                    || self.subtree_size(right_node.right) > left_size
                {
                    errors.push(alloc::format!("right grandchild outweighs left subtree at {:?}", handle));
                }
                self.validate_balance_node(right, errors);
            }
        }

        /// Returns the height of the tree in nodes; 0 for an empty tree.
        pub(crate) fn height(&self) -> usize {
            let Some(root) = self.root else { return 0 };
            let mut max_depth = 0;
            let mut stack = alloc::vec![(root, 1)];

            while let Some((handle, depth)) = stack.pop() {
                max_depth = max_depth.max(depth);
                let node = self.node(handle);
                if let Some(left) = node.left {
                    stack.push((left, depth + 1));
                }
                if let Some(right) = node.right {
                    stack.push((right, depth + 1));
                }
            }
            max_depth
        }
    }

    // Test operations enum for property testing
    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0i32..1000).prop_map(Op::Insert),
            1 => (0i32..1000).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn tree_invariants_maintained_after_operations(ops in prop::collection::vec(op_strategy(), 0..500)) {
            let mut tree: RawSbTreeMap<i32, i32> = RawSbTreeMap::new();

            for op in ops {
                match op {
                    Op::Insert(key) => {
                        tree.insert(key, key * 2);
                    }
                    Op::Remove(key) => {
                        tree.remove_entry(&key);
                    }
                }
                tree.validate_invariants();
            }
        }

        #[test]
        fn balance_restored_after_every_insert(keys in prop::collection::vec(0i32..1000, 0..500)) {
            let mut tree: RawSbTreeMap<i32, i32> = RawSbTreeMap::new();

            for key in keys {
                tree.insert(key, key);
                tree.validate_balance();
            }
            tree.validate_invariants();
        }

        #[test]
        fn select_correctness(keys in prop::collection::vec(0i32..500, 1..200)) {
            let mut tree: RawSbTreeMap<i32, i32> = RawSbTreeMap::new();
            let mut expected: Vec<i32> = Vec::new();

            for key in keys {
                if tree.insert(key, key * 2).1 {
                    expected.push(key);
                }
            }
            expected.sort();

            tree.validate_invariants();

            // Ranks are 1-based: rank 1 is the smallest key.
            for (index, &expected_key) in expected.iter().enumerate() {
                let rank = index + 1;
                let handle = tree.select(rank);
                prop_assert!(handle.is_some(), "select({}) returned None", rank);
                let (key, value) = tree.key_value(handle.unwrap());
                prop_assert_eq!(*key, expected_key, "select({}) returned wrong key", rank);
                prop_assert_eq!(*value, expected_key * 2, "select({}) returned wrong value", rank);
            }

            // Rank 0 and ranks past the end do not exist.
            prop_assert!(tree.select(0).is_none());
            prop_assert!(tree.select(expected.len() + 1).is_none());
        }

        #[test]
        fn rank_of_correctness(keys in prop::collection::vec(0i32..500, 1..200)) {
            let mut tree: RawSbTreeMap<i32, i32> = RawSbTreeMap::new();
            let mut expected: Vec<i32> = Vec::new();

            for key in keys {
                if tree.insert(key, key * 2).1 {
                    expected.push(key);
                }
            }
            expected.sort();

            tree.validate_invariants();

            for (index, &key) in expected.iter().enumerate() {
                let result = tree.rank_of(&key);
                prop_assert_eq!(result, Some(index + 1), "rank_of({}) returned wrong rank", key);
            }

            // Test non-existent key
            let max_key = expected.iter().max().copied().unwrap_or(0);
            prop_assert!(tree.rank_of(&(max_key + 1)).is_none());
        }

        #[test]
        fn rank_select_roundtrip(keys in prop::collection::vec(0i32..500, 1..200)) {
            let mut tree: RawSbTreeMap<i32, i32> = RawSbTreeMap::new();

            for key in keys {
                tree.insert(key, key * 2);
            }
            tree.validate_invariants();

            // For every node, rank_of(key) must give a rank that selects the
            // very same node back.
            let mut current = tree.first();
            while let Some(handle) = current {
                let key = tree.node(handle).key;
                let rank = tree.rank_of(&key).expect("rank_of should succeed for existing key");
                prop_assert_eq!(tree.select(rank), Some(handle), "rank roundtrip failed for key {}", key);
                current = tree.successor(handle);
            }
        }

        #[test]
        fn boundary_rank_operations(count in 1usize..100) {
            let mut tree: RawSbTreeMap<i32, i32> = RawSbTreeMap::new();

            for i in 0..count as i32 {
                tree.insert(i, i * 2);
            }

            tree.validate_invariants();

            // Rank 1 selects the first element.
            let (first_key, first_value) = tree.key_value(tree.select(1).expect("select(1) should succeed"));
            prop_assert_eq!(*first_key, 0, "First key should be 0");
            prop_assert_eq!(*first_value, 0, "First value should be 0");

            // Rank len selects the last element.
            let (last_key, last_value) = tree.key_value(tree.select(count).expect("select(len) should succeed"));
            prop_assert_eq!(*last_key, (count - 1) as i32, "Last key should be count-1");
            prop_assert_eq!(*last_value, ((count - 1) * 2) as i32, "Last value should be (count-1)*2");

            // Rank 0 and out-of-range ranks do not exist.
            prop_assert!(tree.select(0).is_none(), "select(0) should be None");
            prop_assert!(tree.select(count + 1).is_none(), "select(len+1) should be None");
            prop_assert!(tree.select(count + 100).is_none(), "select(len+100) should be None");
        }

        #[test]
        fn interleaved_rank_and_mutations(ops in prop::collection::vec(op_strategy(), 0..300)) {
            let mut tree: RawSbTreeMap<i32, i32> = RawSbTreeMap::new();
            let mut expected: alloc::collections::BTreeMap<i32, i32> = alloc::collections::BTreeMap::new();

            for op in ops {
                match op {
                    Op::Insert(key) => {
                        tree.insert(key, key * 2);
                        expected.entry(key).or_insert(key * 2);
                    }
                    Op::Remove(key) => {
                        tree.remove_entry(&key);
                        expected.remove(&key);
                    }
                }

                tree.validate_invariants();

                // After each operation, verify rank operations are consistent
                if !expected.is_empty() {
                    let expected_keys: Vec<_> = expected.keys().copied().collect();

                    for rank in [1, expected.len() / 2 + 1, expected.len()] {
                        let (key, _) = tree.key_value(tree.select(rank).expect("select should succeed"));
                        prop_assert_eq!(*key, expected_keys[rank - 1], "Key at rank {} mismatch", rank);
                    }
                }
            }
        }

        #[test]
        fn height_stays_logarithmic(keys in prop::collection::vec(any::<i32>(), 1..500)) {
            let mut tree: RawSbTreeMap<i32, i32> = RawSbTreeMap::new();

            for key in keys {
                tree.insert(key, key);
            }

            // A size-balanced tree built by insertion alone has height at
            // most about log2(n) * 1.44; double the ceiling is a safe bound.
            let bound = 2 * (tree.len().ilog2() as usize + 1);
            prop_assert!(
                tree.height() <= bound,
                "height {} exceeds bound {} for {} keys",
                tree.height(),
                bound,
                tree.len()
            );
        }
    }

    #[test]
    fn empty_tree_rank_operations() {
        let tree: RawSbTreeMap<i32, i32> = RawSbTreeMap::new();
        tree.validate_invariants();

        assert!(tree.select(0).is_none());
        assert!(tree.select(1).is_none());
        assert!(tree.select(100).is_none());
        assert!(tree.rank_of(&0).is_none());
    }

    #[test]
    fn single_element_rank_operations() {
        let mut tree: RawSbTreeMap<i32, i32> = RawSbTreeMap::new();
        tree.insert(42, 84);
        tree.validate_invariants();

        let (key, value) = tree.key_value(tree.select(1).expect("should have rank 1"));
        assert_eq!(*key, 42);
        assert_eq!(*value, 84);
        assert!(tree.select(0).is_none());
        assert!(tree.select(2).is_none());

        assert_eq!(tree.rank_of(&42), Some(1));
        assert!(tree.rank_of(&0).is_none());
        assert!(tree.rank_of(&100).is_none());
    }

    #[test]
    fn duplicate_insert_keeps_first_mapping() {
        let mut tree: RawSbTreeMap<i32, &str> = RawSbTreeMap::new();

        let (first, inserted) = tree.insert(5, "first");
        assert!(inserted);

        let (second, inserted) = tree.insert(5, "second");
        assert!(!inserted);
        assert_eq!(first, second);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get(&5), Some(&"first"));

        tree.validate_invariants();
    }

    #[test]
    fn erase_leaf_node() {
        let mut tree: RawSbTreeMap<i32, i32> = RawSbTreeMap::new();
        for key in [5, 3, 8, 1, 4] {
            tree.insert(key, key * 10);
        }

        let handle = tree.search(&4).expect("key 4 should exist");
        assert_eq!(tree.erase(handle), (4, 40));
        assert_eq!(tree.len(), 4);
        assert!(!tree.contains_key(&4));
        tree.validate_invariants();
    }

    #[test]
    fn erase_node_with_one_child() {
        let mut tree: RawSbTreeMap<i32, i32> = RawSbTreeMap::new();
        for key in [5, 3, 8, 1] {
            tree.insert(key, key * 10);
        }

        // 3 has a single (left) child, 1.
        let handle = tree.search(&3).expect("key 3 should exist");
        assert_eq!(tree.erase(handle), (3, 30));
        assert_eq!(tree.len(), 3);
        assert!(tree.contains_key(&1));
        tree.validate_invariants();
    }

    #[test]
    fn erase_node_with_two_children_adjacent_predecessor() {
        let mut tree: RawSbTreeMap<i32, i32> = RawSbTreeMap::new();
        for key in [5, 3, 8, 7, 9] {
            tree.insert(key, key * 10);
        }

        // 8's predecessor is its own left child, 7.
        let handle = tree.search(&8).expect("key 8 should exist");
        assert_eq!(tree.erase(handle), (8, 80));
        assert_eq!(tree.len(), 4);
        for key in [3, 5, 7, 9] {
            assert!(tree.contains_key(&key));
        }
        tree.validate_invariants();
    }

    #[test]
    fn erase_node_with_two_children_deep_predecessor() {
        let mut tree: RawSbTreeMap<i32, i32> = RawSbTreeMap::new();
        for key in [50, 20, 80, 10, 30, 70, 90, 25, 35] {
            tree.insert(key, key);
        }

        // 50's predecessor is 35, deep in the left subtree.
        let handle = tree.search(&50).expect("key 50 should exist");
        assert_eq!(tree.erase(handle), (50, 50));
        assert_eq!(tree.len(), 8);
        assert_eq!(tree.rank_of(&35), Some(5));
        tree.validate_invariants();
    }

    #[test]
    fn erase_node_whose_predecessor_has_a_left_child() {
        let mut tree: RawSbTreeMap<i32, i32> = RawSbTreeMap::new();
        for key in [40, 20, 60, 10, 30, 50, 70, 25] {
            tree.insert(key, key * 10);
        }

        // 40's predecessor is 30, which still holds a left child, 25; the
        // child is spliced up before 30 relocates into 40's position.
        let handle = tree.search(&40).expect("key 40 should exist");
        assert_eq!(tree.erase(handle), (40, 400));
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.rank_of(&25), Some(3));
        assert_eq!(tree.rank_of(&30), Some(4));
        tree.validate_invariants();
    }

    #[test]
    fn erase_last_node_empties_tree() {
        let mut tree: RawSbTreeMap<i32, i32> = RawSbTreeMap::new();
        let (handle, _) = tree.insert(1, 1);

        assert_eq!(tree.erase(handle), (1, 1));
        assert_eq!(tree.len(), 0);
        assert!(tree.first().is_none());
        tree.validate_invariants();

        // The tree is reusable afterwards.
        tree.insert(2, 2);
        assert_eq!(tree.len(), 1);
        tree.validate_invariants();
    }

    #[test]
    fn stale_node_ref_after_erase() {
        let mut tree: RawSbTreeMap<i32, i32> = RawSbTreeMap::new();
        for key in [5, 3, 8] {
            tree.insert(key, key);
        }

        let handle = tree.search(&3).expect("key 3 should exist");
        let node_ref = tree.node_ref(handle);
        assert_eq!(tree.resolve(node_ref), Some(handle));

        tree.erase(handle);
        assert_eq!(tree.resolve(node_ref), None);

        // The freed slot is reused by the next insertion; the stale
        // reference still must not resolve.
        tree.insert(4, 4);
        assert_eq!(tree.resolve(node_ref), None);
    }

    #[test]
    fn stale_node_ref_after_clear() {
        let mut tree: RawSbTreeMap<i32, i32> = RawSbTreeMap::new();
        for key in [5, 3, 8] {
            tree.insert(key, key);
        }

        let node_ref = tree.node_ref(tree.search(&5).expect("key 5 should exist"));
        tree.clear();
        tree.validate_invariants();
        assert_eq!(tree.resolve(node_ref), None);

        tree.insert(5, 5);
        assert_eq!(tree.resolve(node_ref), None);
    }

    #[test]
    fn handles_stable_across_rebalancing() {
        let mut tree: RawSbTreeMap<i32, i32> = RawSbTreeMap::new();
        let (handle, _) = tree.insert(0, 0);

        // Plenty of rotations happen while the tree grows; the handle must
        // keep pointing at the same mapping throughout.
        for key in 1..100 {
            tree.insert(key, key);
            assert_eq!(*tree.key_value(handle).0, 0);
        }
        tree.validate_invariants();
    }

    #[test]
    fn clone_is_independent() {
        let mut tree: RawSbTreeMap<i32, i32> = RawSbTreeMap::new();
        for key in 0..50 {
            tree.insert(key, key * 2);
        }

        let copy = tree.clone();
        copy.validate_invariants();

        tree.remove_entry(&25);
        *tree.get_mut(&10).expect("key 10 should exist") = -1;

        assert_eq!(copy.len(), 50);
        assert_eq!(copy.get(&25), Some(&50));
        assert_eq!(copy.get(&10), Some(&20));
        assert_eq!(tree.get(&10), Some(&-1));
        copy.validate_invariants();
        tree.validate_invariants();
    }

    #[test]
    fn drain_to_vec_returns_sorted_pairs() {
        let mut tree: RawSbTreeMap<i32, i32> = RawSbTreeMap::new();
        for key in [5, 3, 8, 1, 4, 7, 9] {
            tree.insert(key, key * 10);
        }

        let drained = tree.drain_to_vec();
        assert_eq!(drained, alloc::vec![(1, 10), (3, 30), (4, 40), (5, 50), (7, 70), (8, 80), (9, 90)]);
        assert_eq!(tree.len(), 0);
        tree.validate_invariants();

        tree.insert(2, 20);
        assert_eq!(tree.get(&2), Some(&20));
        tree.validate_invariants();
    }

    #[test]
    fn successor_predecessor_walk() {
        let mut tree: RawSbTreeMap<i32, i32> = RawSbTreeMap::new();
        for key in [5, 3, 8, 1, 4, 7, 9] {
            tree.insert(key, key);
        }

        let mut keys = Vec::new();
        let mut current = tree.first();
        while let Some(handle) = current {
            keys.push(tree.node(handle).key);
            current = tree.successor(handle);
        }
        assert_eq!(keys, alloc::vec![1, 3, 4, 5, 7, 8, 9]);

        keys.clear();
        let mut current = tree.last();
        while let Some(handle) = current {
            keys.push(tree.node(handle).key);
            current = tree.predecessor(handle);
        }
        assert_eq!(keys, alloc::vec![9, 8, 7, 5, 4, 3, 1]);
    }

    #[test]
    fn sequential_insert_height_bound() {
        let mut tree: RawSbTreeMap<i32, i32> = RawSbTreeMap::new();
        for key in 1..=100 {
            tree.insert(key, key);
        }

        tree.validate_invariants();
        tree.validate_balance();
        assert!(tree.height() <= 2 * (100usize.ilog2() as usize + 1));
    }
}
