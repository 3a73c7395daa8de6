use super::handle::Handle;
use super::size::Size;

/// A node of the size-balanced tree. Values live in their own arena; the node
/// stores a handle to its value so that node surgery never moves values.
pub(crate) struct Node<K> {
    pub(crate) key: K,
    pub(crate) value: Handle,
    pub(crate) parent: Option<Handle>,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    // The number of key/value pairs in the subtree rooted at this node.
    pub(crate) size: Size,
}

impl<K> Node<K> {
    /// Creates a new childless node, ready to be attached under `parent`.
    pub(crate) fn new(key: K, value: Handle, parent: Option<Handle>) -> Self {
        Self {
            key,
            value,
            parent,
            left: None,
            right: None,
            size: Size::ONE,
        }
    }
}

