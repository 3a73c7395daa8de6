use super::handle::Handle;

/// A subtree node count. Backed by a [`Handle`] so that `Size::MAX` equals
/// `Handle::MAX` (the tree can never hold more nodes than the arena can
/// address) and `Option<Size>` stays niche-optimized.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Size(Handle);

impl Size {
    pub(crate) const MAX: usize = Handle::MAX;
    pub(crate) const ONE: Self = Self::from_usize(1);

    #[inline]
    pub(crate) const fn from_usize(size: usize) -> Self {
        assert!(size <= Self::MAX, "`Size::from_usize()` - `size` > `Size::MAX`!");
        Self(Handle::from_index(size))
    }

    #[inline]
    pub(crate) const fn to_usize(self) -> usize {
        self.0.to_index()
    }

    /// The size after the subtree gains one node.
    #[inline]
    #[must_use]
    pub(crate) const fn increment(self) -> Self {
        Self::from_usize(self.to_usize() + 1)
    }

    /// The size after the subtree loses one node. Only meaningful for a
    /// non-empty subtree.
    #[inline]
    #[must_use]
    pub(crate) const fn decrement(self) -> Self {
        Self::from_usize(self.to_usize() - 1)
    }
}
