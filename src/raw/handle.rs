use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

#[cfg(test)]
type RawGeneration = u16;
#[cfg(not(test))]
type RawGeneration = u32;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        // SAFETY: `index + 1` cannot be zero and cannot overflow.
        #[allow(clippy::cast_possible_truncation)]
        Self(NonZero::new((index + 1) as RawHandle).unwrap())
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

/// A per-slot reuse counter. Bumped every time a slot is vacated, so a
/// `NodeRef` stamped with an old generation can be detected instead of
/// resolving to whatever now occupies the slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Generation(RawGeneration);

impl Generation {
    pub(crate) const FIRST: Self = Self(0);

    #[inline]
    #[must_use]
    pub(crate) const fn bump(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// A generation-stamped reference to an arena slot. Unlike a bare [`Handle`],
/// a `NodeRef` can outlive the element it refers to and still be validated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct NodeRef {
    pub(crate) handle: Handle,
    pub(crate) generation: Generation,
}
