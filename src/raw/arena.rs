use alloc::vec::Vec;

use super::handle::{Generation, Handle, NodeRef};

/// One arena slot: the element (if occupied) plus the slot's reuse counter.
struct Slot<T> {
    generation: Generation,
    element: Option<T>,
}

/// A slab allocator with a free list and per-slot generations. Handles are
/// stable for the lifetime of the element they were allocated for;
/// generation-stamped [`NodeRef`]s can additionally detect that a slot was
/// vacated (and possibly reused) since the reference was issued.
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(h) = self.free.pop() {
            // Reuse a free slot/handle; the generation was bumped when the
            // slot was vacated, so stale references cannot resolve to the
            // new element.
            self.slots[h.to_index()].element = Some(element);
            h
        } else {
            // Use strict less-than to ensure total element count doesn't exceed Size::MAX.
            // Size::MAX == Handle::MAX, so we need slots.len() < Handle::MAX before push,
            // which means at most Handle::MAX elements after push.
            assert!(
                self.slots.len() < Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX
            );
            // Allocate a new slot/handle.
            self.slots.push(Slot {
                generation: Generation::FIRST,
                element: Some(element),
            });
            Handle::from_index(self.slots.len() - 1)
        }
    }

    /// Stamps `handle` with its slot's current generation.
    #[inline]
    pub(crate) fn node_ref(&self, handle: Handle) -> NodeRef {
        NodeRef {
            handle,
            generation: self.slots[handle.to_index()].generation,
        }
    }

    /// Resolves a stamped reference back to a handle, or `None` if the slot
    /// has been vacated since the reference was issued.
    pub(crate) fn resolve(&self, node: NodeRef) -> Option<Handle> {
        let slot = self.slots.get(node.handle.to_index())?;
        if slot.generation == node.generation && slot.element.is_some() {
            Some(node.handle)
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].element.as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    /// Returns a reference to an element by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `Arena<T>`.
    #[inline]
    pub(crate) unsafe fn get_ptr<'a>(ptr: *const Self, handle: Handle) -> &'a T {
        // SAFETY: Caller guarantees ptr is valid. We only read from the slots field.
        // The explicit reference is intentional to index into the Vec.
        unsafe {
            (&(*ptr).slots)[handle.to_index()].element.as_ref().expect("`Arena::get_ptr()` - `handle` is invalid!")
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].element.as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Returns a mutable reference to an element by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `Arena<T>`.
    /// - No other reference to the element at `handle` may be live.
    #[inline]
    pub(crate) unsafe fn get_mut_ptr<'a>(ptr: *mut Self, handle: Handle) -> &'a mut T {
        // SAFETY: Caller guarantees ptr validity and exclusivity for this slot.
        // The element is reached through the buffer pointer rather than a
        // reborrow of the whole Vec, so references previously handed out for
        // other slots remain valid.
        unsafe {
            let slot = (*ptr).slots.as_mut_ptr().add(handle.to_index());
            (*slot).element.as_mut().expect("`Arena::get_mut_ptr()` - `handle` is invalid!")
        }
    }

    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let slot = &mut self.slots[handle.to_index()];
        let element = slot.element.take().expect("`Arena::take()` - `handle` is invalid!");
        slot.generation = slot.generation.bump();
        self.free.push(handle);
        element
    }

    /// Vacates every occupied slot, bumping its generation. References issued
    /// before the clear can therefore never resolve against elements
    /// allocated after it. Slot storage is retained for reuse.
    pub(crate) fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.element.take().is_some() {
                slot.generation = slot.generation.bump();
                self.free.push(Handle::from_index(index));
            }
        }
    }
}
