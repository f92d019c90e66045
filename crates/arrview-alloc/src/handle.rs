//! Owning array handles.
//!
//! An [`ArrayHandle`] is what the factory functions return: the same
//! `(pointer, size)` pair as a view, but by convention the one value that
//! must eventually be passed to a matching `dispose*` function. It has no
//! `Drop` impl. Letting a live handle go out of scope leaks its block.
//!
//! A handle borrows the allocator that produced it for `'a`, so the
//! allocator cannot be reset, mutated, or dropped while the handle is in
//! use. Handles from [`Global`] are `'static`.

use std::fmt;
use std::marker::PhantomData;
use std::ptr::{self, NonNull};

use arrview_core::{Array, ArrayMut, SENTINEL};

use crate::bulk::Global;

/// Owning `(pointer, size)` handle for an allocated array.
///
/// The `A` parameter records which kind of allocator produced the block:
/// [`Global`] for the default factories, the custom allocator type for the
/// `*_with` and `*_in` factories. Only a handle of matching type can be
/// passed to the matching `dispose*` function. The `'a` lifetime is the
/// shared borrow of that allocator taken by the factory.
///
/// The size of a handle never changes after allocation, since the
/// allocator may need it to release the block. Shorten a
/// [`view`](ArrayHandle::view) instead.
///
/// A slab cannot be reset while one of its handles is still used:
///
/// ```compile_fail
/// use arrview_alloc::{copy_range_in, Slab};
///
/// let mut slab = Slab::with_quantum(8).unwrap();
/// let h = copy_range_in(&[1u64, 2], &slab).unwrap();
/// slab.reset();
/// assert_eq!(h.view().len(), 2);
/// ```
#[must_use = "an ArrayHandle must be disposed explicitly or its memory leaks"]
#[repr(C)]
pub struct ArrayHandle<'a, T, A = Global> {
    ptr: *mut T,
    size: usize,
    _alloc: PhantomData<&'a A>,
}

// SAFETY: a handle uniquely owns its elements, like `Box<[T]>`, and only
// reaches its allocator through a shared reference.
unsafe impl<T: Send, A: Sync> Send for ArrayHandle<'_, T, A> {}
// SAFETY: shared access only hands out `&T`.
unsafe impl<T: Sync, A: Sync> Sync for ArrayHandle<'_, T, A> {}

impl<T, A> ArrayHandle<'_, T, A> {
    /// The null handle. Disposing it is a no-op.
    pub const NULL: Self = Self {
        ptr: ptr::null_mut(),
        size: SENTINEL,
        _alloc: PhantomData,
    };

    /// Adopt an allocated, fully initialised block.
    ///
    /// # Safety
    ///
    /// `ptr` must hold `size` initialised elements in a block obtained from
    /// an allocator of kind `A` with exactly `size` elements, nothing else
    /// may own that block, and the block must stay allocated for `'a`.
    pub unsafe fn from_raw_parts(ptr: NonNull<T>, size: usize) -> Self {
        debug_assert!(size != SENTINEL, "sentinel size for allocated block");
        Self {
            ptr: ptr.as_ptr(),
            size,
            _alloc: PhantomData,
        }
    }

    /// Whether this handle is null (never allocated, or already disposed).
    pub const fn is_null(&self) -> bool {
        self.size == SENTINEL
    }

    /// Number of elements, [`SENTINEL`] when null.
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Whether the handle is non-null with zero elements.
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Address of the first element.
    pub const fn as_ptr(&self) -> *const T {
        self.ptr.cast_const()
    }

    /// Mutable address of the first element.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr
    }

    /// Borrow the elements as a read-only view.
    pub fn view(&self) -> Array<'_, T> {
        // SAFETY: a non-null handle owns `size` initialised elements; a null
        // handle carries the sentinel size and is never read through.
        unsafe { Array::from_raw_parts(self.ptr.cast_const(), self.size) }
    }

    /// Borrow the elements as a writable view.
    pub fn view_mut(&mut self) -> ArrayMut<'_, T> {
        // SAFETY: as in `view`, and `&mut self` makes the access exclusive.
        unsafe { ArrayMut::from_raw_parts(self.ptr, self.size) }
    }

    /// Split into pointer and size without releasing anything.
    pub fn into_raw_parts(self) -> (*mut T, usize) {
        (self.ptr, self.size)
    }

    /// Reset to null, returning the block if there was one.
    pub(crate) fn take(&mut self) -> Option<(NonNull<T>, usize)> {
        if self.is_null() {
            return None;
        }
        let ptr = NonNull::new(self.ptr)?;
        let size = self.size;
        *self = Self::NULL;
        Some((ptr, size))
    }
}

impl<T, A> Default for ArrayHandle<'_, T, A> {
    fn default() -> Self {
        Self::NULL
    }
}

impl<T: fmt::Debug, A> fmt::Debug for ArrayHandle<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ArrayHandle").field(&self.view()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_handle_views_as_null() {
        let h: ArrayHandle<'_, u32> = ArrayHandle::NULL;
        assert!(h.is_null());
        assert!(h.view().is_null());
        assert_eq!(format!("{h:?}"), "ArrayHandle(null)");
    }

    #[test]
    fn take_resets_to_null() {
        let mut data = [1u8, 2];
        // SAFETY: the handle is only inspected and taken, never disposed.
        let mut h: ArrayHandle<'_, u8> =
            unsafe { ArrayHandle::from_raw_parts(NonNull::from(&mut data).cast(), 2) };
        assert_eq!(h.view().as_slice(), Some(&[1, 2][..]));
        let (ptr, size) = h.take().unwrap();
        assert_eq!(size, 2);
        assert_eq!(ptr.as_ptr(), data.as_mut_ptr());
        assert!(h.is_null());
        assert!(h.take().is_none());
    }

    #[test]
    fn view_mut_writes_through() {
        let mut data = [0i16; 3];
        // SAFETY: as above; the handle never reaches a disposal function.
        let mut h: ArrayHandle<'_, i16> =
            unsafe { ArrayHandle::from_raw_parts(NonNull::from(&mut data).cast(), 3) };
        let mut v = h.view_mut();
        v[1] = 5;
        let (_, size) = h.into_raw_parts();
        assert_eq!(size, 3);
        assert_eq!(data, [0, 5, 0]);
    }
}
