//! Opt-in release-on-drop wrapper for call sites that want owning semantics.

use std::mem;

use arrview_core::{Array, ArrayMut};

use crate::bulk::{BulkAllocator, Global};
use crate::factory::dispose_with;
use crate::handle::ArrayHandle;

static GLOBAL: Global = Global;

/// An [`ArrayHandle`] paired with the allocator that releases it when the
/// guard is dropped.
///
/// ```
/// use arrview_alloc::{copy_range, Scoped};
///
/// let scoped = Scoped::new(copy_range(&[1, 2, 3]));
/// assert_eq!(scoped.view().len(), 3);
/// // released here
/// ```
#[must_use]
pub struct Scoped<'a, T, A: BulkAllocator = Global> {
    handle: ArrayHandle<'a, T, A>,
    alloc: &'a A,
}

impl<'a, T> Scoped<'a, T, Global> {
    /// Take ownership of a default-allocator handle.
    pub fn new(handle: ArrayHandle<'a, T>) -> Self {
        Self {
            handle,
            alloc: &GLOBAL,
        }
    }
}

impl<'a, T, A: BulkAllocator> Scoped<'a, T, A> {
    /// Take ownership of a handle produced by `alloc`.
    ///
    /// # Safety
    ///
    /// `handle` must be null or have been allocated by `alloc`.
    pub unsafe fn from_parts(handle: ArrayHandle<'a, T, A>, alloc: &'a A) -> Self {
        Self { handle, alloc }
    }

    /// Number of elements, the sentinel when null.
    pub fn len(&self) -> usize {
        self.handle.len()
    }

    /// Whether the guarded array is non-null with zero elements.
    pub fn is_empty(&self) -> bool {
        self.handle.is_empty()
    }

    /// Read-only view of the guarded elements.
    pub fn view(&self) -> Array<'_, T> {
        self.handle.view()
    }

    /// Writable view of the guarded elements.
    pub fn view_mut(&mut self) -> ArrayMut<'_, T> {
        self.handle.view_mut()
    }

    /// The allocator that will release the array.
    pub fn allocator(&self) -> &'a A {
        self.alloc
    }

    /// Stop guarding: hand back the handle undisposed.
    pub fn release(mut self) -> ArrayHandle<'a, T, A> {
        mem::take(&mut self.handle)
    }
}

impl<T, A: BulkAllocator> Drop for Scoped<'_, T, A> {
    fn drop(&mut self) {
        // SAFETY: construction guarantees `handle` came from `alloc`.
        unsafe { dispose_with(&mut self.handle, self.alloc) }
    }
}

impl<'a, T> ArrayHandle<'a, T, Global> {
    /// Guard this handle so it is disposed when the guard goes out of scope.
    pub fn scoped(self) -> Scoped<'a, T> {
        Scoped::new(self)
    }
}
