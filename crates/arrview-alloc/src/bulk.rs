//! Element-count allocators.
//!
//! A [`BulkAllocator`] hands out uninitialised storage for `count` elements
//! of a type and takes it back given the same count. [`Global`] is the
//! default, backed by the process allocator.

use std::alloc::{alloc, dealloc, handle_alloc_error, Layout};
use std::mem::size_of;
use std::ptr::NonNull;

/// Allocator addressed in whole elements.
///
/// The element count passed to [`free`](BulkAllocator::free) must be the
/// one used to allocate the block; implementations may rely on it as
/// disposal metadata.
pub trait BulkAllocator {
    /// Uninitialised storage for `count` elements of `T`.
    ///
    /// Zero-sized requests return a dangling, well-aligned pointer.
    fn alloc<T>(&self, count: usize) -> NonNull<T>;

    /// Return a block obtained from [`alloc`](BulkAllocator::alloc).
    ///
    /// # Safety
    ///
    /// `ptr` must come from `self.alloc::<T>(count)` with the same `count`
    /// and must not have been freed already. Elements are not dropped.
    unsafe fn free<T>(&self, ptr: NonNull<T>, count: usize);
}

impl<A: BulkAllocator> BulkAllocator for &A {
    fn alloc<T>(&self, count: usize) -> NonNull<T> {
        (**self).alloc(count)
    }

    unsafe fn free<T>(&self, ptr: NonNull<T>, count: usize) {
        // SAFETY: forwarded from the caller.
        unsafe { (**self).free(ptr, count) }
    }
}

/// The process-wide allocator.
///
/// Stateless: any `Global` can free what any other `Global` allocated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Global;

/// Layout of `[T; count]`.
///
/// # Panics
///
/// Panics with "capacity overflow" when the array would exceed
/// `isize::MAX` bytes.
pub fn array_layout<T>(count: usize) -> Layout {
    match Layout::array::<T>(count) {
        Ok(layout) => layout,
        Err(_) => panic!(
            "capacity overflow: {count} elements of {} bytes",
            size_of::<T>()
        ),
    }
}

impl BulkAllocator for Global {
    fn alloc<T>(&self, count: usize) -> NonNull<T> {
        let layout = array_layout::<T>(count);
        if layout.size() == 0 {
            return NonNull::dangling();
        }
        // SAFETY: the layout has a non-zero size.
        let raw = unsafe { alloc(layout) };
        match NonNull::new(raw.cast::<T>()) {
            Some(ptr) => ptr,
            None => handle_alloc_error(layout),
        }
    }

    unsafe fn free<T>(&self, ptr: NonNull<T>, count: usize) {
        let layout = array_layout::<T>(count);
        if layout.size() == 0 {
            return;
        }
        // SAFETY: the caller guarantees `ptr` came from `alloc` with this
        // same layout.
        unsafe { dealloc(ptr.as_ptr().cast::<u8>(), layout) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_and_free_round_trip() {
        let ptr = Global.alloc::<u64>(8);
        assert_eq!(ptr.as_ptr() as usize % std::mem::align_of::<u64>(), 0);
        // SAFETY: all 8 slots belong to this block.
        unsafe {
            for i in 0..8 {
                ptr.as_ptr().add(i).write(i as u64);
            }
            assert_eq!(ptr.as_ptr().add(7).read(), 7);
            Global.free(ptr, 8);
        }
    }

    #[test]
    fn zero_count_is_dangling() {
        let ptr = Global.alloc::<u32>(0);
        assert_eq!(ptr, NonNull::dangling());
        // SAFETY: zero-sized blocks are never deallocated.
        unsafe { Global.free(ptr, 0) };
    }

    #[test]
    fn zero_sized_type_is_dangling() {
        let ptr = Global.alloc::<()>(1000);
        assert_eq!(ptr, NonNull::dangling());
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn huge_layout_panics() {
        let _ = array_layout::<u64>(usize::MAX / 4);
    }

    #[test]
    fn reference_forwards_to_allocator() {
        let a = &Global;
        let ptr = a.alloc::<u8>(3);
        // SAFETY: allocated just above with the same count.
        unsafe { a.free(ptr, 3) };
    }
}
