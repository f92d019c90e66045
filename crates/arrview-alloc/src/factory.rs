//! Allocate-and-construct and dispose operations.
//!
//! Three families, one per allocator discipline:
//!
//! | Allocator | Construct | Release |
//! |-----------|-----------|---------|
//! | [`Global`] | [`alloc_default`], [`alloc_fill`], [`copy_range`], [`copy_ptr_range`], [`copy_from`] | [`dispose`] |
//! | any [`BulkAllocator`] | [`alloc_default_with`], [`alloc_fill_with`], [`copy_range_with`], [`copy_ptr_range_with`], [`copy_from_with`] | [`dispose_with`] |
//! | any [`SlabAllocator`] | [`alloc_fill_in`], [`copy_range_in`], [`copy_ptr_range_in`], [`copy_from_in`] | [`dispose_in`] |
//!
//! Every constructor returns an [`ArrayHandle`] that stays live until it is
//! passed to the matching release function. The handle borrows the
//! allocator it came from, so that allocator outlives it. Releasing drops every element
//! and resets the handle to null; releasing a null handle does nothing.
//!
//! If constructing an element panics, the elements built so far are dropped
//! and the block is handed back before the panic continues.

use std::mem::{self, align_of, size_of};
use std::ptr::{self, NonNull};

use arrview_core::SENTINEL;
use tracing::trace;

use crate::bulk::{BulkAllocator, Global};
use crate::error::AllocError;
use crate::handle::ArrayHandle;
use crate::slab::{byte_size_for, SlabAllocator};

/// Drops the initialised prefix and releases the block if construction
/// unwinds.
struct InitGuard<T, F: FnOnce(NonNull<T>)> {
    ptr: NonNull<T>,
    written: usize,
    release: Option<F>,
}

impl<T, F: FnOnce(NonNull<T>)> Drop for InitGuard<T, F> {
    fn drop(&mut self) {
        // SAFETY: exactly the first `written` slots hold initialised values.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.ptr.as_ptr(),
                self.written,
            ));
        }
        if let Some(release) = self.release.take() {
            release(self.ptr);
        }
    }
}

/// Write `make(i)` into each of the `size` uninitialised slots at `ptr`.
fn init_each<T, F>(ptr: NonNull<T>, size: usize, mut make: impl FnMut(usize) -> T, release: F)
where
    F: FnOnce(NonNull<T>),
{
    let mut guard = InitGuard {
        ptr,
        written: 0,
        release: Some(release),
    };
    while guard.written < size {
        let value = make(guard.written);
        // SAFETY: slot `written` lies inside the block and is uninitialised.
        unsafe { ptr.as_ptr().add(guard.written).write(value) };
        guard.written += 1;
    }
    mem::forget(guard);
}

static GLOBAL: Global = Global;

fn check_size(size: usize) {
    assert!(
        size != SENTINEL,
        "array size {SENTINEL} is reserved for the null array"
    );
}

fn construct_with<'a, T, A: BulkAllocator>(
    size: usize,
    alloc: &'a A,
    make: impl FnMut(usize) -> T,
) -> ArrayHandle<'a, T, A> {
    check_size(size);
    let ptr = alloc.alloc::<T>(size);
    init_each(ptr, size, make, |p| {
        // SAFETY: `p` is the block just allocated with `size` elements.
        unsafe { alloc.free(p, size) }
    });
    trace!(count = size, elem_size = size_of::<T>(), "allocated array");
    // SAFETY: every slot of a `size`-element block from `alloc` is initialised.
    unsafe { ArrayHandle::from_raw_parts(ptr, size) }
}

fn construct_in<'s, T, S: SlabAllocator>(
    size: usize,
    slab: &'s S,
    make: impl FnMut(usize) -> T,
) -> Result<ArrayHandle<'s, T, S>, AllocError> {
    check_size(size);
    let quantum = slab.quantum();
    if align_of::<T>() > quantum {
        return Err(AllocError::Misaligned {
            align: align_of::<T>(),
            quantum,
        });
    }
    let bytes = byte_size_for::<T>(size, quantum)?;
    let ptr = if bytes == 0 {
        NonNull::dangling()
    } else {
        slab.alloc(bytes)?.cast::<T>()
    };
    debug_assert!(ptr.as_ptr().is_aligned(), "slab block misaligned for T");
    init_each(ptr, size, make, |p| {
        if bytes != 0 {
            // SAFETY: `p` is the block just reserved with `bytes` bytes.
            unsafe { slab.free(p.cast(), bytes) }
        }
    });
    trace!(
        count = size,
        elem_size = size_of::<T>(),
        bytes,
        quanta = bytes / quantum,
        "allocated array in slab"
    );
    // SAFETY: every slot is initialised and the block belongs to `slab`.
    Ok(unsafe { ArrayHandle::from_raw_parts(ptr, size) })
}

/// `size` default-constructed elements from the process allocator.
pub fn alloc_default<T: Default>(size: usize) -> ArrayHandle<'static, T> {
    alloc_default_with(size, &GLOBAL)
}

/// `size` clones of `value` from the process allocator.
///
/// ```
/// use arrview_alloc::{alloc_fill, dispose};
///
/// let mut h = alloc_fill(5, &b'x');
/// assert_eq!(h.view().as_slice(), Some(&b"xxxxx"[..]));
/// dispose(&mut h);
/// assert!(h.is_null());
/// ```
pub fn alloc_fill<T: Clone>(size: usize, value: &T) -> ArrayHandle<'static, T> {
    alloc_fill_with(size, value, &GLOBAL)
}

/// A copy of `src` from the process allocator.
pub fn copy_range<T: Clone>(src: &[T]) -> ArrayHandle<'static, T> {
    copy_range_with(src, &GLOBAL)
}

/// A copy of the elements in `[begin, end)` from the process allocator.
///
/// # Safety
///
/// `begin` and `end` must delimit initialised elements of one live
/// allocation, with `begin <= end`. `T` must not be zero-sized.
pub unsafe fn copy_ptr_range<T: Clone>(begin: *const T, end: *const T) -> ArrayHandle<'static, T> {
    // SAFETY: forwarded from the caller.
    unsafe { copy_ptr_range_with(begin, end, &GLOBAL) }
}

/// A copy of any contiguous container from the process allocator.
pub fn copy_from<T: Clone, C: AsRef<[T]> + ?Sized>(container: &C) -> ArrayHandle<'static, T> {
    copy_range(container.as_ref())
}

/// Drop every element, free the block, and reset `handle` to null.
///
/// Does nothing for a null handle.
pub fn dispose<T>(handle: &mut ArrayHandle<'_, T>) {
    // SAFETY: `Global` handles come from `Global`, and any `Global` frees
    // what another allocated.
    unsafe { dispose_with(handle, &GLOBAL) }
}

/// `size` default-constructed elements from `alloc`.
pub fn alloc_default_with<'a, T: Default, A: BulkAllocator>(
    size: usize,
    alloc: &'a A,
) -> ArrayHandle<'a, T, A> {
    construct_with(size, alloc, |_| T::default())
}

/// `size` clones of `value` from `alloc`.
pub fn alloc_fill_with<'a, T: Clone, A: BulkAllocator>(
    size: usize,
    value: &T,
    alloc: &'a A,
) -> ArrayHandle<'a, T, A> {
    construct_with(size, alloc, |_| value.clone())
}

/// A copy of `src` from `alloc`.
pub fn copy_range_with<'a, T: Clone, A: BulkAllocator>(
    src: &[T],
    alloc: &'a A,
) -> ArrayHandle<'a, T, A> {
    construct_with(src.len(), alloc, |i| src[i].clone())
}

/// A copy of the elements in `[begin, end)` from `alloc`.
///
/// # Safety
///
/// As for [`copy_ptr_range`].
pub unsafe fn copy_ptr_range_with<'a, T: Clone, A: BulkAllocator>(
    begin: *const T,
    end: *const T,
    alloc: &'a A,
) -> ArrayHandle<'a, T, A> {
    // SAFETY: forwarded from the caller.
    let src = unsafe { arrview_core::borrow_range(begin, end) };
    copy_range_with(src.as_slice().unwrap_or(&[]), alloc)
}

/// A copy of any contiguous container from `alloc`.
pub fn copy_from_with<'a, T: Clone, C: AsRef<[T]> + ?Sized, A: BulkAllocator>(
    container: &C,
    alloc: &'a A,
) -> ArrayHandle<'a, T, A> {
    copy_range_with(container.as_ref(), alloc)
}

/// Drop every element, return the block to `alloc`, and reset `handle` to
/// null. Does nothing for a null handle.
///
/// # Safety
///
/// A non-null `handle` must have been produced by this very `alloc`
/// instance (or one that can free its blocks), and no alias of the block
/// may be used afterwards.
pub unsafe fn dispose_with<T, A: BulkAllocator>(handle: &mut ArrayHandle<'_, T, A>, alloc: &A) {
    let Some((ptr, size)) = handle.take() else {
        return;
    };
    // SAFETY: the handle owned `size` initialised elements.
    unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(ptr.as_ptr(), size)) };
    // SAFETY: the caller guarantees `alloc` produced this `size`-element block.
    unsafe { alloc.free(ptr, size) };
    trace!(count = size, elem_size = size_of::<T>(), "disposed array");
}

/// `size` clones of `value` in `slab`.
pub fn alloc_fill_in<'s, T: Clone, S: SlabAllocator>(
    size: usize,
    value: &T,
    slab: &'s S,
) -> Result<ArrayHandle<'s, T, S>, AllocError> {
    construct_in(size, slab, |_| value.clone())
}

/// A copy of `src` in `slab`.
///
/// The request is `src.len() * size_of::<T>()` bytes rounded up to the
/// slab quantum. Fails if `T` is more strictly aligned than the quantum or
/// the slab is out of room.
pub fn copy_range_in<'s, T: Clone, S: SlabAllocator>(
    src: &[T],
    slab: &'s S,
) -> Result<ArrayHandle<'s, T, S>, AllocError> {
    construct_in(src.len(), slab, |i| src[i].clone())
}

/// A copy of the elements in `[begin, end)` in `slab`.
///
/// # Safety
///
/// As for [`copy_ptr_range`].
pub unsafe fn copy_ptr_range_in<'s, T: Clone, S: SlabAllocator>(
    begin: *const T,
    end: *const T,
    slab: &'s S,
) -> Result<ArrayHandle<'s, T, S>, AllocError> {
    // SAFETY: forwarded from the caller.
    let src = unsafe { arrview_core::borrow_range(begin, end) };
    copy_range_in(src.as_slice().unwrap_or(&[]), slab)
}

/// A copy of any contiguous container in `slab`.
pub fn copy_from_in<'s, T: Clone, C: AsRef<[T]> + ?Sized, S: SlabAllocator>(
    container: &C,
    slab: &'s S,
) -> Result<ArrayHandle<'s, T, S>, AllocError> {
    copy_range_in(container.as_ref(), slab)
}

/// Drop every element, give the block back to `slab`, and reset `handle`
/// to null. Does nothing for a null handle.
///
/// # Safety
///
/// A non-null `handle` must have been produced by this very `slab`.
pub unsafe fn dispose_in<T, S: SlabAllocator>(handle: &mut ArrayHandle<'_, T, S>, slab: &S) {
    let Some((ptr, size)) = handle.take() else {
        return;
    };
    // SAFETY: the handle owned `size` initialised elements.
    unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(ptr.as_ptr(), size)) };
    match byte_size_for::<T>(size, slab.quantum()) {
        Ok(0) | Err(_) => {}
        Ok(bytes) => {
            // SAFETY: the caller guarantees this block came from `slab` with
            // the size recomputed here.
            unsafe { slab.free(ptr.cast(), bytes) };
        }
    }
    trace!(count = size, elem_size = size_of::<T>(), "disposed slab array");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SlabConfig;
    use crate::slab::Slab;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone)]
    struct Tracked(Rc<Cell<usize>>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn fill_then_dispose() {
        let mut h = alloc_fill(5, &'x');
        assert_eq!(h.len(), 5);
        assert!(h.view().iter().all(|&c| c == 'x'));
        dispose(&mut h);
        assert!(h.is_null());
    }

    #[test]
    fn default_elements() {
        let mut h: ArrayHandle<'_, u64> = alloc_default(4);
        assert_eq!(h.view().as_slice(), Some(&[0u64; 4][..]));
        dispose(&mut h);
    }

    #[test]
    fn zero_sized_request_is_empty_not_null() {
        let mut h: ArrayHandle<'_, String> = alloc_default(0);
        assert!(!h.is_null());
        assert!(h.is_empty());
        dispose(&mut h);
        assert!(h.is_null());
    }

    #[test]
    fn dispose_of_null_is_noop() {
        let mut h: ArrayHandle<'_, String> = ArrayHandle::NULL;
        dispose(&mut h);
        dispose(&mut h);
        assert!(h.is_null());
    }

    #[test]
    fn copy_is_independent_of_source() {
        let mut src = vec![1, 2, 3];
        let mut h = copy_range(&src);
        src[0] = 100;
        assert_eq!(h.view().as_slice(), Some(&[1, 2, 3][..]));
        assert_ne!(h.as_ptr(), src.as_ptr());
        dispose(&mut h);
    }

    #[test]
    fn pointer_pair_copy() {
        let src = [4u16, 5, 6, 7];
        let r = src[1..].as_ptr_range();
        // SAFETY: both pointers come from `src`.
        let mut h = unsafe { copy_ptr_range(r.start, r.end) };
        assert_eq!(h.view().as_slice(), Some(&[5, 6, 7][..]));
        dispose(&mut h);
    }

    #[test]
    fn copy_from_container() {
        let words = vec!["a".to_string(), "b".to_string()];
        let mut h = copy_from(&words);
        assert_eq!(h.view()[1], "b");
        dispose(&mut h);
    }

    #[test]
    fn dispose_drops_every_element() {
        let drops = Rc::new(Cell::new(0));
        let mut h = alloc_fill(3, &Tracked(drops.clone()));
        // The template passed by reference was dropped at the end of the
        // statement above.
        assert_eq!(drops.get(), 1);
        dispose(&mut h);
        assert_eq!(drops.get(), 4);
    }

    #[test]
    fn panicking_constructor_drops_prefix() {
        let drops = Rc::new(Cell::new(0));
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            construct_with(4, &GLOBAL, |i| {
                if i == 2 {
                    panic!("boom");
                }
                Tracked(drops.clone())
            })
        }));
        assert!(result.is_err());
        assert_eq!(drops.get(), 2);
    }

    #[test]
    fn slab_copy_requests_rounded_quanta() {
        let slab = Slab::new(SlabConfig::new(8)).unwrap();
        let src = [1u32, 2, 3, 4];
        let mut h = copy_range_in(&src, &slab).unwrap();
        assert_eq!(slab.used_quanta(), 2);
        assert_eq!(h.view().as_slice(), Some(&src[..]));
        // SAFETY: `h` came from `slab`.
        unsafe { dispose_in(&mut h, &slab) };
        assert!(h.is_null());
        assert_eq!(slab.used_quanta(), 0);
    }

    #[test]
    fn slab_rejects_overaligned_elements() {
        #[repr(align(32))]
        #[derive(Clone, Debug)]
        struct Wide(#[allow(dead_code)] u8);

        let slab = Slab::new(SlabConfig::new(8)).unwrap();
        let err = copy_range_in(&[Wide(1)], &slab).unwrap_err();
        assert_eq!(
            err,
            AllocError::Misaligned {
                align: 32,
                quantum: 8
            }
        );
    }

    #[test]
    fn slab_empty_copy_skips_allocator() {
        let slab = Slab::new(SlabConfig::new(8)).unwrap();
        let mut h = copy_range_in::<u64, _>(&[], &slab).unwrap();
        assert!(h.is_empty());
        assert_eq!(slab.used_quanta(), 0);
        // SAFETY: `h` came from `slab`.
        unsafe { dispose_in(&mut h, &slab) };
    }

    #[test]
    #[should_panic(expected = "reserved for the null array")]
    fn sentinel_size_is_rejected() {
        let _ = alloc_default::<()>(SENTINEL);
    }

    #[test]
    fn slab_reuses_space_only_after_disposal() {
        let mut slab = Slab::new(SlabConfig::new(8)).unwrap();
        let mut first = copy_range_in(&[1u64, 2], &slab).unwrap();
        assert_eq!(first.view().as_slice(), Some(&[1, 2][..]));
        // SAFETY: `first` came from `slab`.
        unsafe { dispose_in(&mut first, &slab) };
        assert!(first.is_null());
        slab.reset();
        let second = alloc_fill_in(2, &0xdead_u64, &slab).unwrap();
        assert_eq!(second.view().as_slice(), Some(&[0xdead, 0xdead][..]));
    }

    #[test]
    fn pointer_pair_copies_with_custom_allocators() {
        let src = [3u32, 4, 5, 6];
        let r = src[1..3].as_ptr_range();
        let global = Global;
        // SAFETY: both pointers come from `src`.
        let mut h = unsafe { copy_ptr_range_with(r.start, r.end, &global) };
        assert_eq!(h.view().as_slice(), Some(&[4, 5][..]));
        // SAFETY: `h` came from `global`.
        unsafe { dispose_with(&mut h, &global) };

        let slab = Slab::new(SlabConfig::new(8)).unwrap();
        // SAFETY: as above.
        let mut h = unsafe { copy_ptr_range_in(r.start, r.end, &slab) }.unwrap();
        assert_eq!(h.view().as_slice(), Some(&[4, 5][..]));
        assert_eq!(slab.used_quanta(), 1);
        // SAFETY: `h` came from `slab`.
        unsafe { dispose_in(&mut h, &slab) };
    }
}
