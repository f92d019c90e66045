//! The exclusive [`ArrayMut`] view.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::ptr::{self, NonNull};
use std::slice;

use crate::array::{Array, SENTINEL};
use crate::rev::{Bound, RevIdx, END};

/// A borrowed view over `size` contiguous elements with write access.
///
/// Same `(pointer, size)` layout and null encoding as [`Array`], but holds
/// the memory exclusively for `'a` and is therefore not `Copy`. It converts
/// into an [`Array`] for free; the reverse direction does not exist.
#[repr(C)]
pub struct ArrayMut<'a, T> {
    ptr: *mut T,
    size: usize,
    _marker: PhantomData<&'a mut [T]>,
}

// SAFETY: an `ArrayMut` grants exactly the access of a `&mut [T]`.
unsafe impl<T: Send> Send for ArrayMut<'_, T> {}
// SAFETY: as above.
unsafe impl<T: Sync> Sync for ArrayMut<'_, T> {}

impl<'a, T> ArrayMut<'a, T> {
    /// The null array.
    pub const NULL: Self = Self {
        ptr: ptr::null_mut(),
        size: SENTINEL,
        _marker: PhantomData,
    };

    /// A non-null array with zero elements and no backing memory.
    pub const fn empty() -> Self {
        Self {
            ptr: NonNull::<T>::dangling().as_ptr(),
            size: 0,
            _marker: PhantomData,
        }
    }

    /// Borrow an existing mutable slice.
    pub fn from_slice(elems: &'a mut [T]) -> Self {
        Self {
            ptr: elems.as_mut_ptr(),
            size: elems.len(),
            _marker: PhantomData,
        }
    }

    /// Build a view from a pointer and an explicit size.
    ///
    /// # Safety
    ///
    /// Unless `size` is [`SENTINEL`], `ptr` must be non-null, aligned, and
    /// valid for reads and writes of `size` initialised elements for the
    /// whole of `'a`, with no other access to that memory during `'a`.
    pub const unsafe fn from_raw_parts(ptr: *mut T, size: usize) -> Self {
        Self {
            ptr,
            size,
            _marker: PhantomData,
        }
    }

    /// Whether this is the null array.
    pub const fn is_null(&self) -> bool {
        self.size == SENTINEL
    }

    /// `false` exactly when null.
    pub const fn is_present(&self) -> bool {
        !self.is_null()
    }

    /// Number of elements, [`SENTINEL`] when null.
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Whether the array is non-null and holds zero elements.
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Address of the first element.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr
    }

    /// One-past-the-last address.
    pub fn end_ptr(&self) -> *const T {
        self.as_view().end_ptr()
    }

    /// Read-only view of the same elements, borrowed from `self`.
    pub fn as_view(&self) -> Array<'_, T> {
        // SAFETY: `self` holds the memory for `'a`, which outlives the
        // shared borrow of `self`.
        unsafe { Array::from_raw_parts(self.ptr.cast_const(), self.size) }
    }

    /// Give up write access and keep a read-only view for `'a`.
    pub fn into_view(self) -> Array<'a, T> {
        // SAFETY: `self` is consumed, so nothing else can write for `'a`.
        unsafe { Array::from_raw_parts(self.ptr.cast_const(), self.size) }
    }

    /// A shorter-lived `ArrayMut` over the same elements.
    pub fn reborrow(&mut self) -> ArrayMut<'_, T> {
        ArrayMut {
            ptr: self.ptr,
            size: self.size,
            _marker: PhantomData,
        }
    }

    /// The elements as a mutable slice, or `None` for the null array.
    pub fn as_mut_slice(&mut self) -> Option<&mut [T]> {
        if self.is_null() {
            None
        } else {
            // SAFETY: non-null views cover `size` live elements held
            // exclusively by `self`.
            Some(unsafe { slice::from_raw_parts_mut(self.ptr, self.size) })
        }
    }

    fn elems(&self) -> &[T] {
        self.as_view().as_slice().unwrap_or(&[])
    }

    fn elems_mut(&mut self) -> &mut [T] {
        self.as_mut_slice().unwrap_or(&mut [])
    }

    /// Mutable reference to element `i`, or `None` when out of range.
    pub fn get_mut(&mut self, i: usize) -> Option<&mut T> {
        self.elems_mut().get_mut(i)
    }

    /// Mutable reference to the last element.
    ///
    /// # Panics
    ///
    /// Panics if the array is null or empty.
    pub fn last_mut(&mut self) -> &mut T {
        debug_assert!(
            self.is_present() && self.size >= 1,
            "last_mut() on empty array"
        );
        let i = self.size.wrapping_sub(1);
        &mut self.elems_mut()[i]
    }

    /// Iterate mutably over the elements.
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.elems_mut().iter_mut()
    }

    /// Drop the last element from the view without touching it.
    pub fn pop(&mut self) {
        debug_assert!(
            self.is_present() && self.size > 0,
            "pop() on empty array"
        );
        if self.is_present() {
            self.size = self.size.saturating_sub(1);
        }
    }

    /// Limit the view to at most `n` elements. Null arrays stay null.
    pub fn shrink_to(&mut self, n: usize) {
        if self.is_present() {
            self.size = self.size.min(n);
        }
    }

    /// A mutable sub-view `[begin, end)` borrowed from `self`.
    ///
    /// # Panics
    ///
    /// Panics if the array is null or the range does not fit.
    pub fn slice_mut<B: Bound, E: Bound>(&mut self, begin: B, end: E) -> ArrayMut<'_, T> {
        assert!(self.is_present(), "slice of null array");
        let b = begin.resolve(self.size);
        let e = end.resolve(self.size);
        assert!(
            b <= e && e <= self.size,
            "slice [{b}, {e}) out of range for array of size {}",
            self.size
        );
        ArrayMut {
            ptr: self.ptr.wrapping_add(b),
            size: e - b,
            _marker: PhantomData,
        }
    }

    /// A mutable sub-view from `begin` to the end.
    pub fn slice_mut_from<B: Bound>(&mut self, begin: B) -> ArrayMut<'_, T> {
        self.slice_mut(begin, END)
    }
}

impl<T> Default for ArrayMut<'_, T> {
    fn default() -> Self {
        Self::NULL
    }
}

impl<T> PartialEq for ArrayMut<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.ptr, other.ptr) && self.size == other.size
    }
}

impl<T> Eq for ArrayMut<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for ArrayMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.as_view(), f)
    }
}

impl<T> Index<usize> for ArrayMut<'_, T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        debug_assert!(
            i <= self.size,
            "index {i} past one-past-end of array of size {}",
            self.size
        );
        &self.elems()[i]
    }
}

impl<T> IndexMut<usize> for ArrayMut<'_, T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        debug_assert!(
            i <= self.size,
            "index {i} past one-past-end of array of size {}",
            self.size
        );
        &mut self.elems_mut()[i]
    }
}

impl<T> Index<RevIdx> for ArrayMut<'_, T> {
    type Output = T;

    fn index(&self, r: RevIdx) -> &T {
        &self[r.resolve(self.size)]
    }
}

impl<T> IndexMut<RevIdx> for ArrayMut<'_, T> {
    fn index_mut(&mut self, r: RevIdx) -> &mut T {
        let i = r.resolve(self.size);
        &mut self[i]
    }
}

impl<'a, T> From<&'a mut [T]> for ArrayMut<'a, T> {
    fn from(elems: &'a mut [T]) -> Self {
        Self::from_slice(elems)
    }
}

impl<'a, T, const N: usize> From<&'a mut [T; N]> for ArrayMut<'a, T> {
    fn from(elems: &'a mut [T; N]) -> Self {
        Self::from_slice(elems.as_mut_slice())
    }
}

impl<'a, T> From<ArrayMut<'a, T>> for Array<'a, T> {
    fn from(view: ArrayMut<'a, T>) -> Self {
        view.into_view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rev::LAST;

    #[test]
    fn writes_are_visible_through_source() {
        let mut data = [0u32; 4];
        {
            let mut a = ArrayMut::from(&mut data);
            a[0] = 7;
            a[LAST] = 9;
            *a.last_mut() += 1;
        }
        assert_eq!(data, [7, 0, 0, 10]);
    }

    #[test]
    fn converts_into_read_only_view() {
        let mut data = vec![1, 2, 3];
        let ptr = data.as_ptr();
        let a: Array<'_, i32> = ArrayMut::from_slice(&mut data).into();
        assert_eq!(a.as_ptr(), ptr);
        assert_eq!(a.as_slice(), Some(&[1, 2, 3][..]));
    }

    #[test]
    fn as_view_aliases_same_memory() {
        let mut data = [5u8; 3];
        let a = ArrayMut::from_slice(&mut data);
        let v = a.as_view();
        assert_eq!(v.len(), 3);
        assert_eq!(v.end_ptr(), a.end_ptr());
    }

    #[test]
    fn slice_mut_limits_writes() {
        let mut data = [0i64; 6];
        {
            let mut a = ArrayMut::from_slice(&mut data);
            let mut mid = a.slice_mut(2, LAST);
            for x in mid.iter_mut() {
                *x = -1;
            }
            assert_eq!(mid.len(), 3);
            let mut tail = a.slice_mut_from(LAST);
            tail[0] = 8;
        }
        assert_eq!(data, [0, 0, -1, -1, -1, 8]);
    }

    #[test]
    fn null_and_empty_are_distinct() {
        let n: ArrayMut<'_, u8> = ArrayMut::default();
        let e: ArrayMut<'_, u8> = ArrayMut::empty();
        assert!(n.is_null());
        assert!(e.is_present() && e.is_empty());
        assert_ne!(n, e);
    }

    #[test]
    fn pop_and_shrink_adjust_len_only() {
        let mut data = [1, 2, 3, 4];
        let mut a = ArrayMut::from_slice(&mut data);
        a.pop();
        a.shrink_to(2);
        assert_eq!(a.as_mut_slice().map(|s| s.len()), Some(2));
        assert_eq!(format!("{a:?}"), "[1, 2]");
    }

    #[test]
    fn reborrow_keeps_original_usable() {
        let mut data = [0u8; 2];
        let mut a = ArrayMut::from_slice(&mut data);
        let mut short = a.reborrow();
        short[1] = 3;
        if let Some(x) = a.get_mut(0) {
            *x = 2;
        }
        assert_eq!(a.as_view().as_slice(), Some(&[2, 3][..]));
    }
}
