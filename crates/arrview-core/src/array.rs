//! The shared [`Array`] view.
//!
//! An [`Array`] is a `(pointer, size)` pair with the same layout as the
//! classic C convention, plus a reserved size ([`SENTINEL`]) that encodes
//! "no array at all". Null and empty are different states:
//!
//! ```text
//! NULL     ptr = null      size = SENTINEL   is_null() == true
//! empty    ptr = dangling  size = 0          is_null() == false, is_empty() == true
//! view     ptr = &data[0]  size = n
//! ```
//!
//! Views never own their elements and never free anything. Owning handles
//! live in `arrview-alloc` and are released explicitly.

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ops::Index;
use std::ptr::{self, NonNull};
use std::slice;

use crate::rev::{Bound, RevIdx, END};

/// Reserved size value encoding the null state.
pub const SENTINEL: usize = usize::MAX;

/// A borrowed, read-only view over `size` contiguous elements.
///
/// `Array` is `Copy`: copying it copies the pointer and size, never the
/// elements. Equality (`==`) is *shallow*: two views are equal when they
/// start at the same address and have the same size, whatever the elements
/// hold. Content comparison lives in `arrview-hash`.
///
/// Element access is bounds-checked. The one-past-end position is a valid
/// *address* ([`Array::end_ptr`], [`Array::ptr_at`]) but never a valid
/// element.
#[repr(C)]
pub struct Array<'a, T> {
    ptr: *const T,
    size: usize,
    _marker: PhantomData<&'a [T]>,
}

impl<T> Clone for Array<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Array<'_, T> {}

// SAFETY: an `Array` grants exactly the access of a `&[T]`.
unsafe impl<T: Sync> Send for Array<'_, T> {}
// SAFETY: as above.
unsafe impl<T: Sync> Sync for Array<'_, T> {}

impl<'a, T> Array<'a, T> {
    /// The null array: no backing memory, size [`SENTINEL`].
    pub const NULL: Self = Self {
        ptr: ptr::null(),
        size: SENTINEL,
        _marker: PhantomData,
    };

    /// A non-null array with zero elements and no backing memory.
    pub const fn empty() -> Self {
        Self {
            ptr: NonNull::<T>::dangling().as_ptr().cast_const(),
            size: 0,
            _marker: PhantomData,
        }
    }

    /// Borrow an existing slice.
    pub const fn from_slice(elems: &'a [T]) -> Self {
        Self {
            ptr: elems.as_ptr(),
            size: elems.len(),
            _marker: PhantomData,
        }
    }

    /// Borrow a whole fixed-size array.
    pub const fn from_array<const N: usize>(elems: &'a [T; N]) -> Self {
        Self::from_slice(elems.as_slice())
    }

    /// Build a view from a pointer and an explicit size.
    ///
    /// Passing [`SENTINEL`] as `size` produces a null array.
    ///
    /// # Safety
    ///
    /// Unless `size` is [`SENTINEL`], `ptr` must be non-null, aligned, and
    /// valid for reads of `size` initialised elements for the whole of `'a`,
    /// and the memory must not be mutated through another path during `'a`.
    pub const unsafe fn from_raw_parts(ptr: *const T, size: usize) -> Self {
        Self {
            ptr,
            size,
            _marker: PhantomData,
        }
    }

    /// Build a view from a `[begin, end)` pointer pair.
    ///
    /// # Safety
    ///
    /// Both pointers must lie in (or one past) the same allocation with
    /// `begin <= end`, and the range must satisfy the requirements of
    /// [`Array::from_raw_parts`].
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized, since a pointer pair cannot encode a
    /// length for such types.
    pub unsafe fn from_ptr_range(begin: *const T, end: *const T) -> Self {
        // SAFETY: the caller guarantees both pointers share one allocation.
        let diff = unsafe { end.offset_from(begin) };
        debug_assert!(diff >= 0, "pointer range end precedes begin");
        // SAFETY: forwarded from the caller.
        unsafe { Self::from_raw_parts(begin, diff as usize) }
    }

    /// Whether this is the null array.
    pub const fn is_null(&self) -> bool {
        self.size == SENTINEL
    }

    /// The boolean reading of an array: `false` exactly when null.
    ///
    /// An empty but non-null array is present.
    pub const fn is_present(&self) -> bool {
        !self.is_null()
    }

    /// Number of elements. A null array reports [`SENTINEL`].
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Whether the array is non-null and holds zero elements.
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The elements as a slice, or `None` for the null array.
    pub fn as_slice(&self) -> Option<&'a [T]> {
        if self.is_null() {
            None
        } else {
            // SAFETY: every non-null view was built from a live slice or from
            // raw parts the caller vouched for over `'a`.
            Some(unsafe { slice::from_raw_parts(self.ptr, self.size) })
        }
    }

    #[inline]
    fn elems(&self) -> &'a [T] {
        self.as_slice().unwrap_or(&[])
    }

    /// Element `i`, or `None` when out of range or null.
    pub fn get(&self, i: usize) -> Option<&'a T> {
        self.elems().get(i)
    }

    /// First element, if any.
    pub fn first(&self) -> Option<&'a T> {
        self.elems().first()
    }

    /// The last element.
    ///
    /// # Panics
    ///
    /// Panics if the array is null or empty.
    pub fn last(&self) -> &'a T {
        debug_assert!(
            self.is_present() && self.size >= 1,
            "last() on empty array"
        );
        &self.elems()[self.size.wrapping_sub(1)]
    }

    /// Address of the first element.
    pub const fn as_ptr(&self) -> *const T {
        self.ptr
    }

    /// Address of the element at `at`, which may be one past the end.
    ///
    /// Only the address is computed; nothing is read.
    pub fn ptr_at<B: Bound>(&self, at: B) -> *const T {
        debug_assert!(self.is_present(), "address into null array");
        let i = at.resolve(self.size);
        debug_assert!(
            i <= self.size,
            "index {i} past one-past-end of array of size {}",
            self.size
        );
        self.ptr.wrapping_add(i)
    }

    /// One-past-the-last address, for composing pointer ranges.
    pub fn end_ptr(&self) -> *const T {
        self.ptr_at(END)
    }

    /// Drop the last element from the view.
    ///
    /// Pure bookkeeping: the element itself is not touched.
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

    /// Consume the first element: the start moves forward by one and the
    /// size drops by one.
    pub fn advance(&mut self) {
        debug_assert!(
            self.is_present() && self.size > 0,
            "advance() on empty array"
        );
        if self.is_present() && self.size > 0 {
            self.ptr = self.ptr.wrapping_add(1);
            self.size -= 1;
        }
    }

    /// Consume and return the first element, or `None` when nothing is left.
    ///
    /// ```
    /// use arrview_core::Array;
    ///
    /// let mut cursor = Array::from_slice(b"42;");
    /// let mut value = 0u32;
    /// while let Some(&b) = cursor.first() {
    ///     if !b.is_ascii_digit() {
    ///         break;
    ///     }
    ///     value = value * 10 + u32::from(b - b'0');
    ///     cursor.advance();
    /// }
    /// assert_eq!(value, 42);
    /// assert_eq!(cursor.take_first(), Some(&b';'));
    /// assert!(cursor.is_empty());
    /// ```
    pub fn take_first(&mut self) -> Option<&'a T> {
        let first = self.first()?;
        self.advance();
        Some(first)
    }

    /// A sub-view `[begin, end)` over the same memory.
    ///
    /// Either bound may be an absolute `usize` or a [`RevIdx`].
    ///
    /// # Panics
    ///
    /// Panics if the array is null or the resolved range does not fit in
    /// `0..=len()`.
    pub fn slice<B: Bound, E: Bound>(&self, begin: B, end: E) -> Array<'a, T> {
        assert!(self.is_present(), "slice of null array");
        let b = begin.resolve(self.size);
        let e = end.resolve(self.size);
        assert!(
            b <= e && e <= self.size,
            "slice [{b}, {e}) out of range for array of size {}",
            self.size
        );
        Array {
            ptr: self.ptr.wrapping_add(b),
            size: e - b,
            _marker: PhantomData,
        }
    }

    /// A sub-view from `begin` to the end.
    pub fn slice_from<B: Bound>(&self, begin: B) -> Array<'a, T> {
        self.slice(begin, END)
    }

    /// Iterate over the elements. A null array yields nothing.
    pub fn iter(&self) -> Iter<'a, T> {
        Iter {
            inner: self.elems().iter(),
        }
    }
}

impl<T> Default for Array<'_, T> {
    fn default() -> Self {
        Self::NULL
    }
}

impl<T> PartialEq for Array<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.ptr, other.ptr) && self.size == other.size
    }
}

impl<T> Eq for Array<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Array<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_slice() {
            None => f.write_str("null"),
            Some(elems) => f.debug_list().entries(elems).finish(),
        }
    }
}

impl<T> Index<usize> for Array<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        debug_assert!(
            i <= self.size,
            "index {i} past one-past-end of array of size {}",
            self.size
        );
        &self.elems()[i]
    }
}

impl<T> Index<RevIdx> for Array<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, r: RevIdx) -> &T {
        &self[r.resolve(self.size)]
    }
}

impl<'a, T> From<&'a [T]> for Array<'a, T> {
    fn from(elems: &'a [T]) -> Self {
        Self::from_slice(elems)
    }
}

impl<'a, T, const N: usize> From<&'a [T; N]> for Array<'a, T> {
    fn from(elems: &'a [T; N]) -> Self {
        Self::from_array(elems)
    }
}

impl<'a, T> From<&'a Vec<T>> for Array<'a, T> {
    fn from(elems: &'a Vec<T>) -> Self {
        Self::from_slice(elems.as_slice())
    }
}

/// Iterator over the elements of an [`Array`].
#[derive(Clone, Debug)]
pub struct Iter<'a, T> {
    inner: slice::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for Array<'a, T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &Array<'a, T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
