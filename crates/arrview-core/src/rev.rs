//! Reverse ("from the end") indices and the [`Bound`] trait.
//!
//! A [`RevIdx`] names an element by its distance from one-past-the-end, so
//! `RevIdx(0)` is the end address and `RevIdx(1)` is the last element. It
//! only becomes an absolute index once the length of the array is known.

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// One-past-the-last element.
pub const END: RevIdx = RevIdx(0);

/// The last element.
pub const LAST: RevIdx = RevIdx(1);

/// An index counted backwards from one-past-the-end of an array.
///
/// Arithmetic keeps the "distance from end" reading: subtracting moves the
/// referenced element towards the front, adding moves it towards the end.
///
/// ```
/// use arrview_core::{Array, LAST};
///
/// let data = [10, 20, 30, 40];
/// let a = Array::from_slice(&data);
/// assert_eq!(a[LAST], 40);
/// assert_eq!(a[LAST - 1], 30);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RevIdx(pub usize);

impl RevIdx {
    /// Offset from one-past-the-end.
    pub const fn offset(self) -> usize {
        self.0
    }

    /// Absolute index for an array of length `len`.
    ///
    /// An offset larger than `len` is a contract violation; it trips a debug
    /// assertion and otherwise produces an index that every bounds check in
    /// this crate rejects.
    #[inline]
    pub fn resolve(self, len: usize) -> usize {
        debug_assert!(
            self.0 <= len,
            "reverse offset {} exceeds array length {len}",
            self.0
        );
        len.wrapping_sub(self.0)
    }
}

impl fmt::Display for RevIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => write!(f, "END"),
            1 => write!(f, "LAST"),
            n => write!(f, "END-{n}"),
        }
    }
}

impl Sub<usize> for RevIdx {
    type Output = RevIdx;

    fn sub(self, k: usize) -> RevIdx {
        RevIdx(self.0 + k)
    }
}

impl Add<usize> for RevIdx {
    type Output = RevIdx;

    fn add(self, k: usize) -> RevIdx {
        debug_assert!(k <= self.0, "{self} + {k} moves past the end");
        RevIdx(self.0.wrapping_sub(k))
    }
}

impl SubAssign<usize> for RevIdx {
    fn sub_assign(&mut self, k: usize) {
        *self = *self - k;
    }
}

impl AddAssign<usize> for RevIdx {
    fn add_assign(&mut self, k: usize) {
        *self = *self + k;
    }
}

/// A slice bound that resolves to an absolute index given the array length.
///
/// Implemented for plain `usize` indices (used as-is) and for [`RevIdx`]
/// (counted from the end), so every combination of the two can be used to
/// slice an array.
pub trait Bound: Copy {
    /// Absolute index for an array of length `len`.
    fn resolve(self, len: usize) -> usize;
}

impl Bound for usize {
    #[inline]
    fn resolve(self, _len: usize) -> usize {
        self
    }
}

impl Bound for RevIdx {
    #[inline]
    fn resolve(self, len: usize) -> usize {
        RevIdx::resolve(self, len)
    }
}
