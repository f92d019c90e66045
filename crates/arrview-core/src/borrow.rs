//! Borrowing constructors: views over memory that is already live.
//!
//! None of these allocate. The returned views never release anything.

use crate::array::Array;

/// View `[start, end)` of a live pointer range.
///
/// # Safety
///
/// See [`Array::from_ptr_range`].
pub unsafe fn borrow_range<'a, T>(start: *const T, end: *const T) -> Array<'a, T> {
    // SAFETY: forwarded from the caller.
    unsafe { Array::from_ptr_range(start, end) }
}

/// View a whole slice.
pub fn borrow_slice<T>(elems: &[T]) -> Array<'_, T> {
    Array::from_slice(elems)
}

/// View a whole fixed-size array, e.g. a stack buffer.
pub fn borrow_array<T, const N: usize>(elems: &[T; N]) -> Array<'_, T> {
    Array::from_array(elems)
}

/// View the prefix of `elems` that precedes the first `terminator`.
///
/// When no terminator is present the whole slice is returned.
///
/// ```
/// use arrview_core::borrow_until;
///
/// let seq = [1, 2, 3, 0, 9];
/// assert_eq!(borrow_until(&seq, &0).as_slice(), Some(&[1, 2, 3][..]));
/// ```
pub fn borrow_until<'a, T: PartialEq>(elems: &'a [T], terminator: &T) -> Array<'a, T> {
    let end = elems
        .iter()
        .position(|e| e == terminator)
        .unwrap_or(elems.len());
    Array::from_slice(&elems[..end])
}

/// [`borrow_until`] with `T::default()` as the terminator.
pub fn borrow_until_default<T: PartialEq + Default>(elems: &[T]) -> Array<'_, T> {
    borrow_until(elems, &T::default())
}

/// Scan forward from `ptr` until an element equal to `terminator` and view
/// everything before it.
///
/// # Safety
///
/// `ptr` must be valid for reads up to and including the first element
/// equal to `terminator`, and that memory must stay live and unmodified
/// for `'a`.
pub unsafe fn borrow_until_ptr<'a, T: PartialEq>(ptr: *const T, terminator: &T) -> Array<'a, T> {
    let mut len = 0usize;
    // SAFETY: the caller guarantees a terminator is reachable, so every
    // element read here is in bounds.
    while unsafe { &*ptr.add(len) } != terminator {
        len += 1;
    }
    // SAFETY: the `len` elements before the terminator are live for `'a`.
    unsafe { Array::from_raw_parts(ptr, len) }
}

/// [`borrow_until_ptr`] with `T::default()` as the terminator.
///
/// # Safety
///
/// As for [`borrow_until_ptr`], with `T::default()` as the terminator.
pub unsafe fn borrow_until_ptr_default<'a, T: PartialEq + Default>(ptr: *const T) -> Array<'a, T> {
    // SAFETY: forwarded from the caller.
    unsafe { borrow_until_ptr(ptr, &T::default()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::SmallVec;

    #[test]
    fn until_terminator_stops_before_it() {
        let seq = [1, 2, 3, 0, 9];
        let v = borrow_until(&seq, &0);
        assert_eq!(v.len(), 3);
        assert_eq!(v.as_slice(), Some(&[1, 2, 3][..]));
        assert_eq!(v.as_ptr(), seq.as_ptr());
    }

    #[test]
    fn until_default_uses_zero() {
        let seq = [4u8, 5, 0, 6];
        assert_eq!(borrow_until_default(&seq).len(), 2);
    }

    #[test]
    fn until_without_terminator_takes_everything() {
        let seq = [1, 2, 3];
        assert_eq!(borrow_until(&seq, &7).len(), 3);
    }

    #[test]
    fn until_terminator_at_start_is_empty_not_null() {
        let seq = [0, 1];
        let v = borrow_until(&seq, &0);
        assert!(v.is_present());
        assert!(v.is_empty());
    }

    #[test]
    fn until_ptr_matches_slice_version() {
        let seq = [1, 2, 3, 0, 9];
        // SAFETY: a terminator is present inside `seq`.
        let v = unsafe { borrow_until_ptr(seq.as_ptr(), &0) };
        assert_eq!(v, borrow_until(&seq, &0));
    }

    #[test]
    fn until_ptr_default_stops_at_zero() {
        let seq = [7u32, 8, 0, 9];
        // SAFETY: a zero is present inside `seq`.
        let v = unsafe { borrow_until_ptr_default(seq.as_ptr()) };
        assert_eq!(v.as_slice(), Some(&[7, 8][..]));
    }

    #[test]
    fn fixed_array_spans_whole_buffer() {
        let buf = [0u16; 32];
        let v = borrow_array(&buf);
        assert_eq!(v.len(), 32);
        assert_eq!(v.end_ptr(), buf.as_ptr_range().end);
    }

    #[test]
    fn range_of_inline_storage() {
        let inline: SmallVec<[u32; 8]> = (0..6).collect();
        let r = inline[1..4].as_ptr_range();
        // SAFETY: both pointers come from `inline`, which outlives the view.
        let v = unsafe { borrow_range(r.start, r.end) };
        assert_eq!(v.as_slice(), Some(&[1, 2, 3][..]));
        assert_eq!(borrow_slice(&inline).len(), 6);
    }
}
