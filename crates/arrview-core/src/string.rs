//! Byte strings as arrays.
//!
//! A [`Str`] is not NUL-terminated: its length is authoritative. Code that
//! receives strings must be able to tell "no string" ([`NULL_STR`]) from
//! "a string of length zero" ([`EMPTY_STR`]).

use std::ffi::{c_char, CStr};
use std::str::Utf8Error;

use crate::array::Array;

/// A borrowed byte string.
pub type Str<'a> = Array<'a, u8>;

/// No string at all.
pub const NULL_STR: Str<'static> = Array::NULL;

/// A string that is present but has no bytes.
pub const EMPTY_STR: Str<'static> = Array::empty();

impl<'a> Array<'a, u8> {
    /// Borrow the bytes of a C string, without its terminator.
    ///
    /// Finding the terminator is a linear scan.
    pub fn from_cstr(s: &'a CStr) -> Self {
        Self::from_slice(s.to_bytes())
    }

    /// Borrow a NUL-terminated string given by raw pointer.
    ///
    /// A null pointer yields [`NULL_STR`].
    ///
    /// # Safety
    ///
    /// A non-null `ptr` must satisfy the requirements of
    /// [`CStr::from_ptr`] for the whole of `'a`.
    pub unsafe fn from_c_ptr(ptr: *const c_char) -> Self {
        if ptr.is_null() {
            return Self::NULL;
        }
        // SAFETY: forwarded from the caller.
        Self::from_cstr(unsafe { CStr::from_ptr(ptr) })
    }

    /// Interpret the bytes as UTF-8. `None` for the null string.
    pub fn as_utf8(&self) -> Option<Result<&'a str, Utf8Error>> {
        self.as_slice().map(std::str::from_utf8)
    }
}

impl<'a> From<&'a str> for Str<'a> {
    fn from(s: &'a str) -> Self {
        Self::from_slice(s.as_bytes())
    }
}

impl<'a> From<&'a CStr> for Str<'a> {
    fn from(s: &'a CStr) -> Self {
        Self::from_cstr(s)
    }
}
