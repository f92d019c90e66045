//! Pointer+size array views for passing contiguous memory without copying.
//!
//! This is the leaf crate of the workspace. It defines the view types that
//! every other crate passes around:
//!
//! - [`Array`]: a `Copy`, read-only `(pointer, size)` view with a reserved
//!   null state distinct from the empty state.
//! - [`ArrayMut`]: the exclusive, writable counterpart, convertible into an
//!   [`Array`].
//! - [`RevIdx`] with [`END`] and [`LAST`]: indices counted from the end,
//!   accepted anywhere a [`Bound`] is.
//! - [`Str`] with [`NULL_STR`] and [`EMPTY_STR`]: byte strings.
//!
//! Views never own memory. Allocation and disposal live in `arrview-alloc`;
//! content hashing and content equality live in `arrview-hash`.
//!
//! # Equality
//!
//! `==` on views is shallow: same start address and same size. Two buffers
//! with identical contents compare unequal.
//!
//! ```
//! use arrview_core::Array;
//!
//! let a = [1, 2, 3];
//! let b = [1, 2, 3];
//! assert_ne!(Array::from_slice(&a), Array::from_slice(&b));
//! assert_eq!(Array::from_slice(&a), Array::from_slice(&a));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod array;
pub mod array_mut;
pub mod borrow;
pub mod rev;
pub mod string;

pub use array::{Array, Iter, SENTINEL};
pub use array_mut::ArrayMut;
pub use borrow::{
    borrow_array, borrow_range, borrow_slice, borrow_until, borrow_until_default,
    borrow_until_ptr, borrow_until_ptr_default,
};
pub use rev::{Bound, RevIdx, END, LAST};
pub use string::{Str, EMPTY_STR, NULL_STR};
