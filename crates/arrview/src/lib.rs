//! arrview: pointer+size array views for passing contiguous memory without
//! copying.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all arrview sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use arrview::prelude::*;
//!
//! // Allocate a copy, then pass cheap views of it around.
//! let mut owned = copy_range(&[3, 1, 4, 1, 5, 9]);
//! let all = owned.view();
//! assert_eq!(all[LAST], 9);
//! assert_eq!(all.slice(1, LAST - 1).as_slice(), Some(&[1, 4, 1][..]));
//!
//! // Views compare by address; content keys compare by value.
//! let other = [3, 1, 4, 1, 5, 9];
//! assert_ne!(all, Array::from_array(&other));
//! assert!(KeyOps::equal(all, Array::from_array(&other)));
//!
//! // Null and empty are distinct states.
//! assert!(NULL_STR.is_null());
//! assert!(EMPTY_STR.is_empty() && !EMPTY_STR.is_null());
//!
//! dispose(&mut owned);
//! assert!(owned.is_null());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`views`] | `arrview-core` | `Array`, `ArrayMut`, `RevIdx`, `Str`, borrow operations |
//! | [`alloc`] | `arrview-alloc` | factories, disposal, `ArrayHandle`, allocators, `Slab` |
//! | [`hash`] | `arrview-hash` | FNV-1a, content hash/equality, content-keyed maps |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// View types and borrow operations (`arrview-core`).
///
/// [`views::Array`] and [`views::ArrayMut`] are also in the [`prelude`].
pub use arrview_core as views;

/// Allocation and explicit disposal (`arrview-alloc`).
///
/// Factories return [`alloc::ArrayHandle`]s that must be passed to the
/// matching `dispose*` function, or guarded by [`alloc::Scoped`].
pub use arrview_alloc as alloc;

/// Content hashing and content-keyed maps (`arrview-hash`).
pub use arrview_hash as hash;

/// Common imports for typical arrview usage.
///
/// ```rust
/// use arrview::prelude::*;
/// ```
pub mod prelude {
    // Views
    pub use arrview_core::{
        borrow_array, borrow_slice, borrow_until, Array, ArrayMut, RevIdx, Str, EMPTY_STR, END,
        LAST, NULL_STR,
    };

    // Default-allocator factories
    pub use arrview_alloc::{
        alloc_default, alloc_fill, copy_from, copy_range, dispose, ArrayHandle, Scoped,
    };

    // Slabs
    pub use arrview_alloc::{AllocError, Slab, SlabAllocator, SlabConfig};

    // Content keys
    pub use arrview_hash::{ContentIndexMap, ContentKey, ContentMap, KeyOps};
}
