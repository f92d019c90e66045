//! Allocation and explicit disposal for arrview arrays.
//!
//! Views from `arrview-core` never own memory. This crate produces the
//! memory they point at and takes it back:
//!
//! ```text
//! factory (alloc_*, copy_*)
//! ├── Global            process allocator, dispose()
//! ├── BulkAllocator     element-count allocators, *_with / dispose_with()
//! └── SlabAllocator     byte quanta, *_in / dispose_in()
//!     └── Slab          segmented bump allocator (SlabConfig)
//! ```
//!
//! Every factory returns an [`ArrayHandle`] that borrows its allocator, so
//! a slab cannot be reset or dropped under a live handle. Handles have no
//! destructor:
//! whoever receives one passes it to the matching `dispose*` function, or
//! wraps it in a [`Scoped`] guard to release it at end of scope.
//!
//! # Allocator pairing
//!
//! A handle carries the allocator type that produced it as a type
//! parameter, so a default-allocated handle cannot be passed to
//! [`dispose_in`] and a slab handle cannot be passed to [`dispose`].
//! Pairing a handle with the right *instance* of a custom allocator is the
//! caller's obligation, which is why [`dispose_with`] and [`dispose_in`]
//! are `unsafe`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod bulk;
pub mod config;
pub mod error;
pub mod factory;
pub mod handle;
pub mod scoped;
pub mod slab;

pub use bulk::{array_layout, BulkAllocator, Global};
pub use config::SlabConfig;
pub use error::AllocError;
pub use factory::{
    alloc_default, alloc_default_with, alloc_fill, alloc_fill_in, alloc_fill_with, copy_from,
    copy_from_in, copy_from_with, copy_ptr_range, copy_ptr_range_in, copy_ptr_range_with,
    copy_range, copy_range_in, copy_range_with, dispose, dispose_in, dispose_with,
};
pub use handle::ArrayHandle;
pub use scoped::Scoped;
pub use slab::{byte_size_for, quanta_for, Slab, SlabAllocator};
