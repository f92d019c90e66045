//! Content hashing and content equality for arrview arrays.
//!
//! `==` on an [`Array`](arrview_core::Array) compares addresses. When an
//! array is used as a lookup key it should compare by contents instead;
//! [`KeyOps`] supplies that pair of operations and [`ContentKey`] wraps an
//! array so the standard maps use them.
//!
//! Hashing is FNV-1a ([`FnvHasher`]): deterministic across runs and
//! platforms of the same endianness, not resistant to collision attacks.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod content;
pub mod fnv;
pub mod key;

pub use content::{content_eq, content_hash};
pub use fnv::{BuildFnv, FnvHasher};
pub use key::{ContentIndexMap, ContentKey, ContentMap, KeyOps};
