//! Element-wise hashing and comparison of slices.

use std::hash::{Hash, Hasher};

use crate::fnv::FnvHasher;

/// FNV-1a hash of every element of `elems`, in order.
///
/// Each element is fed through its own [`Hash`] impl into one fresh
/// [`FnvHasher`]; no length prefix is written.
pub fn content_hash<T: Hash>(elems: &[T]) -> u64 {
    let mut hasher = FnvHasher::new();
    for e in elems {
        e.hash(&mut hasher);
    }
    hasher.finish()
}

/// Whether `a` and `b` have the same length and pairwise-equal elements.
pub fn content_eq<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    a == b
}
