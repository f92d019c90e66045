//! Allocation error types.

use std::error::Error;
use std::fmt;

/// Errors reported by slab allocation and slab configuration.
///
/// The default bulk allocator never returns these: it hands failures to
/// [`std::alloc::handle_alloc_error`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The slab cannot satisfy the request.
    CapacityExceeded {
        /// Number of bytes requested.
        requested: usize,
        /// Bytes available to a request of this kind.
        capacity: usize,
    },
    /// The element type needs a stricter alignment than the slab quantum.
    Misaligned {
        /// Alignment of the element type.
        align: usize,
        /// Quantum of the slab.
        quantum: usize,
    },
    /// `count * size_of::<T>()` rounded to the quantum overflows `usize`.
    LayoutOverflow {
        /// Requested element count.
        count: usize,
        /// Size of one element in bytes.
        elem_size: usize,
    },
    /// A slab configuration was rejected.
    InvalidConfig {
        /// What was wrong with it.
        reason: String,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "slab capacity exceeded: requested {requested} bytes, capacity {capacity} bytes"
                )
            }
            Self::Misaligned { align, quantum } => {
                write!(
                    f,
                    "element alignment {align} exceeds slab quantum {quantum}"
                )
            }
            Self::LayoutOverflow { count, elem_size } => {
                write!(
                    f,
                    "layout overflow: {count} elements of {elem_size} bytes"
                )
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid slab config: {reason}")
            }
        }
    }
}

impl Error for AllocError {}
