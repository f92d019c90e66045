//! Byte-oriented slab allocation in fixed quanta.
//!
//! A [`SlabAllocator`] works in bytes and rounds every request up to its
//! native quantum. [`Slab`] is the default implementation: a list of
//! quantum-aligned segments with bump allocation and no per-block release.
//!
//! ```text
//! Slab
//! ├── Segment 0  [####|####|##..|....]   cursor = 3 quanta
//! ├── Segment 1  [....|....|....|....]   opened when segment 0 was full
//! └── ...        up to max_segments
//! ```

use std::alloc::{alloc, dealloc, handle_alloc_error, Layout};
use std::cell::RefCell;
use std::mem::size_of;
use std::ptr::NonNull;

use tracing::debug;

use crate::config::SlabConfig;
use crate::error::AllocError;

/// Allocator that hands out byte ranges in whole quanta.
///
/// Every block returned by [`alloc`](SlabAllocator::alloc) starts on a
/// quantum boundary. Allocation takes `&self` so that handles can borrow
/// the slab for as long as they are alive.
pub trait SlabAllocator {
    /// Allocation granularity in bytes. A power of two.
    fn quantum(&self) -> usize;

    /// Reserve `byte_size` bytes, rounded up to whole quanta.
    fn alloc(&self, byte_size: usize) -> Result<NonNull<u8>, AllocError>;

    /// Give back a block. Slabs may ignore this until they are reset.
    ///
    /// # Safety
    ///
    /// `ptr` must come from `self.alloc(byte_size)` with the same
    /// `byte_size` and must not have been freed already.
    unsafe fn free(&self, ptr: NonNull<u8>, byte_size: usize);
}

/// Number of quanta needed for `count` elements of `T`.
pub fn quanta_for<T>(count: usize, quantum: usize) -> Result<usize, AllocError> {
    debug_assert!(quantum.is_power_of_two(), "quantum must be a power of two");
    count
        .checked_mul(size_of::<T>())
        .map(|bytes| bytes.div_ceil(quantum))
        .ok_or(AllocError::LayoutOverflow {
            count,
            elem_size: size_of::<T>(),
        })
}

/// Bytes to request for `count` elements of `T`: the element bytes rounded
/// up to a whole number of quanta.
pub fn byte_size_for<T>(count: usize, quantum: usize) -> Result<usize, AllocError> {
    quanta_for::<T>(count, quantum)?
        .checked_mul(quantum)
        .ok_or(AllocError::LayoutOverflow {
            count,
            elem_size: size_of::<T>(),
        })
}

/// One quantum-aligned block with a bump cursor.
struct Segment {
    base: NonNull<u8>,
    layout: Layout,
    /// Capacity in quanta.
    quanta: usize,
    /// Next free quantum.
    cursor: usize,
}

impl Segment {
    fn new(config: &SlabConfig) -> Result<Self, AllocError> {
        let layout = Layout::from_size_align(config.segment_bytes(), config.quantum).map_err(
            |_| AllocError::InvalidConfig {
                reason: format!(
                    "segment of {} bytes cannot be aligned to {}",
                    config.segment_bytes(),
                    config.quantum
                ),
            },
        )?;
        // SAFETY: a validated config has a non-zero segment size.
        let raw = unsafe { alloc(layout) };
        let Some(base) = NonNull::new(raw) else {
            handle_alloc_error(layout);
        };
        Ok(Self {
            base,
            layout,
            quanta: config.segment_quanta,
            cursor: 0,
        })
    }

    fn alloc(&mut self, quanta: usize, quantum: usize) -> Option<NonNull<u8>> {
        let new_cursor = self.cursor.checked_add(quanta)?;
        if new_cursor > self.quanta {
            return None;
        }
        // SAFETY: `cursor <= quanta`, so the offset stays within (or one
        // past) the segment.
        let ptr = unsafe { self.base.add(self.cursor * quantum) };
        self.cursor = new_cursor;
        Some(ptr)
    }

    /// Roll the cursor back if `ptr` is the most recent block.
    fn release_top(&mut self, ptr: NonNull<u8>, quanta: usize, quantum: usize) -> bool {
        let Some(start) = self.cursor.checked_sub(quanta) else {
            return false;
        };
        if self.base.as_ptr().wrapping_add(start * quantum) == ptr.as_ptr() {
            self.cursor = start;
            true
        } else {
            false
        }
    }

    fn remaining(&self) -> usize {
        self.quanta - self.cursor
    }
}

impl Drop for Segment {
    fn drop(&mut self) {
        // SAFETY: `base` was allocated with `layout` in `Segment::new`.
        unsafe { dealloc(self.base.as_ptr(), self.layout) }
    }
}

/// Segmented bump allocator in fixed quanta.
///
/// Blocks are carved from the current segment; a request that does not fit
/// moves on to the next segment, opening a new one if needed, up to
/// `max_segments`. Blocks never span segments. Freeing only reclaims space
/// when the block is the most recent one in the current segment; everything
/// else stays reserved until [`reset`](Slab::reset). Segment memory is
/// returned to the process when the slab is dropped.
///
/// Handles produced from a slab borrow it, so `reset` and drop are only
/// possible once every handle is out of use:
///
/// ```compile_fail
/// use arrview_alloc::{copy_range_in, Slab};
///
/// let h = {
///     let slab = Slab::with_quantum(8).unwrap();
///     copy_range_in(&[1u64, 2], &slab).unwrap()
/// };
/// assert_eq!(h.view().len(), 2);
/// ```
pub struct Slab {
    state: RefCell<SlabState>,
    config: SlabConfig,
}

struct SlabState {
    segments: Vec<Segment>,
    /// Index of the segment currently being filled.
    current: usize,
}

impl Slab {
    /// Create a slab with one segment already open.
    pub fn new(config: SlabConfig) -> Result<Self, AllocError> {
        config.validate()?;
        let mut segments = Vec::with_capacity(usize::from(config.max_segments));
        segments.push(Segment::new(&config)?);
        Ok(Self {
            state: RefCell::new(SlabState {
                segments,
                current: 0,
            }),
            config,
        })
    }

    /// Create a slab with the given quantum and default sizing.
    pub fn with_quantum(quantum: usize) -> Result<Self, AllocError> {
        Self::new(SlabConfig::new(quantum))
    }

    /// The configuration this slab was built with.
    pub fn config(&self) -> &SlabConfig {
        &self.config
    }

    /// Rewind every segment.
    ///
    /// Takes `&mut self`, so no handle into the slab can still be in use.
    pub fn reset(&mut self) {
        let state = self.state.get_mut();
        for seg in &mut state.segments {
            seg.cursor = 0;
        }
        state.current = 0;
        debug!(segments = state.segments.len(), "slab reset");
    }

    /// Quanta currently reserved across all segments.
    pub fn used_quanta(&self) -> usize {
        self.state.borrow().segments.iter().map(|s| s.cursor).sum()
    }

    /// Bytes currently reserved across all segments.
    pub fn used_bytes(&self) -> usize {
        self.used_quanta() * self.config.quantum
    }

    /// Quanta still free in the current segment.
    pub fn remaining_in_segment(&self) -> usize {
        let state = self.state.borrow();
        state.segments[state.current].remaining()
    }

    /// Number of segments opened so far.
    pub fn segment_count(&self) -> usize {
        self.state.borrow().segments.len()
    }

    /// Memory held by all segments, in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.segment_count() * self.config.segment_bytes()
    }
}

impl SlabAllocator for Slab {
    fn quantum(&self) -> usize {
        self.config.quantum
    }

    fn alloc(&self, byte_size: usize) -> Result<NonNull<u8>, AllocError> {
        let quantum = self.config.quantum;
        let quanta = byte_size.div_ceil(quantum);

        // Reject requests that can never fit in a single segment.
        if quanta > self.config.segment_quanta {
            return Err(AllocError::CapacityExceeded {
                requested: byte_size,
                capacity: self.config.segment_bytes(),
            });
        }

        let mut state = self.state.borrow_mut();
        let current = state.current;
        if let Some(ptr) = state.segments[current].alloc(quanta, quantum) {
            return Ok(ptr);
        }

        // Current segment full: reuse a segment opened before the last reset.
        let next = current + 1;
        if next < state.segments.len() {
            if let Some(ptr) = state.segments[next].alloc(quanta, quantum) {
                state.current = next;
                return Ok(ptr);
            }
        }

        if state.segments.len() >= usize::from(self.config.max_segments) {
            return Err(AllocError::CapacityExceeded {
                requested: byte_size,
                capacity: self.config.capacity_bytes(),
            });
        }

        let mut seg = Segment::new(&self.config)?;
        let Some(ptr) = seg.alloc(quanta, quantum) else {
            return Err(AllocError::CapacityExceeded {
                requested: byte_size,
                capacity: self.config.segment_bytes(),
            });
        };
        state.segments.push(seg);
        state.current = state.segments.len() - 1;
        debug!(
            segment = state.current,
            segment_bytes = self.config.segment_bytes(),
            "slab opened segment"
        );
        Ok(ptr)
    }

    unsafe fn free(&self, ptr: NonNull<u8>, byte_size: usize) {
        let quantum = self.config.quantum;
        let quanta = byte_size.div_ceil(quantum);
        let mut state = self.state.borrow_mut();
        let current = state.current;
        state.segments[current].release_top(ptr, quanta, quantum);
    }
}

impl std::fmt::Debug for Slab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Slab")
            .field("config", &self.config)
            .field("segments", &state.segments.len())
            .field("current", &state.current)
            .field("used_quanta", &state.segments.iter().map(|s| s.cursor).sum::<usize>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(quantum: usize, segment_quanta: usize, max_segments: u16) -> Slab {
        Slab::new(SlabConfig {
            quantum,
            segment_quanta,
            max_segments,
        })
        .unwrap()
    }

    #[test]
    fn rounding_matches_quantum() {
        assert_eq!(quanta_for::<u32>(4, 8).unwrap(), 2);
        assert_eq!(byte_size_for::<u32>(4, 8).unwrap(), 16);
        assert_eq!(quanta_for::<u32>(3, 8).unwrap(), 2);
        assert_eq!(byte_size_for::<u8>(1, 16).unwrap(), 16);
        assert_eq!(quanta_for::<u64>(0, 16).unwrap(), 0);
        assert_eq!(quanta_for::<()>(100, 16).unwrap(), 0);
    }

    #[test]
    fn rounding_overflow_is_an_error() {
        assert!(matches!(
            byte_size_for::<u64>(usize::MAX / 2, 8),
            Err(AllocError::LayoutOverflow { .. })
        ));
    }

    #[test]
    fn blocks_are_quantum_aligned_and_sequential() {
        let slab = small(16, 64, 2);
        let a = slab.alloc(5).unwrap();
        let b = slab.alloc(16).unwrap();
        assert_eq!(a.as_ptr() as usize % 16, 0);
        assert_eq!(b.as_ptr() as usize - a.as_ptr() as usize, 16);
        assert_eq!(slab.used_quanta(), 2);
        assert_eq!(slab.used_bytes(), 32);
    }

    #[test]
    fn grows_into_new_segment() {
        let slab = small(8, 4, 3);
        slab.alloc(32).unwrap();
        assert_eq!(slab.remaining_in_segment(), 0);
        slab.alloc(8).unwrap();
        assert_eq!(slab.segment_count(), 2);
        assert_eq!(slab.memory_bytes(), 64);
    }

    #[test]
    fn capacity_exceeded_when_segments_exhausted() {
        let slab = small(8, 2, 2);
        slab.alloc(16).unwrap();
        slab.alloc(16).unwrap();
        assert!(matches!(
            slab.alloc(1),
            Err(AllocError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn oversized_request_is_error_not_panic() {
        let slab = small(8, 4, 4);
        assert!(matches!(
            slab.alloc(33),
            Err(AllocError::CapacityExceeded {
                requested: 33,
                capacity: 32
            })
        ));
        assert!(slab.alloc(32).is_ok());
    }

    #[test]
    fn free_of_top_block_rolls_back() {
        let slab = small(8, 8, 1);
        let _a = slab.alloc(8).unwrap();
        let b = slab.alloc(16).unwrap();
        // SAFETY: `b` came from this slab with the same size.
        unsafe { slab.free(b, 16) };
        assert_eq!(slab.used_quanta(), 1);
        let c = slab.alloc(16).unwrap();
        assert_eq!(b, c);
    }

    #[test]
    fn free_of_older_block_is_deferred() {
        let slab = small(8, 8, 1);
        let a = slab.alloc(8).unwrap();
        slab.alloc(8).unwrap();
        // SAFETY: `a` came from this slab with the same size.
        unsafe { slab.free(a, 8) };
        assert_eq!(slab.used_quanta(), 2);
    }

    #[test]
    fn reset_reuses_segments() {
        let mut slab = small(8, 2, 4);
        let first = slab.alloc(16).unwrap();
        slab.alloc(16).unwrap();
        assert_eq!(slab.segment_count(), 2);
        slab.reset();
        assert_eq!(slab.used_quanta(), 0);
        assert_eq!(slab.alloc(16).unwrap(), first);
        slab.alloc(16).unwrap();
        assert_eq!(slab.segment_count(), 2);
    }

    #[test]
    fn zero_byte_request_reserves_nothing() {
        let slab = small(8, 2, 1);
        slab.alloc(0).unwrap();
        assert_eq!(slab.used_quanta(), 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(matches!(
            Slab::with_quantum(3),
            Err(AllocError::InvalidConfig { .. })
        ));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn rounded_request_covers_elements(
                count in 0usize..10_000,
                shift in 0u32..8,
            ) {
                let quantum = 1usize << shift;
                let bytes = byte_size_for::<u32>(count, quantum).unwrap();
                prop_assert_eq!(bytes % quantum, 0);
                prop_assert!(bytes >= count * 4);
                prop_assert!(bytes < count * 4 + quantum);
                prop_assert_eq!(bytes / quantum, quanta_for::<u32>(count, quantum).unwrap());
            }

            #[test]
            fn freeing_in_reverse_order_empties_slab(
                sizes in prop::collection::vec(1usize..64, 0..32),
            ) {
                let slab = small(8, 512, 1);
                let blocks: Vec<_> = sizes
                    .iter()
                    .map(|&n| (slab.alloc(n).unwrap(), n))
                    .collect();
                let expected: usize = sizes.iter().map(|n| n.div_ceil(8)).sum();
                prop_assert_eq!(slab.used_quanta(), expected);
                for &(ptr, n) in blocks.iter().rev() {
                    // SAFETY: each block came from `slab` with this size.
                    unsafe { slab.free(ptr, n) };
                }
                prop_assert_eq!(slab.used_quanta(), 0);
            }
        }
    }
}
