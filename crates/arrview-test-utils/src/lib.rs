//! Test doubles for arrview development.
//!
//! Provides allocators that record what they are asked for
//! ([`RecordingSlab`], [`CountingAllocator`]) and an element type that
//! counts its own drops ([`DropCounter`]), so tests can check request sizes
//! and leaks without reaching into allocator internals.

#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

use std::cell::{Cell, RefCell};
use std::ptr::NonNull;
use std::rc::Rc;

use arrview_alloc::{AllocError, BulkAllocator, Global, Slab, SlabAllocator, SlabConfig};

/// A [`Slab`] that remembers every byte-size request and release.
///
/// Requests are recorded before they reach the inner slab, so failed
/// requests show up too.
pub struct RecordingSlab {
    inner: Slab,
    requests: RefCell<Vec<usize>>,
    frees: RefCell<Vec<usize>>,
}

impl RecordingSlab {
    pub fn new(config: SlabConfig) -> Result<Self, AllocError> {
        Ok(Self {
            inner: Slab::new(config)?,
            requests: RefCell::default(),
            frees: RefCell::default(),
        })
    }

    /// A recording slab with the given quantum and default sizing.
    ///
    /// # Panics
    ///
    /// Panics if `quantum` is not a power of two.
    pub fn with_quantum(quantum: usize) -> Self {
        match Self::new(SlabConfig::new(quantum)) {
            Ok(slab) => slab,
            Err(e) => panic!("bad test slab: {e}"),
        }
    }

    /// Byte sizes passed to `alloc`, in call order.
    pub fn requests(&self) -> Vec<usize> {
        self.requests.borrow().clone()
    }

    /// Byte sizes passed to `free`, in call order.
    pub fn frees(&self) -> Vec<usize> {
        self.frees.borrow().clone()
    }

    /// Number of `alloc` calls minus number of `free` calls. Sizes are not
    /// matched up.
    pub fn outstanding(&self) -> usize {
        self.requests
            .borrow()
            .len()
            .saturating_sub(self.frees.borrow().len())
    }

    pub fn inner(&self) -> &Slab {
        &self.inner
    }

    /// Reset the inner slab and clear the log.
    pub fn reset(&mut self) {
        self.inner.reset();
        self.clear_log();
    }

    pub fn clear_log(&mut self) {
        self.requests.get_mut().clear();
        self.frees.get_mut().clear();
    }
}

impl SlabAllocator for RecordingSlab {
    fn quantum(&self) -> usize {
        self.inner.quantum()
    }

    fn alloc(&self, byte_size: usize) -> Result<NonNull<u8>, AllocError> {
        self.requests.borrow_mut().push(byte_size);
        self.inner.alloc(byte_size)
    }

    unsafe fn free(&self, ptr: NonNull<u8>, byte_size: usize) {
        self.frees.borrow_mut().push(byte_size);
        // SAFETY: forwarded from the caller; the block came from `inner`.
        unsafe { self.inner.free(ptr, byte_size) }
    }
}

/// Bulk allocator that delegates to [`Global`] and keeps live counts.
///
/// ```
/// use arrview_alloc::{alloc_fill_with, dispose_with};
/// use arrview_test_utils::CountingAllocator;
///
/// let counter = CountingAllocator::new();
/// let mut h = alloc_fill_with(3, &0u8, &counter);
/// assert_eq!(counter.live_blocks(), 1);
/// // SAFETY: `h` came from `counter`.
/// unsafe { dispose_with(&mut h, &counter) };
/// counter.assert_no_leaks();
/// ```
#[derive(Debug, Default)]
pub struct CountingAllocator {
    allocs: Cell<usize>,
    frees: Cell<usize>,
    live_elements: Cell<usize>,
}

impl CountingAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total `alloc` calls so far.
    pub fn allocs(&self) -> usize {
        self.allocs.get()
    }

    /// Total `free` calls so far.
    pub fn frees(&self) -> usize {
        self.frees.get()
    }

    /// Blocks allocated and not yet freed.
    pub fn live_blocks(&self) -> usize {
        self.allocs.get() - self.frees.get()
    }

    /// Elements in blocks allocated and not yet freed.
    pub fn live_elements(&self) -> usize {
        self.live_elements.get()
    }

    /// # Panics
    ///
    /// Panics if any block is still live.
    pub fn assert_no_leaks(&self) {
        assert_eq!(
            self.live_blocks(),
            0,
            "{} block(s) leaked, {} element(s)",
            self.live_blocks(),
            self.live_elements()
        );
    }
}

impl BulkAllocator for CountingAllocator {
    fn alloc<T>(&self, count: usize) -> NonNull<T> {
        let ptr = Global.alloc::<T>(count);
        self.allocs.set(self.allocs.get() + 1);
        self.live_elements.set(self.live_elements.get() + count);
        ptr
    }

    unsafe fn free<T>(&self, ptr: NonNull<T>, count: usize) {
        self.frees.set(self.frees.get() + 1);
        self.live_elements
            .set(self.live_elements.get().saturating_sub(count));
        // SAFETY: forwarded from the caller; every block came from `Global`.
        unsafe { Global.free(ptr, count) }
    }
}

/// Clonable element that bumps a shared counter each time a copy is dropped.
#[derive(Debug)]
pub struct DropCounter {
    drops: Rc<Cell<usize>>,
    pub value: u32,
}

impl DropCounter {
    /// A template element and the counter its copies share.
    pub fn new(value: u32) -> (Self, Rc<Cell<usize>>) {
        let drops = Rc::new(Cell::new(0));
        (
            Self {
                drops: Rc::clone(&drops),
                value,
            },
            drops,
        )
    }

    /// Another element sharing this one's counter.
    pub fn sibling(&self, value: u32) -> Self {
        Self {
            drops: Rc::clone(&self.drops),
            value,
        }
    }
}

impl Clone for DropCounter {
    fn clone(&self) -> Self {
        self.sibling(self.value)
    }
}

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}
