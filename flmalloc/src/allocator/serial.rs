//! The single-threaded allocator.

use std::ptr::NonNull;

use flmalloc_core::{AllocError, BlockReport, SequentialHeap, Strategy};

use crate::platform::BrkPlatform;

/// SerialAllocator.
///
/// The full-featured, single-threaded variant: address-ordered reuse, splitting, and coalescing of neighbors.
///
/// The heap state lives in unsynchronized cells, so the type is neither `Send` nor `Sync`; the compiler fences it
/// to the thread that created it.
pub struct SerialAllocator {
    heap: SequentialHeap<BrkPlatform>,
}

impl SerialAllocator {
    /// Creates an instance; no memory is requested until the first allocation.
    pub const fn new() -> Self { Self { heap: SequentialHeap::new(BrkPlatform::new()) } }

    /// Allocates a block able to hold `size` bytes, placed by `strategy`.
    pub fn allocate(&self, size: usize, strategy: Strategy) -> Result<NonNull<u8>, AllocError> {
        self.heap.allocate(size, strategy)
    }

    /// Returns a block to the allocator, merging it with adjacent free neighbors.
    ///
    /// Releasing an already free block is a no-op.
    ///
    /// #   Safety
    ///
    /// -   Assumes `payload` was returned by `allocate` on this very allocator.
    /// -   Assumes the caller relinquishes all access to the payload.
    pub unsafe fn release(&self, payload: NonNull<u8>) { self.heap.release(payload) }

    /// Returns the sum of header and payload bytes over every block ever carved.
    pub fn total_heap_bytes(&self) -> usize { self.heap.total_heap_bytes() }

    /// Returns the sum of header and payload bytes over every block currently free.
    pub fn free_heap_bytes(&self) -> usize { self.heap.free_heap_bytes() }

    /// Returns a report of every block, in address order, for debugging.
    pub fn blocks(&self) -> Vec<BlockReport> { self.heap.blocks().collect() }
}

impl Default for SerialAllocator {
    fn default() -> Self { Self::new() }
}
