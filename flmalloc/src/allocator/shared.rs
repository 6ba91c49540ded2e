//! The globally-locked allocator.
//!
//! The simplest concurrent variant: one free list and one growth path, both behind a single lock. Every operation
//! serializes, in exchange for blocks flowing freely between threads.

use std::alloc::{GlobalAlloc, Layout};
use std::ptr::{self, NonNull};

use parking_lot::Mutex;

use flmalloc_core::{carve, request_size, AllocError, BlockPool, Platform, Strategy, ALIGNMENT, HEADER_SIZE};

use crate::platform::BrkPlatform;

//  The pool's intrusive links make it `!Send`; the lock guarantees a single thread reaches them at a time.
struct PoolState {
    pool: BlockPool,
    carved: usize,
}

//  Safety:
//  -   The state is only ever reached through the mutex, by one thread at a time.
unsafe impl Send for PoolState {}

/// SharedAllocator.
///
/// The variant with a single free list shared by all threads, under a single lock.
pub struct SharedAllocator {
    platform: BrkPlatform,
    state: Mutex<PoolState>,
}

impl SharedAllocator {
    /// Creates an instance; no memory is requested until the first allocation.
    pub const fn new() -> Self {
        Self {
            platform: BrkPlatform::new(),
            state: Mutex::new(PoolState { pool: BlockPool::new(), carved: 0 }),
        }
    }

    /// Allocates a block able to hold `size` bytes, placed by `strategy`.
    pub fn allocate(&self, size: usize, strategy: Strategy) -> Result<NonNull<u8>, AllocError> {
        let size = request_size(size)?;

        let mut state = self.state.lock();

        if let Some(payload) = state.pool.take(size, strategy) {
            return Ok(payload);
        }

        //  Growth happens under the same lock: moving the break and carving the block is atomic with respect to
        //  every other user of this allocator.

        //  `request_size` guaranteed the addition cannot overflow.
        let total = size + HEADER_SIZE;

        //  Safety:
        //  -   `total` is a multiple of `ALIGNMENT`, and growth is serialized by the lock.
        let region = unsafe { self.platform.grow(total) }.ok_or(AllocError::HeapExhausted)?;

        state.carved += total;

        //  Safety:
        //  -   The region is writable, exclusively owned, sufficiently sized, and aligned.
        Ok(unsafe { carve(region, size) })
    }

    /// Returns a block to the allocator.
    ///
    /// Releasing an already free block is a no-op.
    ///
    /// #   Safety
    ///
    /// -   Assumes `payload` was returned by `allocate` on this very allocator, on any thread.
    /// -   Assumes the caller relinquishes all access to the payload.
    pub unsafe fn release(&self, payload: NonNull<u8>) {
        let state = self.state.lock();

        //  Safety:
        //  -   Forwarded to the caller.
        unsafe { state.pool.put(payload) };
    }

    /// Returns the sum of header and payload bytes carved out of the heap.
    pub fn total_heap_bytes(&self) -> usize { self.state.lock().carved }

    /// Returns the sum of header and payload bytes currently free.
    pub fn free_heap_bytes(&self) -> usize { self.state.lock().pool.free_bytes() }
}

impl Default for SharedAllocator {
    fn default() -> Self { Self::new() }
}

//  Safety:
//  -   `alloc` hands out `ALIGNMENT`-aligned payloads, and refuses layouts demanding more.
//  -   `dealloc` accepts exactly the pointers `alloc` handed out.
unsafe impl GlobalAlloc for SharedAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if layout.align() > ALIGNMENT {
            return ptr::null_mut();
        }

        //  `Layout` permits zero sizes, the free lists do not.
        match self.allocate(layout.size().max(1), Strategy::BestFit) {
            Ok(payload) => payload.as_ptr(),
            Err(_) => ptr::null_mut(),
        }
    }

    unsafe fn dealloc(&self, pointer: *mut u8, _layout: Layout) {
        if let Some(payload) = NonNull::new(pointer) {
            //  Safety:
            //  -   `payload` was handed out by `alloc`.
            unsafe { self.release(payload) };
        }
    }
}
