//! The thread-exclusive allocator.
//!
//! Every thread recycles blocks through its own pool, so the hot path is entirely unsynchronized; only growing the
//! process heap, which all pools draw from, takes a lock.
//!
//! A block is owned by whichever pool it was last released into: releasing on a thread other than the allocating
//! one migrates the block, and memory held in a pool is not reclaimed when its thread exits.

use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use flmalloc_core::{carve, request_size, AllocError, BlockPool, Platform, Strategy, HEADER_SIZE};

use crate::platform::BrkPlatform;

//  A single process-wide heap feeds every thread's pool: the pools are per-thread, the break is not.
static PLATFORM: BrkPlatform = BrkPlatform::new();

//  Serializes moves of the break, the one piece of state the pools share.
static GROWTH_LOCK: Mutex<()> = Mutex::new(());

//  Running total of bytes carved out of the heap, across all threads.
static CARVED_BYTES: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static POOL: BlockPool = BlockPool::new();
}

/// ExclusiveAllocator.
///
/// The variant with one free list per thread. All instances are handles to the same process-wide state, mirroring
/// the heap itself being process-wide.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExclusiveAllocator;

impl ExclusiveAllocator {
    /// Creates an instance; no memory is requested until the first allocation.
    pub const fn new() -> Self { Self }

    /// Allocates a block able to hold `size` bytes, placed by `strategy` within the calling thread's pool.
    ///
    /// Blocks pooled by other threads are never considered; when the calling thread's pool has no fit, the heap
    /// grows instead.
    pub fn allocate(&self, size: usize, strategy: Strategy) -> Result<NonNull<u8>, AllocError> {
        let size = request_size(size)?;

        if let Some(payload) = POOL.with(|pool| pool.take(size, strategy)) {
            return Ok(payload);
        }

        self.grow(size)
    }

    /// Returns a block to the calling thread's pool.
    ///
    /// Releasing an already pooled block is a no-op.
    ///
    /// #   Safety
    ///
    /// -   Assumes `payload` was returned by `allocate`, on any thread, and is not currently pooled.
    /// -   Assumes the caller relinquishes all access to the payload.
    pub unsafe fn release(&self, payload: NonNull<u8>) {
        //  Safety:
        //  -   Forwarded to the caller.
        POOL.with(|pool| unsafe { pool.put(payload) });
    }

    /// Returns the sum of header and payload bytes carved out of the heap, across all threads.
    pub fn total_heap_bytes(&self) -> usize { CARVED_BYTES.load(Ordering::Relaxed) }

    /// Returns the sum of header and payload bytes pooled by the calling thread.
    pub fn free_heap_bytes(&self) -> usize { POOL.with(|pool| pool.free_bytes()) }

    /// Returns whether the block with the given payload sits in the calling thread's pool.
    pub fn thread_holds(&self, payload: NonNull<u8>) -> bool { POOL.with(|pool| pool.contains(payload)) }

    #[cold]
    #[inline(never)]
    fn grow(&self, size: usize) -> Result<NonNull<u8>, AllocError> {
        //  `request_size` guaranteed the addition cannot overflow.
        let total = size + HEADER_SIZE;

        let _guard = GROWTH_LOCK.lock();

        //  Safety:
        //  -   `total` is a multiple of `ALIGNMENT`, and growth is serialized by the lock.
        let region = unsafe { PLATFORM.grow(total) }.ok_or(AllocError::HeapExhausted)?;

        CARVED_BYTES.fetch_add(total, Ordering::Relaxed);

        //  Safety:
        //  -   The region is writable, exclusively owned, sufficiently sized, and aligned.
        Ok(unsafe { carve(region, size) })
    }
}
