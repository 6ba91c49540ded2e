//! The block pool: the free-list half of the allocator, without a platform.
//!
//! The concurrent variants of the front crate share this core. Growth policy, locking, and the mapping of threads
//! to pools are all decided above; the pool only recycles blocks it is given, through an unordered free list with
//! O(1) insertion.
//!
//! Unlike the sequential heap, the pool keeps no list of all blocks: with no coalescing, the fixed header offset
//! is the only metadata recovery needed.

use core::ptr::NonNull;

use crate::internals::{
    block::{BlockHeader, MIN_SPLIT_REMAINDER},
    free_list::FreeList,
};
use crate::HEADER_SIZE;

use super::strategy::Strategy;

/// Carves a single allocated block out of a fresh region, returning its payload.
///
/// This is how freshly grown memory enters a pool: the caller hands the payload to the user, and the block joins
/// the pool's free list on release.
///
/// #   Safety
///
/// -   Assumes `region` points to at least `payload_size + HEADER_SIZE` writable bytes, exclusively owned.
/// -   Assumes `region` is aligned on `ALIGNMENT`, and `payload_size` is a multiple of `ALIGNMENT`.
pub unsafe fn carve(region: NonNull<u8>, payload_size: usize) -> NonNull<u8> {
    //  Safety:
    //  -   Forwarded to the caller.
    let header = BlockHeader::carve(region, payload_size);

    //  Safety:
    //  -   Bounded lifetime.
    unsafe { header.as_ref() }.payload()
}

/// BlockPool.
pub struct BlockPool {
    free: FreeList,
}

impl BlockPool {
    /// Creates an empty instance.
    pub const fn new() -> Self { Self { free: FreeList::new() } }

    /// Takes a block able to hold `size` payload bytes out of the pool, placed by `strategy`.
    ///
    /// `size` is expected to have gone through `request_size` already. When the selected block is large enough to
    /// also hold a header and a worthwhile remainder, the rear `size` bytes are carved off and handed out, and the
    /// front shrinks in place without moving in the free list.
    ///
    /// Returns None when no block fits; growing is the caller's business.
    pub fn take(&self, size: usize, strategy: Strategy) -> Option<NonNull<u8>> {
        let header = self.free.search(size, strategy)?;

        //  Safety:
        //  -   Bounded lifetime.
        let block = unsafe { header.as_ref() };

        if block.payload_size() >= size + HEADER_SIZE + MIN_SPLIT_REMAINDER {
            let remainder = block.payload_size() - size - HEADER_SIZE;

            block.set_payload_size(remainder);

            //  Safety:
            //  -   `remainder` is within the original payload, hence the result is non-null.
            let region = unsafe { NonNull::new_unchecked(block.payload().as_ptr().add(remainder)) };

            //  Safety:
            //  -   The rear of the original payload is writable, exclusively owned, sufficiently sized, and
            //      aligned, since `remainder` and the payload address are multiples of `ALIGNMENT`.
            return Some(unsafe { carve(region, size) });
        }

        self.free.remove(header);

        Some(block.payload())
    }

    /// Returns a block to the pool.
    ///
    /// Putting back an already pooled block is a no-op.
    ///
    /// #   Safety
    ///
    /// -   Assumes `payload` designates a block carved by this allocator, not currently in any pool.
    /// -   Assumes the caller relinquishes all access to the payload.
    pub unsafe fn put(&self, payload: NonNull<u8>) {
        //  Safety:
        //  -   A live header precedes the payload.
        let header = BlockHeader::from_payload(payload);

        //  Safety:
        //  -   Bounded lifetime.
        if unsafe { header.as_ref() }.is_available() {
            return;
        }

        self.free.insert_front(header);
    }

    /// Returns the sum of header and payload bytes over every block currently in the pool.
    pub fn free_bytes(&self) -> usize { self.free.total_bytes() }

    /// Returns whether the block with the given payload is currently in the pool.
    pub fn contains(&self, payload: NonNull<u8>) -> bool { self.free.contains_payload(payload) }
}

impl Default for BlockPool {
    fn default() -> Self { Self::new() }
}

// mod tests
