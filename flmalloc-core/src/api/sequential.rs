//! The sequential heap: the single-threaded allocator over a growing heap boundary.
//!
//! The heap maintains two intrusive lists threaded through the same block headers: the address-ordered list of all
//! blocks ever carved, and the address-ordered free list. The first makes physical neighbors reachable in O(1) for
//! coalescing; the second gives first-fit its "lowest address that fits" meaning.
//!
//! All methods take `&self`: state lives in `Cell`s, which also makes the heap `!Sync` by construction. Wrapping
//! it for concurrent use is the business of the front crate.

use core::{
    marker::PhantomData,
    ptr::NonNull,
};

use crate::internals::{
    block::{BlockHeader, MIN_SPLIT_REMAINDER},
    block_list::BlockList,
    free_list::FreeList,
};
use crate::HEADER_SIZE;

use super::description::request_size;
use super::error::AllocError;
use super::platform::Platform;
use super::report::BlockReport;
use super::strategy::Strategy;

/// SequentialHeap.
pub struct SequentialHeap<P> {
    platform: P,
    blocks: BlockList,
    free: FreeList,
}

impl<P> SequentialHeap<P> {
    /// Creates an empty instance; no memory is requested until the first allocation.
    pub const fn new(platform: P) -> Self {
        Self { platform, blocks: BlockList::new(), free: FreeList::new() }
    }

    /// Returns a reference to the underlying platform.
    pub fn platform(&self) -> &P { &self.platform }

    /// Returns the sum of header and payload bytes over every block ever carved.
    pub fn total_heap_bytes(&self) -> usize { self.blocks.total_bytes() }

    /// Returns the sum of header and payload bytes over every block currently free.
    pub fn free_heap_bytes(&self) -> usize { self.free.total_bytes() }

    /// Returns an iterator over every block, in address order.
    pub fn blocks(&self) -> Blocks<'_> { Blocks { current: self.blocks.head(), _heap: PhantomData } }
}

impl<P: Platform> SequentialHeap<P> {
    /// Allocates a block able to hold `size` bytes, placed by `strategy`.
    ///
    /// A free block is reused when one fits, splitting off the excess when worthwhile; otherwise the heap boundary
    /// is extended by exactly the padded request.
    pub fn allocate(&self, size: usize, strategy: Strategy) -> Result<NonNull<u8>, AllocError> {
        let size = request_size(size)?;

        if let Some(header) = self.free.search(size, strategy) {
            return Ok(self.split_or_consume(header, size));
        }

        self.grow(size)
    }

    /// Returns a block to the free list, merging it with adjacent free neighbors.
    ///
    /// Releasing an already free block is a no-op.
    ///
    /// #   Safety
    ///
    /// -   Assumes `payload` was returned by `allocate` on this very heap.
    /// -   Assumes the caller relinquishes all access to the payload.
    pub unsafe fn release(&self, payload: NonNull<u8>) {
        //  Safety:
        //  -   `payload` was handed out by this allocator.
        let header = BlockHeader::from_payload(payload);

        //  Safety:
        //  -   Bounded lifetime.
        if unsafe { header.as_ref() }.is_available() {
            return;
        }

        self.free.insert_ordered(header);

        self.coalesce(header);
    }

    //  Extends the heap boundary by exactly the padded request, plus header.
    fn grow(&self, size: usize) -> Result<NonNull<u8>, AllocError> {
        //  `request_size` guaranteed the addition cannot overflow, and both terms are multiples of `ALIGNMENT`.
        let total = size + HEADER_SIZE;

        //  Safety:
        //  -   `total` is a multiple of `ALIGNMENT`.
        let region = unsafe { self.platform.grow(total) }.ok_or(AllocError::HeapExhausted)?;

        //  Safety:
        //  -   The region is writable, exclusively owned, sufficiently sized, and aligned.
        let header = unsafe { BlockHeader::carve(region, size) };

        self.blocks.push_tail(header);

        //  Safety:
        //  -   Bounded lifetime.
        Ok(unsafe { header.as_ref() }.payload())
    }

    //  Takes the block out of the free list, carving off the rear excess as a new free block when it can hold a
    //  header and a worthwhile payload of its own.
    //
    //  The front part keeps the original payload address, so the caller's pointer is independent of whether a
    //  split occurred; the remainder inherits the original's free-list position.
    fn split_or_consume(&self, header: NonNull<BlockHeader>, size: usize) -> NonNull<u8> {
        //  Safety:
        //  -   Bounded lifetime.
        let block = unsafe { header.as_ref() };

        if block.payload_size() >= size + HEADER_SIZE + MIN_SPLIT_REMAINDER {
            let remainder_size = block.payload_size() - size - HEADER_SIZE;

            block.set_payload_size(size);

            //  Safety:
            //  -   `size` is within the original payload, hence the result is non-null.
            let region = unsafe { NonNull::new_unchecked(block.payload().as_ptr().add(size)) };

            //  Safety:
            //  -   The rear of the original payload is writable, exclusively owned, sufficiently sized, and
            //      aligned, since both `size` and the payload address are multiples of `ALIGNMENT`.
            let remainder = unsafe { BlockHeader::carve(region, remainder_size) };

            self.blocks.insert_after(header, remainder);
            self.free.replace(header, remainder);
        } else {
            self.free.remove(header);
        }

        block.payload()
    }

    //  Merges the block with its address-successor, then its address-predecessor with the result, so that at most
    //  two merges occur and no two free neighbors survive.
    fn coalesce(&self, header: NonNull<BlockHeader>) {
        //  Safety:
        //  -   Bounded lifetime.
        let previous = unsafe { header.as_ref() }.list_prev.get();

        self.try_merge(header);

        if let Some(previous) = previous {
            self.try_merge(previous);
        }
    }

    //  Absorbs the next block into `header`, if both are free and physically adjacent.
    //
    //  The survivor keeps its free-list position; only the absorbed block is unlinked from both lists.
    fn try_merge(&self, header: NonNull<BlockHeader>) {
        //  Safety:
        //  -   Bounded lifetime.
        let block = unsafe { header.as_ref() };

        if !block.is_available() {
            return;
        }

        let next = match block.list_next.get() {
            Some(next) => next,
            None => return,
        };

        //  Safety:
        //  -   Bounded lifetime.
        let next_block = unsafe { next.as_ref() };

        if !next_block.is_available() || !block.is_adjacent_to(next_block) {
            return;
        }

        block.set_payload_size(block.payload_size() + HEADER_SIZE + next_block.payload_size());

        self.free.remove(next);
        self.blocks.unlink(next);
    }
}

/// An iterator over the blocks of a heap, in address order.
pub struct Blocks<'a> {
    current: Option<NonNull<BlockHeader>>,
    _heap: PhantomData<&'a ()>,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = BlockReport;

    fn next(&mut self) -> Option<BlockReport> {
        let header = self.current?;

        //  Safety:
        //  -   Bounded lifetime, the heap is borrowed for `'a`.
        let block = unsafe { header.as_ref() };

        self.current = block.list_next.get();

        Some(BlockReport::of(block))
    }
}

// mod tests
