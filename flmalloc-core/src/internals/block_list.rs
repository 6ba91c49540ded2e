//! The address-ordered list of all blocks ever carved from the heap.
//!
//! Only the sequential heap maintains this list; the pool variants locate blocks exclusively through the fixed
//! header offset and need no global view. The list is append-only at the tail (heap growth), grows in the middle
//! on split, and shrinks on merge. Blocks are never re-ordered: addresses only ever increase towards the tail.

use core::ptr::NonNull;

use crate::HEADER_SIZE;

use super::block::{BlockHeader, Link};

/// BlockList.
pub(crate) struct BlockList {
    head: Link,
    tail: Link,
}

impl BlockList {
    /// Creates an empty instance.
    pub(crate) const fn new() -> Self { Self { head: Link::new(), tail: Link::new() } }

    /// Returns the first block, lowest in address, if any.
    pub(crate) fn head(&self) -> Option<NonNull<BlockHeader>> { self.head.get() }

    /// Appends a freshly carved block at the tail.
    pub(crate) fn push_tail(&self, header: NonNull<BlockHeader>) {
        //  Safety:
        //  -   Bounded lifetime.
        let block = unsafe { header.as_ref() };

        debug_assert!(block.list_prev.get().is_none() && block.list_next.get().is_none());

        block.list_prev.set(self.tail.get());

        match self.tail.get() {
            //  Safety:
            //  -   Bounded lifetime.
            Some(tail) => unsafe { tail.as_ref() }.list_next.set(Some(header)),
            None => self.head.set(Some(header)),
        }

        self.tail.set(Some(header));
    }

    /// Inserts `header` immediately after `anchor`, as produced by splitting `anchor`.
    pub(crate) fn insert_after(&self, anchor: NonNull<BlockHeader>, header: NonNull<BlockHeader>) {
        //  Safety:
        //  -   Bounded lifetimes.
        let (anchor_block, block) = unsafe { (anchor.as_ref(), header.as_ref()) };

        let next = anchor_block.list_next.get();

        block.list_prev.set(Some(anchor));
        block.list_next.set(next);
        anchor_block.list_next.set(Some(header));

        match next {
            //  Safety:
            //  -   Bounded lifetime.
            Some(next) => unsafe { next.as_ref() }.list_prev.set(Some(header)),
            None => self.tail.set(Some(header)),
        }
    }

    /// Unlinks a block absorbed by a merge.
    pub(crate) fn unlink(&self, header: NonNull<BlockHeader>) {
        //  Safety:
        //  -   Bounded lifetime.
        let block = unsafe { header.as_ref() };

        let previous = block.list_prev.take();
        let next = block.list_next.take();

        match previous {
            //  Safety:
            //  -   Bounded lifetime.
            Some(previous) => unsafe { previous.as_ref() }.list_next.set(next),
            None => self.head.set(next),
        }

        match next {
            //  Safety:
            //  -   Bounded lifetime.
            Some(next) => unsafe { next.as_ref() }.list_prev.set(previous),
            None => self.tail.set(previous),
        }
    }

    /// Returns the sum of header and payload sizes over every block ever carved.
    pub(crate) fn total_bytes(&self) -> usize {
        let mut total = 0;
        let mut current = self.head.get();

        while let Some(header) = current {
            //  Safety:
            //  -   Bounded lifetime.
            let block = unsafe { header.as_ref() };

            total += block.payload_size() + HEADER_SIZE;
            current = block.list_next.get();
        }

        total
    }
}

// mod tests
