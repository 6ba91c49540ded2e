//! The free list: the subset of blocks currently available for reuse.
//!
//! The list is doubly-linked through the `free_prev`/`free_next` links of the block headers. The sequential heap
//! keeps it in ascending address order (a prerequisite for the "lowest address that fits" reading of first-fit);
//! the pool variants push at the head in O(1) since nothing there relies on ordering.
//!
//! Availability tracking is owned by the list: inserting marks a block available, removing marks it unavailable.

use core::ptr::NonNull;

use crate::{HEADER_SIZE, Strategy};

use super::block::{BlockHeader, Link};

/// FreeList.
pub(crate) struct FreeList {
    head: Link,
}

impl FreeList {
    /// Creates an empty instance.
    pub(crate) const fn new() -> Self { Self { head: Link::new() } }

    /// Returns whether the list is empty, or not.
    pub(crate) fn is_empty(&self) -> bool { self.head.get().is_none() }

    /// Searches the list for a block able to hold `size` payload bytes, with the given strategy.
    ///
    /// Read-only: the list is not modified, whether the search succeeds or not.
    pub(crate) fn search(&self, size: usize, strategy: Strategy) -> Option<NonNull<BlockHeader>> {
        match strategy {
            Strategy::FirstFit => self.first_fit(size),
            Strategy::BestFit => self.best_fit(size),
        }
    }

    /// Prepends the block to the head of the list, marking it available.
    pub(crate) fn insert_front(&self, header: NonNull<BlockHeader>) {
        //  Safety:
        //  -   Bounded lifetime.
        let block = unsafe { header.as_ref() };

        debug_assert!(!block.is_available());

        block.set_available(true);
        block.free_prev.set(None);
        block.free_next.set(self.head.get());

        if let Some(next) = self.head.get() {
            //  Safety:
            //  -   Bounded lifetime.
            unsafe { next.as_ref() }.free_prev.set(Some(header));
        }

        self.head.set(Some(header));
    }

    /// Inserts the block in ascending address order, marking it available.
    pub(crate) fn insert_ordered(&self, header: NonNull<BlockHeader>) {
        //  Safety:
        //  -   Bounded lifetime.
        let block = unsafe { header.as_ref() };

        debug_assert!(!block.is_available());

        block.set_available(true);

        //  Locate the first block at a higher address, tracking its predecessor.
        let mut previous: Option<NonNull<BlockHeader>> = None;
        let mut current = self.head.get();

        while let Some(candidate) = current {
            //  Safety:
            //  -   Bounded lifetime.
            let candidate_block = unsafe { candidate.as_ref() };

            if candidate_block.address() > block.address() {
                break;
            }

            previous = Some(candidate);
            current = candidate_block.free_next.get();
        }

        block.free_prev.set(previous);
        block.free_next.set(current);

        match previous {
            //  Safety:
            //  -   Bounded lifetime.
            Some(previous) => unsafe { previous.as_ref() }.free_next.set(Some(header)),
            None => self.head.set(Some(header)),
        }

        if let Some(next) = current {
            //  Safety:
            //  -   Bounded lifetime.
            unsafe { next.as_ref() }.free_prev.set(Some(header));
        }
    }

    /// Unlinks the block from the list, marking it unavailable.
    pub(crate) fn remove(&self, header: NonNull<BlockHeader>) {
        //  Safety:
        //  -   Bounded lifetime.
        let block = unsafe { header.as_ref() };

        debug_assert!(block.is_available());

        let previous = block.free_prev.take();
        let next = block.free_next.take();

        match previous {
            //  Safety:
            //  -   Bounded lifetime.
            Some(previous) => unsafe { previous.as_ref() }.free_next.set(next),
            None => {
                debug_assert_eq!(Some(header), self.head.get());
                self.head.set(next);
            },
        }

        if let Some(next) = next {
            //  Safety:
            //  -   Bounded lifetime.
            unsafe { next.as_ref() }.free_prev.set(previous);
        }

        block.set_available(false);
    }

    /// Replaces `old` by `new` in place, preserving the list position.
    ///
    /// `old` becomes unavailable and unlinked, `new` becomes available.
    pub(crate) fn replace(&self, old: NonNull<BlockHeader>, new: NonNull<BlockHeader>) {
        //  Safety:
        //  -   Bounded lifetimes.
        let (old_block, new_block) = unsafe { (old.as_ref(), new.as_ref()) };

        debug_assert!(old_block.is_available());
        debug_assert!(!new_block.is_available());

        let previous = old_block.free_prev.take();
        let next = old_block.free_next.take();

        new_block.free_prev.set(previous);
        new_block.free_next.set(next);

        match previous {
            //  Safety:
            //  -   Bounded lifetime.
            Some(previous) => unsafe { previous.as_ref() }.free_next.set(Some(new)),
            None => {
                debug_assert_eq!(Some(old), self.head.get());
                self.head.set(Some(new));
            },
        }

        if let Some(next) = next {
            //  Safety:
            //  -   Bounded lifetime.
            unsafe { next.as_ref() }.free_prev.set(Some(new));
        }

        old_block.set_available(false);
        new_block.set_available(true);
    }

    /// Returns the sum of header and payload sizes over every block in the list.
    pub(crate) fn total_bytes(&self) -> usize {
        let mut total = 0;
        let mut current = self.head.get();

        while let Some(header) = current {
            //  Safety:
            //  -   Bounded lifetime.
            let block = unsafe { header.as_ref() };

            total += block.payload_size() + HEADER_SIZE;
            current = block.free_next.get();
        }

        total
    }

    /// Returns whether a block with the given payload address is in the list.
    pub(crate) fn contains_payload(&self, payload: NonNull<u8>) -> bool {
        let mut current = self.head.get();

        while let Some(header) = current {
            //  Safety:
            //  -   Bounded lifetime.
            let block = unsafe { header.as_ref() };

            if block.payload() == payload {
                return true;
            }

            current = block.free_next.get();
        }

        false
    }

    //  Scans in list order, returning the first block large enough.
    fn first_fit(&self, size: usize) -> Option<NonNull<BlockHeader>> {
        let mut current = self.head.get();

        while let Some(header) = current {
            //  Safety:
            //  -   Bounded lifetime.
            let block = unsafe { header.as_ref() };

            if block.payload_size() >= size {
                return Some(header);
            }

            current = block.free_next.get();
        }

        None
    }

    //  Scans the entire list, returning the smallest block large enough.
    //
    //  An exact match short-circuits the scan, no fit can be tighter. Amongst equally tight blocks, the first
    //  encountered in list order wins.
    fn best_fit(&self, size: usize) -> Option<NonNull<BlockHeader>> {
        let mut best: Option<NonNull<BlockHeader>> = None;
        let mut best_size = usize::MAX;
        let mut current = self.head.get();

        while let Some(header) = current {
            //  Safety:
            //  -   Bounded lifetime.
            let block = unsafe { header.as_ref() };

            if block.payload_size() == size {
                return Some(header);
            }

            if block.payload_size() > size && block.payload_size() < best_size {
                best = Some(header);
                best_size = block.payload_size();
            }

            current = block.free_next.get();
        }

        best
    }
}

// mod tests
