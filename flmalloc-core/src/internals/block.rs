//! Block metadata.
//!
//! A block is a header embedded in the heap immediately before the memory it describes. Whilst allocated, the payload
//! is purely in the hands of the user; the header remains the allocator's property at all times.
//!
//! Headers never move: a block only ever changes size by being split or merged in place, and is only destroyed by
//! being absorbed into an address-neighbor.

use core::{
    cell::Cell,
    ptr::{self, NonNull},
};

use crate::{ALIGNMENT, HEADER_SIZE};
use crate::utils;

/// Payload size below which a split remainder is not worth keeping as a separate block.
pub(crate) const MIN_SPLIT_REMAINDER: usize = 8;

/// BlockHeader.
///
/// The metadata record preceding each payload carved from the heap.
///
/// The alignment matches `ALIGNMENT`, rounding the header size up to a whole number of alignment units on every
/// target; the split paths rely on it to carve new headers at aligned addresses.
#[repr(C, align(16))]
pub(crate) struct BlockHeader {
    payload_size: Cell<usize>,
    available: Cell<bool>,
    /// Previous block in the address-ordered list of all blocks; unused by the pool variants.
    pub(crate) list_prev: Link,
    /// Next block in the address-ordered list of all blocks; unused by the pool variants.
    pub(crate) list_next: Link,
    /// Previous block in the free list.
    pub(crate) free_prev: Link,
    /// Next block in the free list.
    pub(crate) free_next: Link,
}

impl BlockHeader {
    /// In-place constructs an allocated, unlinked block at the start of `region`.
    ///
    /// #   Safety
    ///
    /// -   Assumes `region` points to at least `payload_size + HEADER_SIZE` writable bytes, exclusively owned.
    /// -   Assumes `region` is aligned on `ALIGNMENT`.
    pub(crate) unsafe fn carve(region: NonNull<u8>, payload_size: usize) -> NonNull<BlockHeader> {
        debug_assert!(utils::is_aligned(region.as_ptr() as usize, ALIGNMENT));

        let header = region.cast::<BlockHeader>();

        //  Safety:
        //  -   `region` is writable, sufficiently sized, and sufficiently aligned.
        ptr::write(header.as_ptr(), BlockHeader::new(payload_size));

        header
    }

    /// Recovers the header of a block from its payload pointer.
    ///
    /// This is the single metadata-recovery rule: the header always sits exactly `HEADER_SIZE` bytes before the
    /// payload, for every block including the front-most one.
    ///
    /// #   Safety
    ///
    /// -   Assumes `payload` was handed out by this allocator, so that a live header precedes it.
    pub(crate) unsafe fn from_payload(payload: NonNull<u8>) -> NonNull<BlockHeader> {
        //  Safety:
        //  -   The header precedes the payload within the same carved region, hence the result is non-null.
        NonNull::new_unchecked(payload.as_ptr().sub(HEADER_SIZE)).cast()
    }

    fn new(payload_size: usize) -> Self {
        Self {
            payload_size: Cell::new(payload_size),
            available: Cell::new(false),
            list_prev: Link::new(),
            list_next: Link::new(),
            free_prev: Link::new(),
            free_next: Link::new(),
        }
    }

    /// Returns the address of the header itself.
    pub(crate) fn address(&self) -> usize { self as *const BlockHeader as usize }

    /// Returns a pointer to the first usable byte of the block.
    pub(crate) fn payload(&self) -> NonNull<u8> {
        //  Safety:
        //  -   The payload directly follows the header within the same carved region, hence is non-null.
        unsafe { NonNull::new_unchecked((self as *const BlockHeader as *mut u8).add(HEADER_SIZE)) }
    }

    /// Returns the number of bytes usable by the caller.
    pub(crate) fn payload_size(&self) -> usize { self.payload_size.get() }

    /// Sets the number of bytes usable by the caller.
    pub(crate) fn set_payload_size(&self, size: usize) { self.payload_size.set(size); }

    /// Returns whether the block is currently linked in a free list.
    pub(crate) fn is_available(&self) -> bool { self.available.get() }

    /// Sets whether the block is currently linked in a free list.
    pub(crate) fn set_available(&self, available: bool) { self.available.set(available); }

    /// Returns the one-past-the-end address of the payload.
    pub(crate) fn end_address(&self) -> usize { self.payload().as_ptr() as usize + self.payload_size() }

    /// Returns whether `next` starts exactly where this block ends.
    ///
    /// Within a heap grown through a single context this holds for every list neighbor; a foreign extension of the
    /// heap boundary in between growths breaks it, in which case the two blocks must not be merged.
    pub(crate) fn is_adjacent_to(&self, next: &BlockHeader) -> bool { self.end_address() == next.address() }
}

/// Link.
///
/// A nullable, unsynchronized pointer to another block.
pub(crate) struct Link(Cell<Option<NonNull<BlockHeader>>>);

impl Link {
    /// Creates a null instance.
    pub(crate) const fn new() -> Self { Self(Cell::new(None)) }

    /// Returns the inner pointer, possibly null.
    pub(crate) fn get(&self) -> Option<NonNull<BlockHeader>> { self.0.get() }

    /// Sets the inner pointer.
    pub(crate) fn set(&self, ptr: Option<NonNull<BlockHeader>>) { self.0.set(ptr); }

    /// Sets the inner pointer to null and returns the previous value, possibly null.
    pub(crate) fn take(&self) -> Option<NonNull<BlockHeader>> { self.0.replace(None) }
}

impl Default for Link {
    fn default() -> Self { Self::new() }
}

// mod tests
