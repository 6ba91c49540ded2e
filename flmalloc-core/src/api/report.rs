//! Read-only block diagnostics.

use crate::internals::block::BlockHeader;

/// A description of a single block, for debugging.
///
/// Plain addresses and sizes only: producing a report neither borrows the block past the call nor mutates any
/// allocator state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockReport {
    /// Address of the block header.
    pub address: usize,
    /// Address of the first usable byte.
    pub payload_address: usize,
    /// Number of bytes usable by the caller.
    pub payload_size: usize,
    /// Whether the block is currently in the free list.
    pub available: bool,
    /// Header address of the previous block in address order, if any.
    pub list_prev: Option<usize>,
    /// Header address of the next block in address order, if any.
    pub list_next: Option<usize>,
    /// Header address of the previous free block, if any.
    pub free_prev: Option<usize>,
    /// Header address of the next free block, if any.
    pub free_next: Option<usize>,
}

impl BlockReport {
    pub(crate) fn of(block: &BlockHeader) -> Self {
        fn address_of(link: &crate::internals::block::Link) -> Option<usize> {
            link.get().map(|header| header.as_ptr() as usize)
        }

        Self {
            address: block.address(),
            payload_address: block.payload().as_ptr() as usize,
            payload_size: block.payload_size(),
            available: block.is_available(),
            list_prev: address_of(&block.list_prev),
            list_next: address_of(&block.list_next),
            free_prev: address_of(&block.free_prev),
            free_next: address_of(&block.free_next),
        }
    }
}
