//! The failure modes of an allocation.

use thiserror::Error;

/// AllocError.
///
/// All failures travel by value; no allocator operation panics in return position.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum AllocError {
    /// The request was for 0 bytes; a payload-less block has no recoverable header.
    #[error("zero-sized allocation request")]
    ZeroSize,
    /// Padding the request, or accounting for the block header, overflowed `usize`.
    #[error("allocation request overflows the addressable heap")]
    SizeOverflow,
    /// The operating system refused to extend the heap boundary; the request is not retried.
    #[error("the operating system refused to extend the heap")]
    HeapExhausted,
}
