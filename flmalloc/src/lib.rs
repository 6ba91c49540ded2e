#![deny(missing_docs)]

//! A Free-List Memory Allocator library.
//!
//! Three allocators over the same block model, differing only in how they admit threads:
//!
//! -   `SerialAllocator`: single-threaded, with address-ordered reuse and coalescing.
//! -   `ExclusiveAllocator`: one free list per thread, synchronization confined to heap growth.
//! -   `SharedAllocator`: one free list behind one lock.
//!
//! #   Warning
//!
//! All variants grow the heap through `sbrk`, and never shrink it: memory is recycled through free lists for the
//! lifetime of the process.

mod allocator;
mod platform;

pub use allocator::{ExclusiveAllocator, SerialAllocator, SharedAllocator};
pub use platform::BrkPlatform;

pub use flmalloc_core::{AllocError, BlockReport, Strategy, ALIGNMENT, HEADER_SIZE};
