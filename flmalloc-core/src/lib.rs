#![no_std]

#![deny(missing_docs)]

//! Building blocks for a free-list memory allocator.
//!
//! flmalloc-core contains the allocation machinery shared by every flmalloc variant:
//! -   A platform trait, abstracting the single operation ever requested from the OS: extending the heap boundary.
//! -   A sequential heap maintaining an address-ordered list of all blocks, with splitting and coalescing.
//! -   An unordered block pool, the non-coalescing building block of the concurrent variants.

mod api;
mod internals;
mod utils;

pub use api::*;
