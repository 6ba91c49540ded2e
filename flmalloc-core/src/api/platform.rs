//! Platform
//!
//! The Platform trait is the allocator's sole contact with the operating system: a monotonically growing heap
//! boundary. By abstracting it, the same carving code can be driven by `sbrk` in production and by a fixed arena
//! in tests.

use core::ptr::NonNull;

/// Abstraction of the heap-growth primitive.
pub trait Platform {
    /// Extends the heap boundary by `size` bytes, returning the first byte of the extension.
    ///
    /// Returns None if the underlying system cannot satisfy the request; the failure is surfaced to the caller
    /// as-is, never retried. Growth is never reversed: memory obtained here is recycled through free lists for
    /// the lifetime of the process.
    ///
    /// Consecutive extensions are contiguous unless another component moved the boundary in between calls;
    /// coalescing of blocks from separate growths relies on it.
    ///
    /// #   Safety
    ///
    /// The caller may assume that if a pointer is returned:
    ///
    /// -   It points to at least `size` writable bytes, exclusively owned by the caller.
    /// -   It is aligned on `ALIGNMENT`.
    ///
    /// `grow` assumes that:
    ///
    /// -   `size` is a multiple of `ALIGNMENT`.
    /// -   Calls are serialized by the caller whenever multiple threads may grow concurrently.
    unsafe fn grow(&self, size: usize) -> Option<NonNull<u8>>;
}
