//! Implementation of Linux specific calls.

use std::ptr::NonNull;

use flmalloc_core::{Platform, ALIGNMENT};

/// Implementation of the Platform trait over the program break.
///
/// The break only ever moves forward: `grow` maps directly onto `sbrk`, and nothing is ever returned to the
/// operating system.
#[derive(Default)]
pub struct BrkPlatform;

impl BrkPlatform {
    /// Creates an instance.
    pub const fn new() -> Self { Self }
}

impl Platform for BrkPlatform {
    unsafe fn grow(&self, size: usize) -> Option<NonNull<u8>> {
        //  `sbrk` reports failure with (void*)-1.
        const FAILED: *mut libc::c_void = usize::MAX as *mut libc::c_void;

        //  Other components of the process may have left the break unaligned. Pad exactly the distance to the
        //  next aligned address, zero when this allocator's own growths were the last to move the break: each
        //  extension then starts exactly where the previous one ended, and neighbors stay mergeable.
        let current = libc::sbrk(0);

        if current == FAILED {
            return None;
        }

        let padding = (ALIGNMENT - current as usize % ALIGNMENT) % ALIGNMENT;

        let total = size.checked_add(padding)?;

        if total > isize::MAX as usize {
            return None;
        }

        //  Safety:
        //  -   `total` fits in `intptr_t`.
        let previous = unsafe { libc::sbrk(total as libc::intptr_t) };

        if previous == FAILED {
            return None;
        }

        //  Calls are serialized by the caller; only a foreign move of the break in between the two `sbrk` calls
        //  could make these differ.
        debug_assert_eq!(current, previous);

        //  Safety:
        //  -   `padding` is less than `total`, hence the result is within the grown region.
        NonNull::new(unsafe { (previous as *mut u8).add(padding) })
    }
}
