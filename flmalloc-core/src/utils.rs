//! A collection of utilities.

/// Rounds `size` up to the next multiple of `alignment`, or None on overflow.
///
/// `alignment` must be a power of 2.
pub(crate) fn align_up(size: usize, alignment: usize) -> Option<usize> {
    debug_assert!(alignment.is_power_of_two());

    let mask = alignment - 1;
    size.checked_add(mask).map(|padded| padded & !mask)
}

/// Returns whether `address` is a multiple of `alignment`.
///
/// `alignment` must be a power of 2.
pub(crate) fn is_aligned(address: usize, alignment: usize) -> bool {
    debug_assert!(alignment.is_power_of_two());

    address % alignment == 0
}

#[cfg(test)]
mod tests {

use super::*;

#[test]
fn align_up_rounds() {
    assert_eq!(Some(0), align_up(0, 16));
    assert_eq!(Some(16), align_up(1, 16));
    assert_eq!(Some(16), align_up(16, 16));
    assert_eq!(Some(32), align_up(17, 16));
}

#[test]
fn align_up_overflow() {
    assert_eq!(None, align_up(usize::MAX, 16));
    assert_eq!(None, align_up(usize::MAX - 14, 16));
    assert_eq!(Some(usize::MAX - 15), align_up(usize::MAX - 15, 16));
}

#[test]
fn is_aligned_multiples() {
    assert!(is_aligned(0, 16));
    assert!(is_aligned(32, 16));
    assert!(!is_aligned(33, 16));
    assert!(is_aligned(33, 1));
}

} // mod tests
