//! Placement strategies.

/// Strategy used to pick a block from a free list.
///
/// Interchangeable at every call: the strategy is an argument of `allocate`, not a property of the allocator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Picks the first sufficiently large block, in list order.
    ///
    /// Over an address-ordered free list this reads as "the lowest address that fits".
    FirstFit,
    /// Picks the smallest sufficiently large block; an exact match short-circuits the scan.
    ///
    /// Amongst equally tight blocks, the first encountered in list order wins.
    BestFit,
}
