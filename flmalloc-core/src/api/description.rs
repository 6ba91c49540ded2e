//! The size domain of allocation requests.
//!
//! Every payload size handed to the lists and pools goes through `request_size` first: the raw user request is
//! validated and padded there, once, so that the carving code can rely on aligned sizes throughout.

use core::mem;

use crate::internals::block::BlockHeader;
use crate::utils;

use super::error::AllocError;

/// Alignment of every payload, and of every heap extension.
///
/// Payload sizes are rounded up to a multiple of this value, which keeps every embedded header naturally aligned.
pub const ALIGNMENT: usize = 16;

/// Number of bytes of overhead per block: the metadata header preceding each payload.
pub const HEADER_SIZE: usize = mem::size_of::<BlockHeader>();

//  The split paths carve new headers at `payload + multiple of ALIGNMENT`, which only lands aligned if the header
//  itself occupies a whole number of alignment units.
const _: () = assert!(HEADER_SIZE % ALIGNMENT == 0);

/// Validates and pads an allocation request.
///
/// Rejects zero-sized requests, rounds `size` up to a multiple of `ALIGNMENT`, and guarantees that the padded size
/// plus `HEADER_SIZE` does not overflow, so downstream arithmetic cannot.
pub fn request_size(size: usize) -> Result<usize, AllocError> {
    if size == 0 {
        return Err(AllocError::ZeroSize);
    }

    let size = utils::align_up(size, ALIGNMENT).ok_or(AllocError::SizeOverflow)?;

    size.checked_add(HEADER_SIZE).ok_or(AllocError::SizeOverflow)?;

    Ok(size)
}

#[cfg(test)]
mod tests {

use super::*;

#[test]
fn request_size_pads_to_alignment() {
    assert_eq!(Ok(16), request_size(1));
    assert_eq!(Ok(16), request_size(16));
    assert_eq!(Ok(32), request_size(17));
    assert_eq!(Ok(48), request_size(40));
}

#[test]
fn request_size_rejects_zero() {
    assert_eq!(Err(AllocError::ZeroSize), request_size(0));
}

#[test]
fn request_size_rejects_overflow() {
    assert_eq!(Err(AllocError::SizeOverflow), request_size(usize::MAX));
    assert_eq!(Err(AllocError::SizeOverflow), request_size(usize::MAX - HEADER_SIZE));
}

} // mod tests
