//! The allocator variants.

mod exclusive;
mod serial;
mod shared;

pub use exclusive::ExclusiveAllocator;
pub use serial::SerialAllocator;
pub use shared::SharedAllocator;
