//! The API of flmalloc-core.

mod description;
mod error;
mod platform;
mod pool;
mod report;
mod sequential;
mod strategy;

pub use description::{request_size, ALIGNMENT, HEADER_SIZE};
pub use error::AllocError;
pub use platform::Platform;
pub use pool::{carve, BlockPool};
pub use report::BlockReport;
pub use sequential::{Blocks, SequentialHeap};
pub use strategy::Strategy;
