//! Multi-threaded scaffolding for exercising allocators in tests and benchmarks.

mod gate;
mod pool;

pub use gate::Gate;
pub use pool::Pool;
