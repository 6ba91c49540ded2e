//! The internals of flmalloc-core.
//!
//! The internals provide all the heavy-lifting: block metadata and the intrusive lists threaded through it.

pub(crate) mod block;
pub(crate) mod block_list;
pub(crate) mod free_list;
