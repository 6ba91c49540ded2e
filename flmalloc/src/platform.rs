//! Implementation of the heap-growth platform, on top of OS specific calls.

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "linux")]
pub use linux::BrkPlatform;
