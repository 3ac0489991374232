#![no_std]
#![deny(missing_docs)]

//! A Tiny Memory Manager library.
//!
//! The type `TimmAllocator` manages a single region of memory, carved in blocks of equal size, behind a lock. It is
//! usable as a process-wide instance, including as a `#[global_allocator]` on targets without an OS.
//!
//! The type `MappedRegion` obtains a region of memory from the OS, for the allocator to manage, on hosted targets.
//!
//! #   Warning
//!
//! The allocator does not record the size of allocations: deallocation must be passed the size requested at
//! allocation, or it will free too much, or too little.

#[cfg(test)]
extern crate std;

mod allocator;
mod platform;

#[cfg(unix)]
mod region;

pub use allocator::{TimmAllocator, Uninitialized};
pub use timm_core::{BlockHeap, BlockSize, BlockStatus, ConfigError, FixedGeometry, Geometry, StatusMap};

#[cfg(unix)]
pub use region::MappedRegion;
