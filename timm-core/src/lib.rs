#![no_std]

#![deny(missing_docs)]

//! Building blocks for a tiny, table-driven memory manager.
//!
//! timm-core carves a region of memory into blocks of equal size, and keeps track of which blocks are free and which
//! are reserved in a side table: a single status byte per block. It contains:
//! -   A `BlockHeap`, performing first-fit allocation of runs of contiguous free blocks.
//! -   A `Geometry`, the validated layout of a region, either supplied at runtime or compiled in via `FixedGeometry`.
//! -   A platform trait, used to obtain raw regions of memory to be managed.
//!
//! The heap never reads nor writes the memory it manages; all its bookkeeping lives in the status table, which makes
//! it suitable for regions that are not (yet) accessible, such as memory-mapped peripherals or foreign address spaces.

#[cfg(test)]
extern crate std;

mod api;
mod internals;
mod utils;

pub use api::*;
