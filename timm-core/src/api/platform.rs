//! Platform
//!
//! The Platform trait is used to request regions of memory directly from the Platform, to be laid out and managed by
//! a heap. By abstracting the underlying platform, the same heap runs on a hosted OS, or on a bare-metal target where
//! the region is a linker-provided symbol.

use core::{
    alloc::Layout,
    ptr::NonNull,
};

/// Abstraction of platform specific memory allocation and deallocation.
pub trait Platform {
    /// Allocates a fresh region of memory as per the specified layout.
    ///
    /// Returns None if the allocation request cannot be satisfied.
    ///
    /// #   Safety
    ///
    /// The caller may assume that if a pointer is returned then:
    /// -   The number of usable bytes is _greater than or equal_ to `layout.size()`.
    /// -   The pointer is _at least_ aligned to `layout.align()`.
    unsafe fn allocate(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Deallocates the supplied region of memory.
    ///
    /// #   Safety
    ///
    /// The caller should no longer reference the memory after calling this function; in particular, no heap should
    /// still be managing it.
    ///
    /// `deallocate` assumes that:
    /// -   `pointer` was allocated by this instance of `Platform`, with `layout` as argument.
    unsafe fn deallocate(&self, pointer: NonNull<u8>, layout: Layout);
}
