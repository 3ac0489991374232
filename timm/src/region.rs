//! A region of memory obtained from the OS, to be managed by a heap.

use core::{alloc::Layout, ptr::NonNull};

use timm_core::Platform;

use crate::platform::TimmPlatform;

/// MappedRegion
///
/// An owned region of memory, zero-initialized, unmapped when dropped.
///
/// #   Warning
///
/// Any heap managing the region must be re-initialized, or no longer used, before the region is dropped.
#[derive(Debug)]
pub struct MappedRegion {
    pointer: NonNull<u8>,
    layout: Layout,
}

impl MappedRegion {
    /// Alignment of the first byte of the region.
    pub const ALIGNMENT: usize = 64;

    /// Maps a region of `size` bytes.
    ///
    /// Returns None if `size` is 0, or if the OS cannot satisfy the request.
    pub fn new(size: usize) -> Option<MappedRegion> {
        let layout = Layout::from_size_align(size, Self::ALIGNMENT).ok()?;

        //  Safety:
        //  -   `layout` is a valid layout.
        let pointer = unsafe { TimmPlatform::new().allocate(layout)? };

        Some(MappedRegion { pointer, layout })
    }

    /// Returns a pointer to the first byte of the region.
    pub fn as_ptr(&self) -> *mut u8 { self.pointer.as_ptr() }

    /// Returns the size, in bytes, of the region.
    pub fn len(&self) -> usize { self.layout.size() }

    /// Returns whether the region is empty; it never is.
    pub fn is_empty(&self) -> bool { self.layout.size() == 0 }

    /// Returns whether `pointer` points within the region.
    pub fn contains(&self, pointer: *const u8) -> bool {
        let start = self.pointer.as_ptr() as usize;
        let pointer = pointer as usize;

        start <= pointer && pointer < start + self.len()
    }
}

impl Drop for MappedRegion {
    fn drop(&mut self) {
        //  Safety:
        //  -   `self.pointer` was allocated by `TimmPlatform`, with `self.layout`.
        unsafe { TimmPlatform::new().deallocate(self.pointer, self.layout) };
    }
}

//  Safety:
//  -   The region is exclusively owned.
unsafe impl Send for MappedRegion {}

// mod tests
