//! Implementation of unix specific calls.

use core::{alloc::Layout, ptr};

use timm_core::Platform;

/// Implementation of the Platform trait, for unix.
///
/// Regions are anonymous private mappings, zero-initialized and page-aligned.
#[derive(Default)]
pub(crate) struct TimmPlatform;

impl TimmPlatform {
    /// Creates an instance.
    pub(crate) const fn new() -> Self { Self }
}

impl Platform for TimmPlatform {
    unsafe fn allocate(&self, layout: Layout) -> Option<ptr::NonNull<u8>> {
        //  `mmap` only guarantees page alignment.
        if layout.size() == 0 || layout.align() > page_size() {
            return None;
        }

        mmap_allocate(layout.size())
    }

    unsafe fn deallocate(&self, pointer: ptr::NonNull<u8>, layout: Layout) {
        munmap_deallocate(pointer.as_ptr(), layout.size());
    }
}

//  Returns the size of a page, or 4096 if unknown.
fn page_size() -> usize {
    //  Safety:
    //  -   `_SC_PAGESIZE` is a valid name.
    let result = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };

    if result > 0 { result as usize } else { 4096 }
}

//  Wrapper around `mmap`.
//
//  Returns a pointer to `size` bytes of memory, aligned on a page boundary.
fn mmap_allocate(size: usize) -> Option<ptr::NonNull<u8>> {
    let length = size;
    let prot = libc::PROT_READ | libc::PROT_WRITE;
    let flags = libc::MAP_PRIVATE | libc::MAP_ANONYMOUS;

    //  No specific address hint.
    let addr = ptr::null_mut();
    //  When used in conjunction with MAP_ANONYMOUS, fd is mandated to be -1 on some implementations.
    let fd = -1;
    //  When used in conjunction with MAP_ANONYMOUS, offset is mandated to be 0 on some implementations.
    let offset = 0;

    //  Safety:
    //  -   `addr`, `fd`, and `offset` are suitable for MAP_ANONYMOUS.
    let result = unsafe { libc::mmap(addr, length, prot, flags, fd, offset) };

    let result = if result != libc::MAP_FAILED { result as *mut u8 } else { ptr::null_mut() };
    ptr::NonNull::new(result)
}

//  Wrapper around `munmap`.
//
//  #   Panics
//
//  If `munmap` returns a non-0 result.
//
//  #   Safety
//
//  -   Assumes that `addr` points to a `mmap`ed area of at least `size` bytes.
//  -   Assumes that the range `[addr, addr + size)` is no longer in use.
unsafe fn munmap_deallocate(addr: *mut u8, size: usize) {
    let result = libc::munmap(addr as *mut libc::c_void, size);
    assert!(result == 0, "Could not munmap {:x}, {}: {}", addr as usize, size, result);
}
