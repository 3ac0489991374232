#![no_std]
#![deny(missing_docs)]

//! Exposition of TimmAllocator API via a C ABI.
//!
//! A single process-wide allocator is exposed, in one of two modes selected at build time:
//!
//! -   `configurable-geometry`: the region is supplied to `timm_init`.
//! -   `fixed-geometry`: the region is compiled in, see `TimmGeometry`.
//!
//! Sizes and counts are narrow integers at this boundary, matching the small targets the allocator is meant for.

#[cfg(all(feature = "configurable-geometry", feature = "fixed-geometry"))]
compile_error!("Features `configurable-geometry` and `fixed-geometry` are mutually exclusive.");

#[cfg(not(any(feature = "configurable-geometry", feature = "fixed-geometry")))]
compile_error!("One of the features `configurable-geometry` or `fixed-geometry` must be enabled.");

use core::ptr::{self, NonNull};

use timm::TimmAllocator;
use timm_core::BlockStatus;

#[cfg(feature = "fixed-geometry")]
use timm_core::FixedGeometry;

/// Maximum number of blocks of the process-wide allocator.
pub const MAX_TABLE_SIZE: usize = 2048;

/// The compiled-in geometry, in `fixed-geometry` mode.
#[cfg(feature = "fixed-geometry")]
pub struct TimmGeometry;

#[cfg(feature = "fixed-geometry")]
impl FixedGeometry for TimmGeometry {
    const REGION_START: usize = 0x903930;
    const REGION_SIZE: usize = 4096;
    const BLOCK_SIZE: usize = 8;
}

/// Initializes, or re-initializes, the allocator over `total_size` bytes starting at `base`, split in `block_count`
/// blocks.
///
/// Returns 1 on success, and 0 otherwise; on failure, any prior configuration stands.
///
/// Failure occurs if `base` is null, if `block_count` is 0 or larger than `total_size`, or if the number of blocks
/// exceeds `MAX_TABLE_SIZE`.
///
/// #   Safety
///
/// -   Assumes that `[base, base + total_size)` is valid for reads and writes for as long as the allocator uses it.
#[cfg(feature = "configurable-geometry")]
#[cold]
#[no_mangle]
pub unsafe extern fn timm_init(base: *mut u8, total_size: u16, block_count: u8) -> u8 {
    ALLOCATOR.init(base, total_size.into(), block_count.into()).is_ok() as u8
}

/// Initializes, or re-initializes, the allocator over the compiled-in region, see `TimmGeometry`.
///
/// Returns 1; an invalid geometry fails the build.
///
/// #   Safety
///
/// -   Assumes that the compiled-in region is valid for reads and writes for as long as the allocator uses it.
#[cfg(feature = "fixed-geometry")]
#[cold]
#[no_mangle]
pub unsafe extern fn timm_init() -> u8 {
    ALLOCATOR.init_fixed::<TimmGeometry>();
    1
}

/// Allocates `size` bytes of memory, rounded up to a whole number of blocks.
///
/// Returns NULL if `size` is 0, if no run of free blocks is large enough, or if the allocator is not initialized.
///
/// The returned pointer is aligned on the block size, relative to the start of the region.
#[no_mangle]
pub extern fn timm_new(size: u16) -> *mut u8 {
    ALLOCATOR.allocate(size.into()).map(|pointer| pointer.as_ptr()).unwrap_or(ptr::null_mut())
}

/// Deallocates the `size` bytes of memory located at `address`.
///
/// A NULL `address`, or an `address` outside the region, is ignored.
///
/// #   Safety
///
/// -   Assumes `address` has been returned by a prior call to `timm_new`, with the same `size`.
/// -   Assumes `address` has not been deallocated since its allocation.
/// -   Assumes the memory pointed by `address` is no longer in use.
#[no_mangle]
pub unsafe extern fn timm_delete(address: *mut u8, size: u16) {
    if let Some(address) = NonNull::new(address) {
        ALLOCATOR.deallocate(address, size.into());
    }
}

/// Returns the number of blocks, or 0 if the allocator is not initialized.
#[no_mangle]
pub extern fn timm_get_blocks_count() -> u16 { narrow(ALLOCATOR.block_count().unwrap_or(0)) }

/// Returns the number of free blocks, or 0 if the allocator is not initialized.
#[no_mangle]
pub extern fn timm_get_free_blocks() -> u16 { narrow(ALLOCATOR.free_block_count().unwrap_or(0)) }

/// Returns the status of the block at `index`: 0 if free, 1 if reserved.
///
/// Returns -1 if `index` is out of range, or if the allocator is not initialized.
#[no_mangle]
pub extern fn timm_get_block_status(index: u16) -> i8 {
    BlockStatus::code_of(ALLOCATOR.block_status(index.into()).unwrap_or(None))
}

/// Returns the address of the first byte of the block at `index`.
///
/// Returns NULL if `index` is out of range, or if the allocator is not initialized.
#[no_mangle]
pub extern fn timm_get_block_address(index: u16) -> *mut u8 {
    ALLOCATOR.address_of(index.into())
        .ok()
        .flatten()
        .map(|pointer| pointer.as_ptr())
        .unwrap_or(ptr::null_mut())
}

/// Renders the map of the blocks into `buffer`, returns the number of bytes written.
///
/// The rendering is truncated to `capacity` bytes, and is not NUL-terminated. Nothing is written if `buffer` is NULL,
/// or if the allocator is not initialized.
///
/// #   Safety
///
/// -   Assumes that `buffer`, if not NULL, is valid for writes of `capacity` bytes.
#[no_mangle]
pub unsafe extern fn timm_render_map(buffer: *mut u8, capacity: usize) -> usize {
    if buffer.is_null() {
        return 0;
    }

    //  Safety:
    //  -   `buffer` is not NULL, and valid for writes of `capacity` bytes, as per pre-condition.
    let buffer = core::slice::from_raw_parts_mut(buffer, capacity);

    ALLOCATOR.with_heap(|heap| heap.map().render_into(buffer)).unwrap_or(0)
}

//
//  Implementation Details
//

static ALLOCATOR: TimmAllocator<MAX_TABLE_SIZE> = TimmAllocator::new();

//  Counts never exceed `MAX_TABLE_SIZE`, which fits in 16 bits.
fn narrow(count: usize) -> u16 {
    debug_assert!(count <= MAX_TABLE_SIZE);

    count as u16
}

// mod tests
