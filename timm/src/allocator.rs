//! Allocator

use core::{
    alloc::{GlobalAlloc, Layout},
    fmt,
    ptr::{self, NonNull},
};

use spin::Mutex;

use timm_core::{BlockHeap, BlockStatus, ConfigError, FixedGeometry};

/// Uninitialized
///
/// The error returned by queries issued before the allocator is initialized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Uninitialized;

impl fmt::Display for Uninitialized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("allocator is not initialized") }
}

/// Tiny Memory Manager.
///
/// A single heap of up to `CAPACITY` blocks, shared behind a spin lock, so that it can be used from a `static`.
///
/// Until initialized, allocations fail, deallocations are ignored, and queries return `Err(Uninitialized)`.
pub struct TimmAllocator<const CAPACITY: usize>(Mutex<Option<BlockHeap<CAPACITY>>>);

impl<const CAPACITY: usize> TimmAllocator<CAPACITY> {
    /// Creates an uninitialized instance.
    pub const fn new() -> Self { Self(Mutex::new(None)) }

    /// Initializes, or re-initializes, the allocator over `total_size` bytes starting at `base`, split in
    /// `block_count` blocks.
    ///
    /// All blocks are free after a successful call; any prior allocation is forgotten. On failure, the allocator is
    /// left as it was.
    ///
    /// Fails if:
    ///
    /// -   `base` is null.
    /// -   `block_count` is 0, or larger than `total_size`.
    /// -   The resulting number of blocks exceeds `CAPACITY`.
    /// -   The region extends past the end of the address space.
    ///
    /// #   Warning
    ///
    /// The memory is not accessed by the allocator itself, but pointers into it are handed out by `allocate`: the
    /// caller is responsible for `[base, base + total_size)` being valid for reads and writes for as long as the
    /// allocator manages it.
    pub fn init(&self, base: *mut u8, total_size: usize, block_count: usize) -> Result<(), ConfigError> {
        let mut heap = self.0.lock();

        if let Some(heap) = heap.as_mut() {
            return heap.reconfigure(base, total_size, block_count);
        }

        *heap = Some(BlockHeap::configure(base, total_size, block_count)?);

        Ok(())
    }

    /// Initializes, or re-initializes, the allocator over the compiled-in geometry `G`.
    ///
    /// All blocks are free after the call. An invalid geometry fails the build.
    pub fn init_fixed<G>(&self)
        where
            G: FixedGeometry
    {
        *self.0.lock() = Some(BlockHeap::fixed::<G>());
    }

    /// Returns whether the allocator is initialized.
    pub fn is_initialized(&self) -> bool { self.0.lock().is_some() }

    /// Allocates `size` bytes of memory, rounded up to a whole number of blocks.
    ///
    /// Returns None if `size` is 0, if no run of free blocks is large enough, or if the allocator is not initialized.
    pub fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        self.0.lock().as_mut().and_then(|heap| heap.allocate(size))
    }

    /// Deallocates the `size` bytes of memory located at `pointer`.
    ///
    /// A pointer outside the managed region, or a size of 0, is ignored, as is any call prior to initialization.
    ///
    /// #   Safety
    ///
    /// -   Assumes `pointer` has been returned by a prior call to `allocate`, with the same `size`.
    /// -   Assumes `pointer` has not been deallocated since its allocation.
    /// -   Assumes the memory pointed by `pointer` is no longer in use.
    ///
    /// The allocator does not check any of the above: a mismatched `size` frees neighbouring blocks in use, or leaks
    /// blocks of this allocation.
    pub unsafe fn deallocate(&self, pointer: NonNull<u8>, size: usize) {
        if let Some(heap) = self.0.lock().as_mut() {
            heap.deallocate(pointer, size);
        }
    }

    /// Returns the number of blocks managed.
    pub fn block_count(&self) -> Result<usize, Uninitialized> { self.with_heap(|heap| heap.block_count()) }

    /// Returns the number of free blocks.
    pub fn free_block_count(&self) -> Result<usize, Uninitialized> { self.with_heap(|heap| heap.free_block_count()) }

    /// Returns the status of the block at `index`, or None if `index` is out of range.
    pub fn block_status(&self, index: usize) -> Result<Option<BlockStatus>, Uninitialized> {
        self.with_heap(|heap| heap.block_status(index))
    }

    /// Returns the address of the first byte of the block at `index`, or None if `index` is out of range.
    pub fn address_of(&self, index: usize) -> Result<Option<NonNull<u8>>, Uninitialized> {
        self.with_heap(|heap| heap.address_of(index))
    }

    /// Invokes `fun` with the heap, under the lock.
    ///
    /// Useful to issue several queries atomically, such as rendering the map of the heap.
    ///
    /// #   Warning
    ///
    /// The lock is not re-entrant: `fun` must not call back into this allocator, or the calling thread spins forever.
    pub fn with_heap<F, R>(&self, fun: F) -> Result<R, Uninitialized>
        where
            F: FnOnce(&BlockHeap<CAPACITY>) -> R
    {
        self.0.lock().as_ref().map(fun).ok_or(Uninitialized)
    }
}

impl<const CAPACITY: usize> fmt::Debug for TimmAllocator<CAPACITY> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TimmAllocator").field(&*self.0.lock()).finish()
    }
}

impl<const CAPACITY: usize> Default for TimmAllocator<CAPACITY> {
    fn default() -> Self { Self::new() }
}

unsafe impl<const CAPACITY: usize> GlobalAlloc for TimmAllocator<CAPACITY> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let mut heap = self.0.lock();

        let heap = match heap.as_mut() {
            Some(heap) => heap,
            None => return ptr::null_mut(),
        };

        //  Blocks are only aligned as far as the region and the block size are.
        if !heap.geometry().is_aligned_for(layout.align()) {
            return ptr::null_mut();
        }

        heap.allocate(layout.size()).map(|ptr| ptr.as_ptr()).unwrap_or(ptr::null_mut())
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        if let Some(ptr) = NonNull::new(ptr) {
            self.deallocate(ptr, layout.size());
        }
    }
}

// mod tests
