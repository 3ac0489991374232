//! The geometry of a heap: where its region lies, and how it is split in blocks.

use core::ptr::NonNull;

use super::{BlockSize, ConfigError};

/// Geometry
///
/// The validated layout of a region of memory: its start, its block size, and its number of blocks.
///
/// The region spans `[start, start + number_blocks * block_size)`; trailing bytes which do not form a whole block
/// are not part of it.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Geometry {
    start: NonNull<u8>,
    block_size: BlockSize,
    number_blocks: usize,
}

impl Geometry {
    /// Creates an instance, or None if the region would extend past the end of the address space.
    pub fn new(start: NonNull<u8>, block_size: BlockSize, number_blocks: usize) -> Option<Geometry> {
        let length = number_blocks.checked_mul(block_size.value())?;
        (start.as_ptr() as usize).checked_add(length)?;

        Some(Geometry { start, block_size, number_blocks })
    }

    /// Lays out `total_size` bytes starting at `base` in `block_count` blocks.
    ///
    /// The block size is `total_size / block_count`, and the number of blocks is `total_size / block_size`; bytes
    /// past the last whole block are not managed.
    ///
    /// The capacity of the status table is not checked here, see `BlockHeap::new`.
    pub fn configure(base: *mut u8, total_size: usize, block_count: usize) -> Result<Geometry, ConfigError> {
        let start = NonNull::new(base).ok_or(ConfigError::NullBase)?;

        if block_count == 0 {
            return Err(ConfigError::ZeroBlockCount);
        }

        let block_size = BlockSize::new(total_size / block_count)
            .ok_or(ConfigError::ZeroBlockSize { total_size, block_count })?;

        Self::new(start, block_size, total_size / block_size).ok_or(ConfigError::AddressOverflow)
    }

    /// Creates an instance, without checking for overflow.
    ///
    /// #   Safety
    ///
    /// -   Assumes that `start + number_blocks * block_size` does not overflow.
    pub(crate) const unsafe fn new_unchecked(start: NonNull<u8>, block_size: BlockSize, number_blocks: usize)
        -> Geometry
    {
        Geometry { start, block_size, number_blocks }
    }

    /// Returns the address of the first byte of the region.
    pub fn start(&self) -> NonNull<u8> { self.start }

    /// Returns the address one past the last byte of the region.
    pub fn end(&self) -> usize { self.start_address() + self.length() }

    /// Returns the number of bytes per block.
    pub fn block_size(&self) -> BlockSize { self.block_size }

    /// Returns the number of blocks.
    pub fn number_blocks(&self) -> usize { self.number_blocks }

    /// Returns the length, in bytes, of the region.
    pub fn length(&self) -> usize { self.number_blocks * self.block_size }

    /// Returns whether `address` lies within the region.
    pub fn contains(&self, address: NonNull<u8>) -> bool {
        let address = address.as_ptr() as usize;

        self.start_address() <= address && address < self.end()
    }

    /// Returns the index of the block containing `address`, or None if outside the region.
    pub fn index_of(&self, address: NonNull<u8>) -> Option<usize> {
        if !self.contains(address) {
            return None;
        }

        Some((address.as_ptr() as usize - self.start_address()) / self.block_size)
    }

    /// Returns the address of the first byte of the block at `index`, or None if there is no such block.
    pub fn address_of(&self, index: usize) -> Option<NonNull<u8>> {
        if index >= self.number_blocks {
            return None;
        }

        //  The offset is within the region, which does not extend past the end of the address space.
        NonNull::new(self.start.as_ptr().wrapping_add(index * self.block_size))
    }

    /// Returns whether every block of the region starts on an `alignment` boundary.
    pub fn is_aligned_for(&self, alignment: usize) -> bool {
        debug_assert!(alignment.count_ones() == 1);

        self.start_address() % alignment == 0 && self.block_size.value() % alignment == 0
    }

    fn start_address(&self) -> usize { self.start.as_ptr() as usize }
}

//  Safety:
//  -   The geometry never dereferences `start`; it is only ever used as an address.
unsafe impl Send for Geometry {}

//  Safety:
//  -   The geometry never dereferences `start`; it is only ever used as an address.
unsafe impl Sync for Geometry {}

// mod tests
