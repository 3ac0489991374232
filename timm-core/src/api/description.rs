//! Description of the blocks of a heap, and of what may go wrong when laying them out.

use core::{fmt, num, ops};

/// BlockSize
///
/// The number of bytes represented by a single entry of the status table, guaranteed to be non-zero.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct BlockSize(num::NonZeroUsize);

impl BlockSize {
    /// Creates a new instance of BlockSize.
    ///
    /// Or nothing if the value is 0.
    pub fn new(value: usize) -> Option<BlockSize> { num::NonZeroUsize::new(value).map(BlockSize) }

    /// Creates a new instance of BlockSize.
    ///
    /// #   Safety
    ///
    /// Assumes that the value is non-zero.
    pub const unsafe fn new_unchecked(value: usize) -> BlockSize {
        debug_assert!(value > 0);

        BlockSize(num::NonZeroUsize::new_unchecked(value))
    }

    /// Returns the inner value.
    pub const fn value(&self) -> usize { self.0.get() }

    /// Returns the number of blocks required to hold `size` bytes.
    ///
    /// The division rounds up: a partially used block is a used block.
    pub const fn blocks_for(&self, size: usize) -> usize {
        let value = self.value();

        //  Not `(size + value - 1) / value`, which may overflow.
        size / value + (size % value != 0) as usize
    }
}

impl ops::Div<BlockSize> for usize {
    type Output = usize;

    fn div(self, rhs: BlockSize) -> usize { self / rhs.value() }
}

impl ops::Mul<BlockSize> for usize {
    type Output = usize;

    fn mul(self, rhs: BlockSize) -> usize { self * rhs.value() }
}

impl ops::Rem<BlockSize> for usize {
    type Output = usize;

    fn rem(self, rhs: BlockSize) -> usize { self % rhs.value() }
}

/// BlockStatus
///
/// The status of a single block, as recorded in the status table.
///
/// The discriminants are the bytes stored in the table.
#[repr(u8)]
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum BlockStatus {
    /// Free.
    ///
    /// The block may be handed out by the next allocation which fits.
    Free = 0x00,
    /// Reserved.
    ///
    /// The block belongs to a prior allocation, until it is deallocated.
    Reserved = 0xFF,
}

impl BlockStatus {
    /// Returns whether the block is free.
    pub const fn is_free(self) -> bool { matches!(self, BlockStatus::Free) }

    /// Returns whether the block is reserved.
    pub const fn is_reserved(self) -> bool { matches!(self, BlockStatus::Reserved) }

    /// Returns the status code of the block: 0 if free, 1 if reserved.
    ///
    /// Probes of out-of-range blocks conventionally report -1, see `BlockStatus::code_of`.
    pub const fn code(self) -> i8 {
        match self {
            BlockStatus::Free => 0,
            BlockStatus::Reserved => 1,
        }
    }

    /// Returns the status code of a probe: 0 if free, 1 if reserved, -1 if out of range.
    pub const fn code_of(status: Option<BlockStatus>) -> i8 {
        match status {
            Some(status) => status.code(),
            None => -1,
        }
    }
}

/// ConfigError
///
/// The reasons for which a region cannot be laid out as requested.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ConfigError {
    /// The base address of the region is null.
    NullBase,
    /// The region is requested to be split in 0 blocks.
    ZeroBlockCount,
    /// The region is too small to be split in the requested number of blocks, each block would be 0 bytes.
    ZeroBlockSize {
        /// Size of the region, in bytes.
        total_size: usize,
        /// Requested number of blocks.
        block_count: usize,
    },
    /// The region would require more entries than the status table can hold.
    TableOverflow {
        /// Number of entries required.
        required: usize,
        /// Number of entries available.
        capacity: usize,
    },
    /// The region would extend past the end of the address space.
    AddressOverflow,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ConfigError::NullBase => write!(f, "null base address"),
            ConfigError::ZeroBlockCount => write!(f, "region split in 0 blocks"),
            ConfigError::ZeroBlockSize { total_size, block_count } =>
                write!(f, "region of {} bytes cannot be split in {} blocks", total_size, block_count),
            ConfigError::TableOverflow { required, capacity } =>
                write!(f, "region requires {} blocks, status table holds {}", required, capacity),
            ConfigError::AddressOverflow => write!(f, "region extends past the end of the address space"),
        }
    }
}

// mod tests
