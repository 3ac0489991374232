//! The heap: a region carved in blocks, and the status table tracking them.
//!
//! Allocation is first-fit: the status table is scanned from its start, and the first run of contiguous free blocks
//! long enough to hold the request is reserved. Deallocation marks blocks free again, and requires the size which was
//! originally requested: the heap does not record the size of allocations.

use core::{fmt, ptr::NonNull};

use crate::internals::status_table::StatusTable;

use super::{BlockSize, BlockStatus, ConfigError, FixedGeometry, Geometry, Properties, StatusMap};

/// BlockHeap
///
/// A heap of up to `CAPACITY` blocks.
///
/// Storage for the status table is part of the heap, so that no allocation is required to create one: only the
/// number of blocks in use varies with the geometry.
pub struct BlockHeap<const CAPACITY: usize> {
    geometry: Geometry,
    table: StatusTable<CAPACITY>,
}

impl<const CAPACITY: usize> BlockHeap<CAPACITY> {
    /// Creates a heap over `geometry`, all blocks free.
    ///
    /// Fails if `geometry` has more blocks than the status table can hold.
    pub fn new(geometry: Geometry) -> Result<Self, ConfigError> {
        Self::check_capacity(&geometry)?;

        let mut table = StatusTable::new();
        table.reset(geometry.number_blocks());

        Ok(Self { geometry, table })
    }

    /// Creates a heap over `total_size` bytes starting at `base`, split in `block_count` blocks.
    ///
    /// See `Geometry::configure` for the exact layout.
    pub fn configure(base: *mut u8, total_size: usize, block_count: usize) -> Result<Self, ConfigError> {
        Self::new(Geometry::configure(base, total_size, block_count)?)
    }

    /// Creates a heap over the compiled-in geometry `G`, all blocks free.
    ///
    /// An invalid geometry fails the build, see `Properties::VALID`.
    pub fn fixed<G>() -> Self
        where
            G: FixedGeometry
    {
        let geometry = Properties::<G, CAPACITY>::geometry();
        debug_assert!(geometry.number_blocks() <= CAPACITY);

        let mut table = StatusTable::new();
        table.reset(geometry.number_blocks());

        Self { geometry, table }
    }

    /// Re-initializes the heap over `geometry`, all blocks free.
    ///
    /// On failure, the heap is left untouched.
    pub fn init(&mut self, geometry: Geometry) -> Result<(), ConfigError> {
        Self::check_capacity(&geometry)?;

        self.geometry = geometry;
        self.table.reset(geometry.number_blocks());

        Ok(())
    }

    /// Re-initializes the heap over `total_size` bytes starting at `base`, split in `block_count` blocks.
    ///
    /// On failure, the heap is left untouched.
    pub fn reconfigure(&mut self, base: *mut u8, total_size: usize, block_count: usize) -> Result<(), ConfigError> {
        self.init(Geometry::configure(base, total_size, block_count)?)
    }

    /// Marks all blocks free, keeping the current geometry.
    pub fn reset(&mut self) { self.table.reset(self.geometry.number_blocks()); }

    /// Allocates `size` bytes, returns the address of the first reserved block.
    ///
    /// Returns None if `size` is 0, or if there is no run of free blocks long enough.
    ///
    /// The returned address is only aligned on the block size, relative to the start of the region.
    pub fn allocate(&mut self, size: usize) -> Option<NonNull<u8>> {
        if size == 0 {
            return None;
        }

        let number = self.blocks_for(size);
        let index = self.table.find_first_fit(number)?;
        let address = self.geometry.address_of(index)?;

        self.table.reserve(index, number);

        Some(address)
    }

    /// Deallocates `size` bytes starting at `address`.
    ///
    /// Does nothing if `size` is 0, or if `address` is not within the region. Blocks past the end of the region are
    /// never touched.
    ///
    /// The blocks are marked free without further verification: the caller is responsible for passing an `address`
    /// returned by `allocate`, together with the `size` requested then, and for not deallocating twice. Failing to do
    /// so frees blocks belonging to other allocations.
    pub fn deallocate(&mut self, address: NonNull<u8>, size: usize) {
        if size == 0 {
            return;
        }

        if let Some(index) = self.geometry.index_of(address) {
            self.table.release(index, self.blocks_for(size));
        }
    }

    /// Returns the status of the block at `index`, or None if there is no such block.
    pub fn block_status(&self, index: usize) -> Option<BlockStatus> { self.table.get(index) }

    /// Returns the number of blocks.
    pub fn block_count(&self) -> usize { self.table.len() }

    /// Returns the number of free blocks.
    ///
    /// Scans the whole status table.
    pub fn free_block_count(&self) -> usize { self.table.count_free() }

    /// Returns the address of the block at `index`, or None if there is no such block.
    pub fn address_of(&self, index: usize) -> Option<NonNull<u8>> { self.geometry.address_of(index) }

    /// Returns the index of the block containing `address`, or None if it is not within the region.
    pub fn index_of(&self, address: NonNull<u8>) -> Option<usize> { self.geometry.index_of(address) }

    /// Returns whether `address` is within the region.
    pub fn contains(&self, address: NonNull<u8>) -> bool { self.geometry.contains(address) }

    /// Returns the number of blocks reserved, or released, for `size` bytes.
    pub fn blocks_for(&self, size: usize) -> usize { self.block_size().blocks_for(size) }

    /// Returns the block size.
    pub fn block_size(&self) -> BlockSize { self.geometry.block_size() }

    /// Returns the geometry.
    pub fn geometry(&self) -> &Geometry { &self.geometry }

    /// Returns the maximum number of blocks.
    pub const fn capacity(&self) -> usize { CAPACITY }

    /// Returns the status of every block, in order.
    pub fn statuses(&self) -> &[BlockStatus] { self.table.entries() }

    /// Returns a displayable map of the status table.
    pub fn map(&self) -> StatusMap<'_> { StatusMap::new(self.table.entries()) }

    fn check_capacity(geometry: &Geometry) -> Result<(), ConfigError> {
        if geometry.number_blocks() > CAPACITY {
            return Err(ConfigError::TableOverflow { required: geometry.number_blocks(), capacity: CAPACITY });
        }

        Ok(())
    }
}

impl<const CAPACITY: usize> fmt::Debug for BlockHeap<CAPACITY> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockHeap")
            .field("geometry", &self.geometry)
            .field("capacity", &CAPACITY)
            .field("free", &self.free_block_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {

use std::string::ToString;

use timm_test::Pattern;

use super::*;

const BASE: usize = 0x4000;

type Heap = BlockHeap<64>;

fn base() -> *mut u8 { BASE as *mut u8 }

fn address(value: usize) -> NonNull<u8> { NonNull::new(value as *mut u8).unwrap() }

//  Creates a heap of 8-byte blocks matching the pattern, one block per character.
fn heap(pattern: &str) -> Heap {
    let pattern = Pattern::parse(pattern);

    let mut heap = Heap::configure(base(), pattern.len() * 8, pattern.len()).unwrap();

    for index in 0..pattern.len() {
        assert_eq!(Some(index), heap.allocate(8).and_then(|a| heap.index_of(a)));
    }

    for index in pattern.free() {
        heap.deallocate(heap.address_of(index).unwrap(), 8);
    }

    for index in 0..pattern.len() {
        assert_eq!(pattern.is_reserved(index), heap.block_status(index) == Some(BlockStatus::Reserved), "{}", index);
    }

    heap
}

fn render(heap: &Heap) -> std::string::String {
    Pattern::render(heap.statuses().iter().map(|status| status.is_reserved()))
}

//  Returns the offset of the allocation from the base, in blocks.
fn allocate(heap: &mut Heap, size: usize) -> Option<usize> {
    heap.allocate(size).map(|a| (a.as_ptr() as usize - BASE) / heap.block_size())
}

#[test]
fn block_heap_new() {
    let heap = Heap::configure(base(), 512, 64).unwrap();

    assert_eq!(64, heap.block_count());
    assert_eq!(64, heap.free_block_count());
    assert_eq!(64, heap.capacity());
    assert_eq!(8, heap.block_size().value());
}

#[test]
fn block_heap_new_overflow() {
    let result = Heap::configure(base(), 4096, 512);

    assert_eq!(Some(ConfigError::TableOverflow { required: 512, capacity: 64 }), result.err());

    let result = Heap::configure(std::ptr::null_mut(), 512, 64);

    assert_eq!(Some(ConfigError::NullBase), result.err());
}

#[test]
fn block_heap_fixed() {
    struct Fixed;

    impl FixedGeometry for Fixed {
        const REGION_START: usize = 0x8000;
        const REGION_SIZE: usize = 260;
        const BLOCK_SIZE: usize = 16;
    }

    let mut heap = BlockHeap::<16>::fixed::<Fixed>();

    assert_eq!(16, heap.block_count());
    assert_eq!(16, heap.free_block_count());
    assert_eq!(0x8000 + 256, heap.geometry().end());

    assert_eq!(Some(address(0x8000)), heap.allocate(1));
    assert_eq!(Some(address(0x8010)), heap.allocate(17));
    assert_eq!(13, heap.free_block_count());

    heap.reset();

    assert_eq!(16, heap.free_block_count());
    assert_eq!(Some(address(0x8000)), heap.allocate(16));
}

#[test]
fn block_heap_allocate_zero() {
    let mut heap = heap("........");

    assert_eq!(None, heap.allocate(0));
    assert_eq!(8, heap.free_block_count());
}

#[test]
fn block_heap_allocate_rounds_up() {
    let mut heap = heap("................");

    assert_eq!(Some(0), allocate(&mut heap, 1));
    assert_eq!(Some(1), allocate(&mut heap, 8));
    assert_eq!(Some(2), allocate(&mut heap, 9));
    assert_eq!(Some(4), allocate(&mut heap, 12));
    assert_eq!(Some(6), allocate(&mut heap, 40));

    assert_eq!("###########.....", render(&heap));
    assert_eq!(5, heap.free_block_count());
}

#[test]
fn block_heap_allocate_first_fit() {
    let pattern = "#...#.....#..#";

    assert_eq!(&[3, 5, 2][..], &Pattern::parse(pattern).free_runs()[..]);

    let mut heap = heap(pattern);

    assert_eq!(Some(1), allocate(&mut heap, 16));
    assert_eq!("###.#.....#..#", render(&heap));

    assert_eq!(Some(3), allocate(&mut heap, 8));
    assert_eq!(Some(5), allocate(&mut heap, 24));
    assert_eq!(Some(8), allocate(&mut heap, 16));
    assert_eq!(Some(11), allocate(&mut heap, 16));

    assert_eq!("##############", render(&heap));
}

#[test]
fn block_heap_allocate_skips_short_runs() {
    let mut heap = heap(".#..#...#....");

    assert_eq!(Some(9), allocate(&mut heap, 32));
    assert_eq!(Some(5), allocate(&mut heap, 24));
    assert_eq!(None, allocate(&mut heap, 24));
    assert_eq!(Some(2), allocate(&mut heap, 9));
    assert_eq!(Some(0), allocate(&mut heap, 8));

    assert_eq!(0, heap.free_block_count());
}

#[test]
fn block_heap_allocate_exhaustion() {
    let mut heap = heap("........");

    while heap.free_block_count() > 0 {
        assert!(heap.allocate(8).is_some());
    }

    assert_eq!(None, heap.allocate(8));
    assert_eq!(None, heap.allocate(1));
}

#[test]
fn block_heap_allocate_too_large() {
    let mut heap = heap("........");

    assert_eq!(None, heap.allocate(65));
    assert_eq!(None, heap.allocate(usize::MAX));
    assert_eq!(8, heap.free_block_count());

    assert_eq!(Some(0), allocate(&mut heap, 64));
}

#[test]
fn block_heap_round_trip() {
    let mut heap = heap("#..#....##......");

    let before = heap.free_block_count();

    for &size in &[1, 8, 12, 17, 40] {
        let pointer = heap.allocate(size).unwrap();

        assert_eq!(before - heap.blocks_for(size), heap.free_block_count());

        heap.deallocate(pointer, size);

        assert_eq!(before, heap.free_block_count());
        assert_eq!(16, heap.block_count());
    }

    assert_eq!("#..#....##......", render(&heap));
}

#[test]
fn block_heap_deallocate_ignored() {
    let mut heap = heap("########");

    //  Size 0.
    heap.deallocate(address(BASE), 0);

    //  Before, and past, the region.
    heap.deallocate(address(BASE - 1), 8);
    heap.deallocate(address(BASE + 64), 8);
    heap.deallocate(address(usize::MAX), 8);

    assert_eq!("########", render(&heap));
}

#[test]
fn block_heap_deallocate_clamped() {
    let mut heap = heap("########");

    heap.deallocate(address(BASE + 48), 1000);

    assert_eq!("######..", render(&heap));
    assert_eq!(8, heap.block_count());
}

#[test]
fn block_heap_deallocate_unchecked() {
    let mut heap = heap("........");

    let first = heap.allocate(16).unwrap();
    let second = heap.allocate(16).unwrap();

    //  Unaligned addresses free from the block containing them.
    heap.deallocate(address(first.as_ptr() as usize + 9), 1);
    assert_eq!("#.##....", render(&heap));

    //  A larger size frees the blocks of the next allocation too.
    heap.deallocate(first, 32);
    assert_eq!("........", render(&heap));

    //  Freeing twice is silently accepted.
    heap.deallocate(second, 16);
    assert_eq!(8, heap.free_block_count());
}

#[test]
fn block_heap_block_status() {
    let heap = heap("#.#.");

    assert_eq!(Some(BlockStatus::Reserved), heap.block_status(0));
    assert_eq!(Some(BlockStatus::Free), heap.block_status(1));
    assert_eq!(Some(BlockStatus::Reserved), heap.block_status(2));
    assert_eq!(Some(BlockStatus::Free), heap.block_status(3));

    //  Out of range, from the exact end onward.
    assert_eq!(None, heap.block_status(4));
    assert_eq!(None, heap.block_status(63));
    assert_eq!(None, heap.block_status(64));
    assert_eq!(None, heap.block_status(usize::MAX));
}

#[test]
fn block_heap_address_of() {
    let mut heap = heap("....");

    assert_eq!(Some(address(BASE)), heap.address_of(0));
    assert_eq!(Some(address(BASE + 24)), heap.address_of(3));
    assert_eq!(None, heap.address_of(4));

    let pointer = heap.allocate(20).unwrap();

    assert_eq!(Some(pointer), heap.address_of(0));
    assert_eq!(Some(0), heap.index_of(pointer));
    assert!(heap.contains(pointer));
    assert!(!heap.contains(address(BASE + 32)));
}

#[test]
fn block_heap_addresses_aligned() {
    let mut heap = Heap::configure(base(), 300, 20).unwrap();

    assert_eq!(15, heap.block_size().value());

    for &size in &[7, 15, 16, 31, 1, 45] {
        let pointer = heap.allocate(size).unwrap();

        assert_eq!(0, (pointer.as_ptr() as usize - BASE) % heap.block_size());
    }
}

#[test]
fn block_heap_init_failure_preserves_state() {
    let mut heap = heap("##..#...");

    let result = heap.reconfigure(base(), 8 * 128, 128);

    assert_eq!(Err(ConfigError::TableOverflow { required: 128, capacity: 64 }), result);
    assert_eq!(Err(ConfigError::NullBase), heap.reconfigure(std::ptr::null_mut(), 64, 8));
    assert_eq!(Err(ConfigError::ZeroBlockCount), heap.reconfigure(base(), 64, 0));

    assert_eq!("##..#...", render(&heap));
    assert_eq!(8, heap.block_size().value());
}

#[test]
fn block_heap_init_resets() {
    let mut heap = heap("##..#...");

    heap.reconfigure(address(0x9000).as_ptr(), 1024, 32).unwrap();

    assert_eq!(32, heap.block_count());
    assert_eq!(32, heap.free_block_count());
    assert_eq!(32, heap.block_size().value());
    assert_eq!(Some(address(0x9000)), heap.allocate(1));

    let geometry = Geometry::configure(base(), 64, 64).unwrap();
    heap.init(geometry).unwrap();

    assert_eq!(64, heap.free_block_count());
    assert_eq!(&geometry, heap.geometry());
}

#[test]
fn block_heap_map() {
    let heap = heap("##.#");

    assert_eq!("\t0\t8\t16\t24\n 0\t1101", heap.map().to_string());
}

} // mod tests
