//! The configuration of fixed-geometry heaps.
//!
//! A heap may be laid out in one of two modes:
//!
//! -   Configurable: the region and the number of blocks are supplied at runtime, see `Geometry::configure`.
//! -   Fixed: the region and the block size are compiled in, via an implementation of `FixedGeometry`.
//!
//! A fixed geometry is validated at compile-time, against the capacity of the status table of the heap it lays out:
//! an invalid geometry fails the build rather than the initialization.

use core::{marker::PhantomData, ptr::NonNull};

use super::{BlockSize, Geometry};

/// FixedGeometry
///
/// A compiled-in layout of a region.
pub trait FixedGeometry {
    /// The address of the first byte of the region.
    ///
    /// It must not be null.
    const REGION_START: usize;

    /// The size, in bytes, of the region.
    ///
    /// Bytes past the last whole block are not managed.
    const REGION_SIZE: usize;

    /// The number of bytes per block.
    ///
    /// It must not be 0.
    const BLOCK_SIZE: usize;
}

/// Properties
///
/// Properties of a given FixedGeometry, for a status table of `CAPACITY` entries.
///
/// Work-around for the inability to implement static methods directly on a trait.
pub struct Properties<G, const CAPACITY: usize>(PhantomData<G>);

impl<G, const CAPACITY: usize> Properties<G, CAPACITY>
    where
        G: FixedGeometry
{
    /// Validates the geometry.
    ///
    /// Evaluating this constant fails the build if:
    ///
    /// -   The region starts at the null address.
    /// -   The block size is 0.
    /// -   The region extends past the end of the address space.
    /// -   The region holds more blocks than the status table holds entries.
    pub const VALID: () = {
        assert!(G::REGION_START != 0, "FixedGeometry: null REGION_START");
        assert!(G::BLOCK_SIZE != 0, "FixedGeometry: zero BLOCK_SIZE");
        assert!(G::REGION_START.checked_add(G::REGION_SIZE).is_some(), "FixedGeometry: region overflows");
        assert!(G::REGION_SIZE / G::BLOCK_SIZE <= CAPACITY, "FixedGeometry: status table capacity exceeded");
    };

    /// Returns the block size.
    pub fn block_size() -> BlockSize {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID;

        //  Safety:
        //  -   `G::BLOCK_SIZE` is not 0, as per `VALID`.
        unsafe { BlockSize::new_unchecked(G::BLOCK_SIZE) }
    }

    /// Returns the number of blocks, that is the number of entries of the status table in use.
    pub fn number_blocks() -> usize { G::REGION_SIZE / Self::block_size() }

    /// Returns the geometry.
    pub fn geometry() -> Geometry {
        let block_size = Self::block_size();

        //  Safety:
        //  -   `G::REGION_START` is not null, as per `VALID`.
        let start = unsafe { NonNull::new_unchecked(G::REGION_START as *mut u8) };

        //  Safety:
        //  -   `G::REGION_START + G::REGION_SIZE` does not overflow, as per `VALID`, and the blocks fit within.
        unsafe { Geometry::new_unchecked(start, block_size, Self::number_blocks()) }
    }
}

// mod tests
