//! Aligned backing memory for a heap.

use std::ptr;

/// Arena
///
/// `N` bytes of memory, aligned on 64 bytes, zero-initialized.
///
/// The arena is boxed so that its address remains stable when moved around, as heaps record it.
pub struct Arena<const N: usize>(Box<Storage<N>>);

#[repr(C, align(64))]
struct Storage<const N: usize>([u8; N]);

impl<const N: usize> Arena<N> {
    /// Alignment of the first byte.
    pub const ALIGNMENT: usize = 64;

    /// Creates a zero-initialized arena.
    pub fn new() -> Self { Self(Box::new(Storage([0; N]))) }

    /// Returns a pointer to the first byte.
    pub fn base(&mut self) -> *mut u8 { self.0.0.as_mut_ptr() }

    /// Returns the number of bytes.
    pub fn len(&self) -> usize { N }

    /// Returns whether the arena is empty.
    pub fn is_empty(&self) -> bool { N == 0 }

    /// Returns the bytes, for inspection.
    pub fn bytes(&self) -> &[u8] { &self.0.0 }

    /// Returns the offset of `pointer` from the base, or None if it does not point within the arena.
    pub fn offset_of(&self, pointer: *const u8) -> Option<usize> {
        let base = self.0.0.as_ptr() as usize;
        let pointer = pointer as usize;

        if base <= pointer && pointer < base + N { Some(pointer - base) } else { None }
    }

    /// Fills `length` bytes starting at `pointer` with `value`.
    ///
    /// #   Panics
    ///
    /// If the range does not lie within the arena.
    pub fn fill(&mut self, pointer: *mut u8, length: usize, value: u8) {
        let offset = self.offset_of(pointer).expect("Within arena");
        assert!(offset + length <= N, "{} + {} > {}", offset, length, N);

        //  Safety:
        //  -   The range lies within the arena, which is exclusively borrowed.
        unsafe { ptr::write_bytes(pointer, value, length) };
    }
}

impl<const N: usize> Default for Arena<N> {
    fn default() -> Self { Self::new() }
}

// mod tests
