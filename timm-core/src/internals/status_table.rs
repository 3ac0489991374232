//! The status table: one entry per block, recording whether the block is free or reserved.
//!
//! Storage for `CAPACITY` entries is always present; only the first `len` entries are live, and every scan stops at
//! the end of the live entries.

use crate::BlockStatus;

pub(crate) struct StatusTable<const CAPACITY: usize> {
    entries: [BlockStatus; CAPACITY],
    len: usize,
}

impl<const CAPACITY: usize> StatusTable<CAPACITY> {
    /// Creates a table with no live entries.
    pub(crate) const fn new() -> Self { Self { entries: [BlockStatus::Free; CAPACITY], len: 0 } }

    /// Resets the table to `len` live entries, all free.
    pub(crate) fn reset(&mut self, len: usize) {
        debug_assert!(len <= CAPACITY, "{} > {}", len, CAPACITY);

        self.len = len;
        self.entries[..len].fill(BlockStatus::Free);
    }

    /// Returns the number of live entries.
    pub(crate) fn len(&self) -> usize { self.len }

    /// Returns the live entries.
    pub(crate) fn entries(&self) -> &[BlockStatus] { &self.entries[..self.len] }

    /// Returns the status of the entry at `index`, or None if it is not live.
    pub(crate) fn get(&self, index: usize) -> Option<BlockStatus> { self.entries().get(index).copied() }

    /// Returns the number of free entries.
    pub(crate) fn count_free(&self) -> usize { self.entries().iter().filter(|status| status.is_free()).count() }

    /// Returns the index of the first run of at least `number` free entries, or None if there is none.
    ///
    /// The scan visits each entry once: when a run of free entries ends short, it resumes after the reserved entry
    /// which ended it.
    pub(crate) fn find_first_fit(&self, number: usize) -> Option<usize> {
        debug_assert!(number > 0);

        if number > self.len {
            return None;
        }

        let mut run_start = 0;
        let mut run_length = 0;

        for (index, status) in self.entries().iter().enumerate() {
            if status.is_reserved() {
                run_length = 0;
                continue;
            }

            if run_length == 0 {
                run_start = index;
            }

            run_length += 1;

            if run_length == number {
                return Some(run_start);
            }
        }

        None
    }

    /// Marks the `number` entries starting at `index` as reserved.
    ///
    /// The entries are expected to be live and free, as located by `find_first_fit`.
    pub(crate) fn reserve(&mut self, index: usize, number: usize) {
        debug_assert!(index + number <= self.len, "{} + {} > {}", index, number, self.len);

        let run = &mut self.entries[index..index + number];
        debug_assert!(run.iter().all(|status| status.is_free()));

        run.fill(BlockStatus::Reserved);
    }

    /// Marks up to `number` entries starting at `index` as free.
    ///
    /// Entries past the live entries are left untouched, whatever `index` and `number`.
    pub(crate) fn release(&mut self, index: usize, number: usize) {
        let end = index.saturating_add(number).min(self.len);

        if index < end {
            self.entries[index..end].fill(BlockStatus::Free);
        }
    }
}

// mod tests
