//! A human-readable rendering of the status table.

use core::fmt::{self, Write};

use crate::utils::TruncatingWriter;

use super::BlockStatus;

/// StatusMap
///
/// A read-only view of the status table, displayed as rows of 32 entries: `0` for a free block, `1` for a reserved
/// block. Each row is prefixed by the index of its first entry.
///
/// ```text
///         0       8       16      24
///  0      11110000000000000000000000000000
///  32     00000000000000000000000000000000
/// ```
#[derive(Clone, Copy)]
pub struct StatusMap<'a> {
    entries: &'a [BlockStatus],
}

impl<'a> StatusMap<'a> {
    /// Number of entries per row.
    pub const ROW_WIDTH: usize = 32;

    /// Creates a view of `entries`.
    pub fn new(entries: &'a [BlockStatus]) -> Self { Self { entries } }

    /// Renders the map into `buffer`, returns the number of bytes written.
    ///
    /// The rendering is truncated if `buffer` is too small.
    pub fn render_into(&self, buffer: &mut [u8]) -> usize {
        let mut writer = TruncatingWriter::new(buffer);

        //  Truncation is reported as an error, and is expected.
        let _ = write!(writer, "{}", self);

        writer.written()
    }
}

impl fmt::Display for StatusMap<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\t0\t8\t16\t24")?;

        for (index, status) in self.entries.iter().enumerate() {
            if index % Self::ROW_WIDTH == 0 {
                write!(f, "\n {}\t", index)?;
            }

            f.write_char(if status.is_free() { '0' } else { '1' })?;
        }

        Ok(())
    }
}

impl fmt::Debug for StatusMap<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Display::fmt(self, f) }
}

#[cfg(test)]
mod tests {

use std::string::ToString;

use super::*;

const F: BlockStatus = BlockStatus::Free;
const R: BlockStatus = BlockStatus::Reserved;

#[test]
fn status_map_display_empty() {
    assert_eq!("\t0\t8\t16\t24", StatusMap::new(&[]).to_string());
}

#[test]
fn status_map_display_single_row() {
    let entries = [R, R, F, R, F];

    assert_eq!("\t0\t8\t16\t24\n 0\t11010", StatusMap::new(&entries).to_string());
}

#[test]
fn status_map_display_rows() {
    let mut entries = [F; 70];
    entries[0] = R;
    entries[33] = R;
    entries[69] = R;

    let expected = concat!(
        "\t0\t8\t16\t24",
        "\n 0\t10000000000000000000000000000000",
        "\n 32\t01000000000000000000000000000000",
        "\n 64\t000001",
    );

    assert_eq!(expected, StatusMap::new(&entries).to_string());
}

#[test]
fn status_map_render_into() {
    let entries = [R, F, F, R];

    let mut buffer = [0u8; 64];
    let written = StatusMap::new(&entries).render_into(&mut buffer);

    assert_eq!(b"\t0\t8\t16\t24\n 0\t1001", &buffer[..written]);

    let mut buffer = [0u8; 5];
    let written = StatusMap::new(&entries).render_into(&mut buffer);

    assert_eq!(5, written);
    assert_eq!(b"\t0\t8\t", &buffer);
}

} // mod tests
