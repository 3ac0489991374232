//! A collection of utilities.

use core::fmt;

/// A `fmt::Write` sink over a byte buffer, which stops writing once the buffer is full.
pub(crate) struct TruncatingWriter<'a> {
    buffer: &'a mut [u8],
    written: usize,
}

impl<'a> TruncatingWriter<'a> {
    /// Creates an instance, writing from the start of `buffer`.
    pub(crate) fn new(buffer: &'a mut [u8]) -> Self { Self { buffer, written: 0 } }

    /// Returns the number of bytes written so far.
    pub(crate) fn written(&self) -> usize { self.written }
}

impl fmt::Write for TruncatingWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let available = self.buffer.len() - self.written;
        let length = s.len().min(available);

        self.buffer[self.written..self.written + length].copy_from_slice(&s.as_bytes()[..length]);
        self.written += length;

        //  Signal truncation, to stop the formatting early.
        if length < s.len() { Err(fmt::Error) } else { Ok(()) }
    }
}

// mod tests
