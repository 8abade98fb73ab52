//! Raw tick record decoding.
//!
//! Capture buffers are sequences of 32-byte `Tick` records. Buffers read
//! from disk carry no alignment guarantee, so records are copied out
//! rather than cast in place.

use bytemuck::pod_read_unaligned;
use core::mem::size_of;

use crate::tick::Tick;

/// Size of one encoded tick.
pub const TICK_RECORD_SIZE: usize = size_of::<Tick>();

/// Record decoding errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Buffer doesn't hold a full record.
    BufferTooSmall,
    /// Buffer length is not a whole number of records.
    TrailingBytes,
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::BufferTooSmall => f.write_str("buffer too small for a tick record"),
            ParseError::TrailingBytes => f.write_str("buffer has trailing bytes after the last tick record"),
        }
    }
}

/// Decode the first record in `buffer`.
#[inline]
pub fn decode_tick(buffer: &[u8]) -> Result<Tick, ParseError> {
    if buffer.len() < TICK_RECORD_SIZE {
        return Err(ParseError::BufferTooSmall);
    }

    Ok(pod_read_unaligned(&buffer[..TICK_RECORD_SIZE]))
}

/// Iterator over the records of a capture buffer.
pub struct TickReader<'a> {
    chunks: core::slice::ChunksExact<'a, u8>,
}

impl<'a> TickReader<'a> {
    /// Create a reader; the buffer must hold a whole number of records.
    pub fn new(buffer: &'a [u8]) -> Result<Self, ParseError> {
        if buffer.len() % TICK_RECORD_SIZE != 0 {
            return Err(ParseError::TrailingBytes);
        }

        Ok(Self {
            chunks: buffer.chunks_exact(TICK_RECORD_SIZE),
        })
    }

    /// Number of records left.
    pub fn remaining(&self) -> usize {
        self.chunks.len()
    }
}

impl<'a> Iterator for TickReader<'a> {
    type Item = Tick;

    #[inline]
    fn next(&mut self) -> Option<Tick> {
        self.chunks.next().map(|chunk| pod_read_unaligned::<Tick>(chunk))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.chunks.len();
        (n, Some(n))
    }
}

impl ExactSizeIterator for TickReader<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_tick() {
        let tick = Tick::new(1.1, 1.2, 1_700_000_000.5, 10);
        let decoded = decode_tick(tick.as_bytes()).unwrap();
        assert_eq!(decoded, tick);
    }

    #[test]
    fn test_buffer_too_small() {
        let buffer = [0u8; 16];
        assert_eq!(decode_tick(&buffer), Err(ParseError::BufferTooSmall));
    }

    #[test]
    fn test_reader_unaligned() {
        let ticks = [
            Tick::new(1.0, 1.1, 1.0, 1),
            Tick::new(2.0, 2.1, 2.0, 2),
            Tick::new(3.0, 2.9, 3.0, 3),
        ];

        // Shift by one byte so records sit off their natural alignment.
        let mut storage = [0u8; 3 * TICK_RECORD_SIZE + 1];
        for (i, tick) in ticks.iter().enumerate() {
            let start = 1 + i * TICK_RECORD_SIZE;
            storage[start..start + TICK_RECORD_SIZE].copy_from_slice(tick.as_bytes());
        }

        let reader = TickReader::new(&storage[1..]).unwrap();
        assert_eq!(reader.remaining(), 3);

        let mut count = 0;
        for (decoded, expected) in reader.zip(ticks.iter()) {
            assert_eq!(&decoded, expected);
            count += 1;
        }
        assert_eq!(count, 3);
    }

    #[test]
    fn test_reader_trailing_bytes() {
        let buffer = [0u8; TICK_RECORD_SIZE + 5];
        assert!(matches!(TickReader::new(&buffer), Err(ParseError::TrailingBytes)));
    }

    #[test]
    fn test_reader_empty() {
        let mut reader = TickReader::new(&[]).unwrap();
        assert_eq!(reader.remaining(), 0);
        assert!(reader.next().is_none());
    }
}
