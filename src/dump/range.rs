//! Address ranges and their partition into dump-sized chunks.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Size of the target's address space (32-bit).
pub const DEVICE_ADDRESS_LIMIT: u64 = 1 << 32;

/// A non-empty `[base, base + length)` range of device memory.
///
/// # Examples
///
/// ```
/// use rommon_dump::dump::AddressRange;
///
/// let range = AddressRange::new(0, 0x2_0000).unwrap();
/// let chunks: Vec<_> = range.chunks(0x1_0000).unwrap().collect();
/// assert_eq!(chunks.len(), 2);
/// assert_eq!(chunks[1].offset, 0x1_0000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRange {
    base: u64,
    length: u64,
}

impl AddressRange {
    /// Creates a range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `length` is zero or the range runs past
    /// [`DEVICE_ADDRESS_LIMIT`].
    pub fn new(base: u64, length: u64) -> Result<Self> {
        if length == 0 {
            return Err(Error::config("length must be > 0"));
        }
        match base.checked_add(length) {
            Some(end) if end <= DEVICE_ADDRESS_LIMIT => Ok(Self { base, length }),
            _ => Err(Error::config(format!(
                "range 0x{base:x} + 0x{length:x} exceeds the 32-bit address space"
            ))),
        }
    }

    /// First address.
    #[must_use]
    pub const fn base(&self) -> u64 {
        self.base
    }

    /// Number of bytes.
    #[must_use]
    pub const fn length(&self) -> u64 {
        self.length
    }

    /// One past the last address.
    #[must_use]
    pub const fn end(&self) -> u64 {
        self.base + self.length
    }

    /// Splits the range into chunks of at most `max_chunk_size` bytes, in
    /// ascending address order. Only the last chunk may be shorter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `max_chunk_size` is zero.
    pub fn chunks(&self, max_chunk_size: u64) -> Result<Chunks> {
        if max_chunk_size == 0 {
            return Err(Error::config("chunk size must be > 0"));
        }
        Ok(Chunks {
            cursor: self.base,
            end: self.end(),
            max_chunk_size,
            index: 0,
        })
    }

    /// Number of chunks [`chunks`](Self::chunks) yields for `max_chunk_size`.
    #[must_use]
    pub const fn chunk_count(&self, max_chunk_size: u64) -> u64 {
        if max_chunk_size == 0 {
            return 0;
        }
        self.length.div_ceil(max_chunk_size)
    }
}

/// One dump command's worth of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position within the range (0-based).
    pub index: u64,
    /// Start address.
    pub offset: u64,
    /// Number of bytes.
    pub size: u64,
}

/// Forward cursor over a range, yielding [`Chunk`]s.
#[derive(Debug, Clone)]
pub struct Chunks {
    cursor: u64,
    end: u64,
    max_chunk_size: u64,
    index: u64,
}

impl Iterator for Chunks {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.cursor >= self.end {
            return None;
        }
        let size = self.max_chunk_size.min(self.end - self.cursor);
        let chunk = Chunk {
            index: self.index,
            offset: self.cursor,
            size,
        };
        self.cursor += size;
        self.index += 1;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.cursor).div_ceil(self.max_chunk_size);
        let remaining = usize::try_from(remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Chunks {}

impl std::iter::FusedIterator for Chunks {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_range_rejects_zero_length() {
        let err = AddressRange::new(0x1000, 0).unwrap_err();
        assert!(err.to_string().contains("length must be > 0"));
    }

    #[test]
    fn test_range_rejects_overflow() {
        assert!(AddressRange::new(u64::MAX, 1).is_err());
        assert!(AddressRange::new(0xFFFF_FFFF, 2).is_err());
        assert!(AddressRange::new(0xFFFF_FFFF, 1).is_ok());
        assert!(AddressRange::new(0, DEVICE_ADDRESS_LIMIT).is_ok());
    }

    #[test]
    fn test_range_accessors() {
        let range = AddressRange::new(0x100, 0x20).unwrap();
        assert_eq!(range.base(), 0x100);
        assert_eq!(range.length(), 0x20);
        assert_eq!(range.end(), 0x120);
    }

    #[test]
    fn test_zero_chunk_size() {
        let range = AddressRange::new(0, 16).unwrap();
        assert!(range.chunks(0).is_err());
        assert_eq!(range.chunk_count(0), 0);
    }

    #[test]
    fn test_single_short_chunk() {
        let range = AddressRange::new(0x10, 100).unwrap();
        let chunks: Vec<_> = range.chunks(65_536).unwrap().collect();
        assert_eq!(
            chunks,
            vec![Chunk {
                index: 0,
                offset: 0x10,
                size: 100
            }]
        );
    }

    #[test]
    fn test_exact_multiple_has_no_remainder() {
        let range = AddressRange::new(0, 0x2_0000).unwrap();
        let chunks: Vec<_> = range.chunks(65_536).unwrap().collect();
        assert_eq!(chunks.len(), 2);
        assert_eq!((chunks[0].offset, chunks[0].size), (0, 65_536));
        assert_eq!((chunks[1].offset, chunks[1].size), (65_536, 65_536));
    }

    #[test]
    fn test_last_chunk_clamped() {
        let range = AddressRange::new(0x1000, 250).unwrap();
        let sizes: Vec<_> = range.chunks(100).unwrap().map(|c| c.size).collect();
        assert_eq!(sizes, vec![100, 100, 50]);
    }

    #[test]
    fn test_size_hint() {
        let range = AddressRange::new(0, 250).unwrap();
        let mut chunks = range.chunks(100).unwrap();
        assert_eq!(chunks.len(), 3);
        chunks.next();
        assert_eq!(chunks.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_chunks_partition_range(
            base in 0u64..0x1_0000_0000,
            length in 1u64..0x40_0000,
            chunk_size in 0x100u64..0x2_0000,
        ) {
            prop_assume!(base + length <= DEVICE_ADDRESS_LIMIT);
            let range = AddressRange::new(base, length).unwrap();
            let chunks: Vec<_> = range.chunks(chunk_size).unwrap().collect();

            prop_assert_eq!(chunks.len() as u64, length.div_ceil(chunk_size));
            prop_assert_eq!(range.chunk_count(chunk_size), chunks.len() as u64);
            for (i, chunk) in chunks.iter().enumerate() {
                let i = i as u64;
                prop_assert_eq!(chunk.index, i);
                prop_assert_eq!(chunk.offset, base + i * chunk_size);
                prop_assert_eq!(chunk.size, chunk_size.min(length - i * chunk_size));
            }
            let total: u64 = chunks.iter().map(|c| c.size).sum();
            prop_assert_eq!(total, length);
        }
    }
}
