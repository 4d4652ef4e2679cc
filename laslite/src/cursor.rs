use crate::error::ReadLasError;
use byteorder::{ByteOrder, LittleEndian};

/// Cursor over the loaded file bytes.
///
/// All multi-byte fields in a LAS file are little-endian, so the typed reads
/// decode with [LittleEndian] unconditionally. Every read is bounds-checked
/// against the underlying buffer and fails with
/// [ReadLasError::OutOfBounds] instead of panicking.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        ByteCursor { bytes, position: 0 }
    }

    /// An independent cursor over the same buffer, positioned at the given
    /// absolute offset. Point records are addressed by computed offset, so
    /// forking must not disturb the position of the original cursor.
    pub fn fork_at(&self, offset: usize) -> Self {
        ByteCursor {
            bytes: self.bytes,
            position: offset,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.position)
    }

    /// Returns exactly `count` bytes starting at the current position and
    /// advances the position past them.
    pub fn read_exact(&mut self, count: usize) -> Result<&'a [u8], ReadLasError> {
        let end = match self.position.checked_add(count) {
            Some(end) if end <= self.bytes.len() => end,
            _ => {
                return Err(ReadLasError::OutOfBounds {
                    offset: self.position,
                    count,
                    buffer_len: self.bytes.len(),
                })
            }
        };
        let slice = &self.bytes[self.position..end];
        self.position = end;
        Ok(slice)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ReadLasError> {
        let slice = self.read_exact(N)?;
        let mut out = [0_u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    pub fn read_vec(&mut self, count: usize) -> Result<Vec<u8>, ReadLasError> {
        Ok(self.read_exact(count)?.to_vec())
    }

    pub fn skip(&mut self, count: usize) -> Result<(), ReadLasError> {
        self.read_exact(count)?;
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadLasError> {
        Ok(self.read_exact(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, ReadLasError> {
        Ok(self.read_exact(1)?[0] as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16, ReadLasError> {
        Ok(LittleEndian::read_u16(self.read_exact(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, ReadLasError> {
        Ok(LittleEndian::read_u32(self.read_exact(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32, ReadLasError> {
        Ok(LittleEndian::read_i32(self.read_exact(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64, ReadLasError> {
        Ok(LittleEndian::read_u64(self.read_exact(8)?))
    }

    pub fn read_f64(&mut self) -> Result<f64, ReadLasError> {
        Ok(LittleEndian::read_f64(self.read_exact(8)?))
    }
}
