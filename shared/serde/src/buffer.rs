use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::{error::BufferError, primitive::Primitive};

/// Hard cap on the size of any single encoded value
pub const BUFFER_CAPACITY: usize = 255;

/// Fixed-capacity byte buffer with a write cursor (`size`) and a read
/// cursor (`pos`)
///
/// Every typed codec appends to the write cursor and consumes from the read
/// cursor. Nothing here allocates: the storage is an inline array and every
/// access is bounds-checked against it.
#[derive(Clone, Copy)]
pub struct Buffer {
    data: [u8; BUFFER_CAPACITY],
    size: u8,
    pos: u8,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    pub const fn new() -> Self {
        Self {
            data: [0; BUFFER_CAPACITY],
            size: 0,
            pos: 0,
        }
    }

    /// Copies `source` into a fresh buffer, failing if it does not fit
    pub fn from_slice(source: &[u8]) -> Result<Self, BufferError> {
        let mut buffer = Self::new();
        buffer.write_bytes(source)?;
        Ok(buffer)
    }

    /// Number of written bytes
    pub fn size(&self) -> usize {
        self.size as usize
    }

    /// Read cursor
    pub fn pos(&self) -> usize {
        self.pos as usize
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Bytes that can still be read before hitting `size`
    pub fn remaining(&self) -> usize {
        self.size() - self.pos()
    }

    /// Bytes that can still be written before hitting the capacity
    pub fn free_space(&self) -> usize {
        BUFFER_CAPACITY - self.size()
    }

    /// The written bytes, independent of the read cursor
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.size()]
    }

    /// Resets both cursors. Old bytes stay in place and are overwritten by
    /// the next write.
    pub fn clear(&mut self) {
        self.size = 0;
        self.pos = 0;
    }

    /// Moves the read cursor back to the start so the contents can be decoded
    /// again
    pub fn rewind(&mut self) {
        self.pos = 0;
    }

    /// Drops written bytes past `size`, used to undo a partially written
    /// composite value. Never grows the buffer.
    pub fn truncate(&mut self, size: usize) {
        if size < self.size() {
            self.size = size as u8;
            if self.pos > self.size {
                self.pos = self.size;
            }
        }
    }

    // Raw access

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        let start = self.reserve(bytes.len())?;
        self.data[start..start + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&[u8], BufferError> {
        let start = self.consume(count)?;
        Ok(&self.data[start..start + count])
    }

    // Typed access

    pub fn write<P: Primitive>(&mut self, value: P) -> Result<(), BufferError> {
        let start = self.reserve(P::SIZE)?;
        value.write_le(&mut self.data[start..start + P::SIZE]);
        Ok(())
    }

    pub fn read<P: Primitive>(&mut self) -> Result<P, BufferError> {
        self.ensure_readable(P::SIZE)?;
        let start = self.pos();
        let value = P::read_le(&self.data[start..start + P::SIZE])?;
        self.pos += P::SIZE as u8;
        Ok(value)
    }

    // Cursors

    fn reserve(&mut self, count: usize) -> Result<usize, BufferError> {
        let start = self.size();
        if start + count > BUFFER_CAPACITY {
            return Err(BufferError::OutOfSpace {
                requested: count,
                size: start,
                capacity: BUFFER_CAPACITY,
            });
        }
        self.size = (start + count) as u8;
        Ok(start)
    }

    fn consume(&mut self, count: usize) -> Result<usize, BufferError> {
        self.ensure_readable(count)?;
        let start = self.pos();
        self.pos = (start + count) as u8;
        Ok(start)
    }

    fn ensure_readable(&self, count: usize) -> Result<(), BufferError> {
        if self.pos() + count > self.size() {
            return Err(BufferError::EndOfBuffer {
                requested: count,
                pos: self.pos(),
                size: self.size(),
            });
        }
        Ok(())
    }
}

// Two buffers are equal when they hold the same bytes; cursors are transient.
impl PartialEq for Buffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for Buffer {}

impl Hash for Buffer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Buffer[size = {}, pos = {}, data = (", self.size, self.pos)?;
        for (index, byte) in self.as_slice().iter().enumerate() {
            if index > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        write!(f, ")]")
    }
}
