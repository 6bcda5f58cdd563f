use thiserror::Error;

/// Errors raised by bounds-checked [`Buffer`](crate::Buffer) access
///
/// A failed write never touches the buffer, and a failed read never moves
/// the read cursor, so the buffer stays usable after any of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Write would grow the buffer past its fixed capacity
    #[error("Cannot write {requested} bytes: buffer already holds {size} of {capacity} bytes")]
    OutOfSpace {
        requested: usize,
        size: usize,
        capacity: usize,
    },

    /// Read would consume bytes past the written size
    #[error("Cannot read {requested} bytes at position {pos}: buffer only holds {size} bytes. This usually means a framing bug or a codec version mismatch")]
    EndOfBuffer {
        requested: usize,
        pos: usize,
        size: usize,
    },

    /// Bytes were present but do not form a valid value of the requested type
    #[error("Byte {byte:#04x} is not a valid encoding of {type_name}")]
    InvalidValue {
        type_name: &'static str,
        byte: u8,
    },
}
