use crate::error::BufferError;

/// A fixed-width value with a pinned little-endian wire layout
///
/// Integers are two's complement, floats are their IEEE-754 bit pattern,
/// `bool` is a single `0`/`1` byte.
pub trait Primitive: Copy + Send + Sync + 'static {
    /// Number of bytes this value occupies on the wire
    const SIZE: usize;

    /// Writes exactly `Self::SIZE` bytes into `out`
    fn write_le(self, out: &mut [u8]);

    /// Reads a value from exactly `Self::SIZE` bytes
    fn read_le(bytes: &[u8]) -> Result<Self, BufferError>;
}

macro_rules! impl_primitive {
    ($($t:ty),*) => {
        $(
            impl Primitive for $t {
                const SIZE: usize = std::mem::size_of::<$t>();

                fn write_le(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_le_bytes());
                }

                fn read_le(bytes: &[u8]) -> Result<Self, BufferError> {
                    let mut raw = [0u8; std::mem::size_of::<$t>()];
                    raw.copy_from_slice(bytes);
                    Ok(<$t>::from_le_bytes(raw))
                }
            }
        )*
    };
}

impl_primitive!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

impl Primitive for bool {
    const SIZE: usize = 1;

    fn write_le(self, out: &mut [u8]) {
        out[0] = u8::from(self);
    }

    fn read_le(bytes: &[u8]) -> Result<Self, BufferError> {
        match bytes[0] {
            0 => Ok(false),
            1 => Ok(true),
            byte => Err(BufferError::InvalidValue {
                type_name: "bool",
                byte,
            }),
        }
    }
}
