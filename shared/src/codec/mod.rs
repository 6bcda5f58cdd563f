use relay_sync_serde::{Buffer, BufferError};

pub mod error;
pub mod registry;
pub mod standard;

/// Encodes and decodes one value type against a [`Buffer`]
///
/// Codecs are shared read-only by the registry and every collector that
/// needs them, so they must be `Send + Sync`. A structure codec typically
/// holds the child codecs it resolved at construction:
///
/// ```
/// use std::sync::Arc;
/// use relay_sync_shared::{Buffer, BufferError, Codec, CodecRegistryBuilder};
///
/// #[derive(Debug, PartialEq)]
/// struct Turret { damage: f64, speed: i32 }
///
/// struct TurretCodec {
///     damage: Arc<dyn Codec<Value = f64>>,
///     speed: Arc<dyn Codec<Value = i32>>,
/// }
///
/// impl Codec for TurretCodec {
///     type Value = Turret;
///
///     fn encode(&self, value: &Turret, buffer: &mut Buffer) -> Result<(), BufferError> {
///         self.damage.encode(&value.damage, buffer)?;
///         self.speed.encode(&value.speed, buffer)
///     }
///
///     fn decode(&self, buffer: &mut Buffer) -> Result<Turret, BufferError> {
///         Ok(Turret { damage: self.damage.decode(buffer)?, speed: self.speed.decode(buffer)? })
///     }
/// }
///
/// let mut builder = CodecRegistryBuilder::new();
/// builder
///     .register(|resolver| {
///         Ok(TurretCodec { damage: resolver.get::<f64>()?, speed: resolver.get::<i32>()? })
///     })
///     .unwrap();
/// let registry = builder.build().unwrap();
///
/// let mut buffer = Buffer::new();
/// registry.encode(&Turret { damage: 1.5, speed: 154 }, &mut buffer).unwrap();
/// assert_eq!(registry.decode::<Turret>(&mut buffer).unwrap(), Turret { damage: 1.5, speed: 154 });
/// ```
pub trait Codec: Send + Sync + 'static {
    type Value: 'static;

    /// Appends the encoding of `value` at the buffer's write cursor. No
    /// length prefix is written.
    fn encode(&self, value: &Self::Value, buffer: &mut Buffer) -> Result<(), BufferError>;

    /// Consumes one value from the buffer's read cursor
    fn decode(&self, buffer: &mut Buffer) -> Result<Self::Value, BufferError>;
}
