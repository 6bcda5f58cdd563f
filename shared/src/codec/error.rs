use relay_sync_serde::BufferError;
use thiserror::Error;

/// Errors that can occur while registering, resolving or running codecs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Type was used without a registered codec
    #[error("No codec registered for type {type_name}. Register one with CodecRegistryBuilder::register() before building the registry")]
    MissingCodec { type_name: &'static str },

    /// A codec for the type was already registered
    #[error("A codec for type {type_name} is already registered")]
    DuplicateCodec { type_name: &'static str },

    /// A codec factory (directly or through its children) asked for itself
    #[error("Codec for type {type_name} depends on itself. Structure codecs must not be recursive")]
    CyclicCodec { type_name: &'static str },

    /// Encoding or decoding ran into a buffer bound or an invalid byte
    #[error("Buffer error: {0}")]
    Buffer(#[from] BufferError),
}
