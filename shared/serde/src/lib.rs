//! # Relay Sync Serde
//! Fixed-capacity, little-endian byte buffer shared by every relay-sync
//! codec and command payload.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod buffer;
mod error;
mod primitive;

pub use buffer::{Buffer, BUFFER_CAPACITY};
pub use error::BufferError;
pub use primitive::Primitive;
