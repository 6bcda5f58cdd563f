//! Codecs registered by [`CodecRegistryBuilder::new`](super::registry::CodecRegistryBuilder::new).

use std::marker::PhantomData;

use relay_sync_serde::{Buffer, BufferError, Primitive};

use crate::{
    codec::Codec,
    geometry::{Color, Vector2, Vector3},
    object_id::ObjectId,
};

/// Fixed-width little-endian encoding of a single primitive
pub struct PrimitiveCodec<P> {
    phantom: PhantomData<fn() -> P>,
}

impl<P> Default for PrimitiveCodec<P> {
    fn default() -> Self {
        Self {
            phantom: PhantomData,
        }
    }
}

impl<P> Clone for PrimitiveCodec<P> {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl<P: Primitive> Codec for PrimitiveCodec<P> {
    type Value = P;

    fn encode(&self, value: &P, buffer: &mut Buffer) -> Result<(), BufferError> {
        buffer.write(*value)
    }

    fn decode(&self, buffer: &mut Buffer) -> Result<P, BufferError> {
        buffer.read()
    }
}

// Aggregates check free space up front so a partial write never happens.
fn reserve(buffer: &Buffer, requested: usize) -> Result<(), BufferError> {
    if buffer.free_space() < requested {
        return Err(BufferError::OutOfSpace {
            requested,
            size: buffer.size(),
            capacity: relay_sync_serde::BUFFER_CAPACITY,
        });
    }
    Ok(())
}

#[derive(Clone, Copy, Default)]
pub struct Vector2Codec;

impl Codec for Vector2Codec {
    type Value = Vector2;

    fn encode(&self, value: &Vector2, buffer: &mut Buffer) -> Result<(), BufferError> {
        reserve(buffer, 2 * f32::SIZE)?;
        buffer.write(value.x)?;
        buffer.write(value.y)
    }

    fn decode(&self, buffer: &mut Buffer) -> Result<Vector2, BufferError> {
        Ok(Vector2 {
            x: buffer.read()?,
            y: buffer.read()?,
        })
    }
}

#[derive(Clone, Copy, Default)]
pub struct Vector3Codec;

impl Codec for Vector3Codec {
    type Value = Vector3;

    fn encode(&self, value: &Vector3, buffer: &mut Buffer) -> Result<(), BufferError> {
        reserve(buffer, 3 * f32::SIZE)?;
        buffer.write(value.x)?;
        buffer.write(value.y)?;
        buffer.write(value.z)
    }

    fn decode(&self, buffer: &mut Buffer) -> Result<Vector3, BufferError> {
        Ok(Vector3 {
            x: buffer.read()?,
            y: buffer.read()?,
            z: buffer.read()?,
        })
    }
}

#[derive(Clone, Copy, Default)]
pub struct ColorCodec;

impl Codec for ColorCodec {
    type Value = Color;

    fn encode(&self, value: &Color, buffer: &mut Buffer) -> Result<(), BufferError> {
        reserve(buffer, 4 * f32::SIZE)?;
        buffer.write(value.r)?;
        buffer.write(value.g)?;
        buffer.write(value.b)?;
        buffer.write(value.a)
    }

    fn decode(&self, buffer: &mut Buffer) -> Result<Color, BufferError> {
        Ok(Color {
            r: buffer.read()?,
            g: buffer.read()?,
            b: buffer.read()?,
            a: buffer.read()?,
        })
    }
}

#[derive(Clone, Copy, Default)]
pub struct ObjectIdCodec;

impl Codec for ObjectIdCodec {
    type Value = ObjectId;

    fn encode(&self, value: &ObjectId, buffer: &mut Buffer) -> Result<(), BufferError> {
        value.write(buffer)
    }

    fn decode(&self, buffer: &mut Buffer) -> Result<ObjectId, BufferError> {
        ObjectId::read(buffer)
    }
}
