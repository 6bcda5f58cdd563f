//! # Relay Sync Shared
//! Identity model, codec registry and command wire format shared by the
//! relay-sync client and anything that speaks its protocol.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use relay_sync_serde::{Buffer, BufferError, Primitive, BUFFER_CAPACITY};

mod codec;
mod command;
mod field;
mod geometry;
mod object_id;
mod types;

pub use codec::{
    error::CodecError,
    registry::{CodecRegistry, CodecRegistryBuilder, CodecResolver},
    standard::{ColorCodec, ObjectIdCodec, PrimitiveCodec, Vector2Codec, Vector3Codec},
    Codec,
};
pub use command::{error::CommandError, record::CommandRecord, Command, CommandKind};
pub use field::{
    DoubleFieldId, DoubleKind, EventFieldId, EventKind, FieldId, FieldKey, FieldKind, FieldType,
    LongFieldId, LongKind, StructureFieldId, StructureKind,
};
pub use geometry::{Color, Vector2, Vector3};
pub use object_id::ObjectId;
pub use types::{AccessGroups, MemberId, TemplateId};
