use relay_sync_serde::Buffer;

use crate::{
    field::{DoubleFieldId, EventFieldId, FieldType, LongFieldId, StructureFieldId},
    object_id::ObjectId,
    types::{AccessGroups, MemberId, TemplateId},
};

pub mod error;
pub mod record;

use error::CommandError;
use record::CommandRecord;

/// Wire tag of a command
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Create = 1,
    Created = 2,
    SetLong = 3,
    IncrementLong = 4,
    CompareAndSetLong = 5,
    SetDouble = 6,
    IncrementDouble = 7,
    SetStructure = 8,
    Event = 9,
    TargetEvent = 10,
    DeleteField = 11,
    Delete = 12,
}

impl CommandKind {
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(tag: u8) -> Result<Self, CommandError> {
        let kind = match tag {
            1 => CommandKind::Create,
            2 => CommandKind::Created,
            3 => CommandKind::SetLong,
            4 => CommandKind::IncrementLong,
            5 => CommandKind::CompareAndSetLong,
            6 => CommandKind::SetDouble,
            7 => CommandKind::IncrementDouble,
            8 => CommandKind::SetStructure,
            9 => CommandKind::Event,
            10 => CommandKind::TargetEvent,
            11 => CommandKind::DeleteField,
            12 => CommandKind::Delete,
            tag => return Err(CommandError::UnknownKind { tag }),
        };
        Ok(kind)
    }

    /// Whether records of this kind address a single field
    pub fn has_field_id(self) -> bool {
        !matches!(
            self,
            CommandKind::Create | CommandKind::Created | CommandKind::Delete
        )
    }
}

/// A decoded command
///
/// Field values that are application structures travel as the already
/// encoded [`Buffer`]; collectors decode them with the codec of the type they
/// were declared for.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Starts constructing an object. Field commands for it may follow
    /// until [`Command::Created`].
    Create {
        object_id: ObjectId,
        template: TemplateId,
        access_groups: AccessGroups,
    },
    /// The object is fully constructed and visible
    Created { object_id: ObjectId },
    SetLong {
        object_id: ObjectId,
        field_id: LongFieldId,
        value: i64,
    },
    /// `increment` is a delta to add, never the resulting value
    IncrementLong {
        object_id: ObjectId,
        field_id: LongFieldId,
        increment: i64,
    },
    /// Outgoing, a request the relay evaluates. Incoming, `new` is the
    /// value the relay accepted.
    CompareAndSetLong {
        object_id: ObjectId,
        field_id: LongFieldId,
        current: i64,
        new: i64,
        reset: Option<i64>,
    },
    SetDouble {
        object_id: ObjectId,
        field_id: DoubleFieldId,
        value: f64,
    },
    IncrementDouble {
        object_id: ObjectId,
        field_id: DoubleFieldId,
        increment: f64,
    },
    SetStructure {
        object_id: ObjectId,
        field_id: StructureFieldId,
        value: Buffer,
    },
    Event {
        object_id: ObjectId,
        field_id: EventFieldId,
        event: Buffer,
    },
    /// Event delivered by the relay to `target` only
    TargetEvent {
        target: MemberId,
        object_id: ObjectId,
        field_id: EventFieldId,
        event: Buffer,
    },
    DeleteField {
        object_id: ObjectId,
        field_id: u16,
        field_type: FieldType,
    },
    Delete { object_id: ObjectId },
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Create { .. } => CommandKind::Create,
            Command::Created { .. } => CommandKind::Created,
            Command::SetLong { .. } => CommandKind::SetLong,
            Command::IncrementLong { .. } => CommandKind::IncrementLong,
            Command::CompareAndSetLong { .. } => CommandKind::CompareAndSetLong,
            Command::SetDouble { .. } => CommandKind::SetDouble,
            Command::IncrementDouble { .. } => CommandKind::IncrementDouble,
            Command::SetStructure { .. } => CommandKind::SetStructure,
            Command::Event { .. } => CommandKind::Event,
            Command::TargetEvent { .. } => CommandKind::TargetEvent,
            Command::DeleteField { .. } => CommandKind::DeleteField,
            Command::Delete { .. } => CommandKind::Delete,
        }
    }

    pub fn object_id(&self) -> ObjectId {
        match self {
            Command::Create { object_id, .. }
            | Command::Created { object_id }
            | Command::SetLong { object_id, .. }
            | Command::IncrementLong { object_id, .. }
            | Command::CompareAndSetLong { object_id, .. }
            | Command::SetDouble { object_id, .. }
            | Command::IncrementDouble { object_id, .. }
            | Command::SetStructure { object_id, .. }
            | Command::Event { object_id, .. }
            | Command::TargetEvent { object_id, .. }
            | Command::DeleteField { object_id, .. }
            | Command::Delete { object_id } => *object_id,
        }
    }

    pub fn field_id(&self) -> Option<u16> {
        match self {
            Command::Create { .. } | Command::Created { .. } | Command::Delete { .. } => None,
            Command::SetLong { field_id, .. }
            | Command::IncrementLong { field_id, .. }
            | Command::CompareAndSetLong { field_id, .. } => Some(field_id.id()),
            Command::SetDouble { field_id, .. } | Command::IncrementDouble { field_id, .. } => {
                Some(field_id.id())
            }
            Command::SetStructure { field_id, .. } => Some(field_id.id()),
            Command::Event { field_id, .. } | Command::TargetEvent { field_id, .. } => {
                Some(field_id.id())
            }
            Command::DeleteField { field_id, .. } => Some(*field_id),
        }
    }

    /// Frames the command as a record authored by `creator`
    ///
    /// Fails with [`CommandError::Buffer`] if the payload would exceed the
    /// buffer capacity, in which case nothing should be sent.
    pub fn encode(&self, creator: MemberId) -> Result<CommandRecord, CommandError> {
        let mut payload = Buffer::new();
        match self {
            Command::Create {
                template,
                access_groups,
                ..
            } => {
                payload.write(*template)?;
                payload.write(*access_groups)?;
            }
            Command::Created { .. } | Command::Delete { .. } => {}
            Command::SetLong { value, .. } => payload.write(*value)?,
            Command::IncrementLong { increment, .. } => payload.write(*increment)?,
            Command::CompareAndSetLong {
                current,
                new,
                reset,
                ..
            } => {
                payload.write(*current)?;
                payload.write(*new)?;
                payload.write(reset.is_some())?;
                payload.write(reset.unwrap_or_default())?;
            }
            Command::SetDouble { value, .. } => payload.write(*value)?,
            Command::IncrementDouble { increment, .. } => payload.write(*increment)?,
            Command::SetStructure { value, .. } => payload.write_bytes(value.as_slice())?,
            Command::Event { event, .. } => payload.write_bytes(event.as_slice())?,
            Command::TargetEvent { target, event, .. } => {
                payload.write(*target)?;
                payload.write_bytes(event.as_slice())?;
            }
            Command::DeleteField { field_type, .. } => field_type.write(&mut payload)?,
        }

        Ok(CommandRecord {
            kind: self.kind(),
            creator,
            object_id: self.object_id(),
            field_id: self.field_id(),
            payload,
        })
    }

    /// Parses the payload of `record` according to its kind
    ///
    /// Fixed-size payloads must be consumed exactly; leftover bytes are a
    /// [`CommandError::TrailingBytes`].
    pub fn decode(record: &CommandRecord) -> Result<Self, CommandError> {
        record.validate()?;

        let kind = record.kind;
        let object_id = record.object_id;
        let field_id = record.field_id.unwrap_or_default();
        let mut payload = record.payload;
        payload.rewind();

        let command = match kind {
            CommandKind::Create => Command::Create {
                object_id,
                template: payload.read()?,
                access_groups: payload.read()?,
            },
            CommandKind::Created => Command::Created { object_id },
            CommandKind::SetLong => Command::SetLong {
                object_id,
                field_id: LongFieldId::new(field_id),
                value: payload.read()?,
            },
            CommandKind::IncrementLong => Command::IncrementLong {
                object_id,
                field_id: LongFieldId::new(field_id),
                increment: payload.read()?,
            },
            CommandKind::CompareAndSetLong => {
                let current = payload.read()?;
                let new = payload.read()?;
                let has_reset = payload.read::<bool>()?;
                let reset = payload.read::<i64>()?;
                Command::CompareAndSetLong {
                    object_id,
                    field_id: LongFieldId::new(field_id),
                    current,
                    new,
                    reset: has_reset.then_some(reset),
                }
            }
            CommandKind::SetDouble => Command::SetDouble {
                object_id,
                field_id: DoubleFieldId::new(field_id),
                value: payload.read()?,
            },
            CommandKind::IncrementDouble => Command::IncrementDouble {
                object_id,
                field_id: DoubleFieldId::new(field_id),
                increment: payload.read()?,
            },
            CommandKind::SetStructure => Command::SetStructure {
                object_id,
                field_id: StructureFieldId::new(field_id),
                value: Self::read_rest(&mut payload)?,
            },
            CommandKind::Event => Command::Event {
                object_id,
                field_id: EventFieldId::new(field_id),
                event: Self::read_rest(&mut payload)?,
            },
            CommandKind::TargetEvent => Command::TargetEvent {
                target: payload.read()?,
                object_id,
                field_id: EventFieldId::new(field_id),
                event: Self::read_rest(&mut payload)?,
            },
            CommandKind::DeleteField => Command::DeleteField {
                object_id,
                field_id,
                field_type: FieldType::read(&mut payload)?,
            },
            CommandKind::Delete => Command::Delete { object_id },
        };

        if payload.remaining() > 0 {
            return Err(CommandError::TrailingBytes {
                kind,
                remaining: payload.remaining(),
            });
        }

        Ok(command)
    }

    fn read_rest(payload: &mut Buffer) -> Result<Buffer, CommandError> {
        let remaining = payload.remaining();
        let bytes = payload.read_bytes(remaining)?;
        Ok(Buffer::from_slice(bytes)?)
    }
}
