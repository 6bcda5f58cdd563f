use relay_sync_serde::Buffer;

use crate::{
    command::{error::CommandError, CommandKind},
    object_id::ObjectId,
    types::MemberId,
};

/// One command as it travels between a member and the relay
///
/// Layout of [`to_bytes`](Self::to_bytes), all integers little-endian:
///
/// | field       | size                         |
/// |-------------|------------------------------|
/// | kind        | 1                            |
/// | creator     | 2                            |
/// | object id   | 11                           |
/// | field id    | 2, only for field commands   |
/// | payload len | 1                            |
/// | payload     | `payload len`, at most 255   |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandRecord {
    pub kind: CommandKind,
    pub creator: MemberId,
    pub object_id: ObjectId,
    pub field_id: Option<u16>,
    pub payload: Buffer,
}

impl CommandRecord {
    fn header_size(kind: CommandKind) -> usize {
        let field_id = if kind.has_field_id() { 2 } else { 0 };
        1 + 2 + ObjectId::ENCODED_SIZE + field_id + 1
    }

    /// Checks that `field_id` is present exactly for the kinds that take one
    pub fn validate(&self) -> Result<(), CommandError> {
        match (self.kind.has_field_id(), self.field_id) {
            (true, None) => Err(CommandError::MissingFieldId { kind: self.kind }),
            (false, Some(_)) => Err(CommandError::UnexpectedFieldId { kind: self.kind }),
            _ => Ok(()),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CommandError> {
        self.validate()?;

        let mut header = Buffer::new();
        header.write(self.kind.to_u8())?;
        header.write(self.creator)?;
        self.object_id.write(&mut header)?;
        if let Some(field_id) = self.field_id {
            header.write(field_id)?;
        }
        header.write(self.payload.size() as u8)?;

        let mut bytes = Vec::with_capacity(header.size() + self.payload.size());
        bytes.extend_from_slice(header.as_slice());
        bytes.extend_from_slice(self.payload.as_slice());
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CommandError> {
        let Some(&tag) = bytes.first() else {
            return Err(CommandError::TruncatedRecord {
                expected: 1,
                actual: 0,
            });
        };
        let kind = CommandKind::from_u8(tag)?;

        let header_size = Self::header_size(kind);
        if bytes.len() < header_size {
            return Err(CommandError::TruncatedRecord {
                expected: header_size,
                actual: bytes.len(),
            });
        }

        let mut header = Buffer::from_slice(&bytes[1..header_size])?;
        let creator = header.read::<MemberId>()?;
        let object_id = ObjectId::read(&mut header)?;
        let field_id = if kind.has_field_id() {
            Some(header.read::<u16>()?)
        } else {
            None
        };
        let payload_size = header.read::<u8>()? as usize;

        let expected = header_size + payload_size;
        if bytes.len() < expected {
            return Err(CommandError::TruncatedRecord {
                expected,
                actual: bytes.len(),
            });
        }
        if bytes.len() > expected {
            return Err(CommandError::TrailingBytes {
                kind,
                remaining: bytes.len() - expected,
            });
        }

        Ok(Self {
            kind,
            creator,
            object_id,
            field_id,
            payload: Buffer::from_slice(&bytes[header_size..])?,
        })
    }
}
