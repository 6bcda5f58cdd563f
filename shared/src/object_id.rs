use std::fmt;

use relay_sync_serde::{Buffer, BufferError};

use crate::types::MemberId;

/// Identifies a game object inside a room
///
/// Objects created by a member carry that member's id; objects owned by the
/// room itself have `owned_by_room_owner` set and `member_id == 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    pub numeric_id: u64,
    pub owned_by_room_owner: bool,
    pub member_id: MemberId,
}

impl ObjectId {
    /// Bytes taken by an `ObjectId` on the wire
    pub const ENCODED_SIZE: usize = 8 + 1 + 2;

    pub const fn new_member(numeric_id: u64, member_id: MemberId) -> Self {
        Self {
            numeric_id,
            owned_by_room_owner: false,
            member_id,
        }
    }

    pub const fn new_room(numeric_id: u64) -> Self {
        Self {
            numeric_id,
            owned_by_room_owner: true,
            member_id: 0,
        }
    }

    pub fn write(&self, buffer: &mut Buffer) -> Result<(), BufferError> {
        if buffer.free_space() < Self::ENCODED_SIZE {
            return Err(BufferError::OutOfSpace {
                requested: Self::ENCODED_SIZE,
                size: buffer.size(),
                capacity: relay_sync_serde::BUFFER_CAPACITY,
            });
        }
        buffer.write(self.numeric_id)?;
        buffer.write(self.owned_by_room_owner)?;
        buffer.write(self.member_id)
    }

    pub fn read(buffer: &mut Buffer) -> Result<Self, BufferError> {
        let numeric_id = buffer.read::<u64>()?;
        let owned_by_room_owner = buffer.read::<bool>()?;
        let member_id = buffer.read::<MemberId>()?;
        Ok(Self {
            numeric_id,
            owned_by_room_owner,
            member_id,
        })
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.owned_by_room_owner {
            write!(f, "room#{}", self.numeric_id)
        } else {
            write!(f, "member{}#{}", self.member_id, self.numeric_id)
        }
    }
}
