use std::{fmt::Debug, hash::Hash, marker::PhantomData};

use relay_sync_serde::{Buffer, BufferError};

use crate::object_id::ObjectId;

/// Runtime tag of a field kind, as carried by delete-field commands
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    Long = 1,
    Double = 2,
    Structure = 3,
    Event = 4,
}

impl FieldType {
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(tag: u8) -> Result<Self, BufferError> {
        match tag {
            1 => Ok(FieldType::Long),
            2 => Ok(FieldType::Double),
            3 => Ok(FieldType::Structure),
            4 => Ok(FieldType::Event),
            byte => Err(BufferError::InvalidValue {
                type_name: "FieldType",
                byte,
            }),
        }
    }

    pub fn write(&self, buffer: &mut Buffer) -> Result<(), BufferError> {
        buffer.write(self.to_u8())
    }

    pub fn read(buffer: &mut Buffer) -> Result<Self, BufferError> {
        let tag = buffer.read::<u8>()?;
        Self::from_u8(tag)
    }
}

/// Compile-time marker for a field kind
pub trait FieldKind: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    const FIELD_TYPE: FieldType;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LongKind;
impl FieldKind for LongKind {
    const FIELD_TYPE: FieldType = FieldType::Long;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DoubleKind;
impl FieldKind for DoubleKind {
    const FIELD_TYPE: FieldType = FieldType::Double;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StructureKind;
impl FieldKind for StructureKind {
    const FIELD_TYPE: FieldType = FieldType::Structure;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EventKind;
impl FieldKind for EventKind {
    const FIELD_TYPE: FieldType = FieldType::Event;
}

/// A field id tagged with its kind, so a long field id can never be passed
/// where a structure field id is expected
///
/// Applications declare these as constants:
///
/// ```
/// use relay_sync_shared::LongFieldId;
///
/// const SCORE: LongFieldId = LongFieldId::new(999);
/// assert_eq!(SCORE.id(), 999);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldId<K: FieldKind> {
    id: u16,
    kind: PhantomData<K>,
}

impl<K: FieldKind> FieldId<K> {
    pub const fn new(id: u16) -> Self {
        Self {
            id,
            kind: PhantomData,
        }
    }

    pub const fn id(&self) -> u16 {
        self.id
    }

    pub fn field_type(&self) -> FieldType {
        K::FIELD_TYPE
    }
}

pub type LongFieldId = FieldId<LongKind>;
pub type DoubleFieldId = FieldId<DoubleKind>;
pub type StructureFieldId = FieldId<StructureKind>;
pub type EventFieldId = FieldId<EventKind>;

/// `(ObjectId, field id)`, the unit routers address a single field by
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldKey {
    pub object_id: ObjectId,
    pub field_id: u16,
}

impl FieldKey {
    pub const fn new(object_id: ObjectId, field_id: u16) -> Self {
        Self {
            object_id,
            field_id,
        }
    }

    pub const fn of<K: FieldKind>(object_id: ObjectId, field_id: FieldId<K>) -> Self {
        Self::new(object_id, field_id.id())
    }
}
