use std::{collections::HashMap, fmt, sync::Arc};

use relay_sync_shared::{
    AccessGroups, Buffer, CodecError, CodecRegistry, DoubleFieldId, FieldType, LongFieldId,
    ObjectId, StructureFieldId, TemplateId,
};

/// Snapshot of an object as it was announced by its creator
///
/// Field values set between the create and created commands are gathered
/// here, so a template collector sees the object's initial state in one
/// piece.
#[derive(Clone)]
pub struct ObjectConstructor {
    object_id: ObjectId,
    template: TemplateId,
    access_groups: AccessGroups,
    longs: HashMap<u16, i64>,
    doubles: HashMap<u16, f64>,
    structures: HashMap<u16, Buffer>,
    codecs: Arc<CodecRegistry>,
}

impl ObjectConstructor {
    pub(crate) fn new(
        object_id: ObjectId,
        template: TemplateId,
        access_groups: AccessGroups,
        codecs: Arc<CodecRegistry>,
    ) -> Self {
        Self {
            object_id,
            template,
            access_groups,
            longs: HashMap::new(),
            doubles: HashMap::new(),
            structures: HashMap::new(),
            codecs,
        }
    }

    pub fn object_id(&self) -> ObjectId {
        self.object_id
    }

    pub fn template(&self) -> TemplateId {
        self.template
    }

    pub fn access_groups(&self) -> AccessGroups {
        self.access_groups
    }

    pub fn get_long(&self, field_id: LongFieldId) -> Option<i64> {
        self.longs.get(&field_id.id()).copied()
    }

    pub fn get_double(&self, field_id: DoubleFieldId) -> Option<f64> {
        self.doubles.get(&field_id.id()).copied()
    }

    /// Decodes the structure stored under `field_id`, `Ok(None)` if the
    /// creator never set it
    pub fn get_structure<T: 'static>(
        &self,
        field_id: StructureFieldId,
    ) -> Result<Option<T>, CodecError> {
        let Some(stored) = self.structures.get(&field_id.id()) else {
            return Ok(None);
        };
        let mut buffer = *stored;
        buffer.rewind();
        self.codecs.decode::<T>(&mut buffer).map(Some)
    }

    pub(crate) fn set_long(&mut self, field_id: u16, value: i64) {
        self.longs.insert(field_id, value);
    }

    pub(crate) fn increment_long(&mut self, field_id: u16, increment: i64) {
        let value = self.longs.entry(field_id).or_insert(0);
        *value = value.wrapping_add(increment);
    }

    pub(crate) fn set_double(&mut self, field_id: u16, value: f64) {
        self.doubles.insert(field_id, value);
    }

    pub(crate) fn increment_double(&mut self, field_id: u16, increment: f64) {
        *self.doubles.entry(field_id).or_insert(0.0) += increment;
    }

    pub(crate) fn set_structure(&mut self, field_id: u16, value: Buffer) {
        self.structures.insert(field_id, value);
    }

    pub(crate) fn delete_field(&mut self, field_id: u16, field_type: FieldType) {
        match field_type {
            FieldType::Long => {
                self.longs.remove(&field_id);
            }
            FieldType::Double => {
                self.doubles.remove(&field_id);
            }
            FieldType::Structure => {
                self.structures.remove(&field_id);
            }
            FieldType::Event => {}
        }
    }
}

impl fmt::Debug for ObjectConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectConstructor")
            .field("object_id", &self.object_id)
            .field("template", &self.template)
            .field("access_groups", &self.access_groups)
            .field("longs", &self.longs)
            .field("doubles", &self.doubles)
            .field("structures", &self.structures)
            .finish_non_exhaustive()
    }
}
