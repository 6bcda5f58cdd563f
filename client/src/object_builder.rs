use relay_sync_shared::{
    AccessGroups, Command, CommandRecord, DoubleFieldId, LongFieldId, ObjectId,
    StructureFieldId, TemplateId,
};

use crate::{client::RelayClient, error::ClientError, transport::Transport};

/// Collects an object's initial field values and sends the object as
/// create, field commands, created
///
/// Every command is framed before the first one is sent, so a value that
/// does not fit fails the build without anything reaching the relay.
pub struct ObjectBuilder<'c, T: Transport> {
    client: &'c mut RelayClient<T>,
    object_id: ObjectId,
    template: TemplateId,
    access_groups: AccessGroups,
    fields: Vec<Command>,
}

impl<'c, T: Transport> ObjectBuilder<'c, T> {
    pub(crate) fn new(
        client: &'c mut RelayClient<T>,
        object_id: ObjectId,
        template: TemplateId,
        access_groups: AccessGroups,
    ) -> Self {
        Self {
            client,
            object_id,
            template,
            access_groups,
            fields: Vec::new(),
        }
    }

    pub fn object_id(&self) -> ObjectId {
        self.object_id
    }

    pub fn set_long(&mut self, field_id: LongFieldId, value: i64) -> &mut Self {
        self.fields.push(Command::SetLong {
            object_id: self.object_id,
            field_id,
            value,
        });
        self
    }

    pub fn set_double(&mut self, field_id: DoubleFieldId, value: f64) -> &mut Self {
        self.fields.push(Command::SetDouble {
            object_id: self.object_id,
            field_id,
            value,
        });
        self
    }

    pub fn set_structure<S: 'static>(
        &mut self,
        field_id: StructureFieldId,
        value: &S,
    ) -> Result<&mut Self, ClientError> {
        let value = self.client.encode_value(value)?;
        self.fields.push(Command::SetStructure {
            object_id: self.object_id,
            field_id,
            value,
        });
        Ok(self)
    }

    /// Sends the object and returns its id
    pub fn build(self) -> Result<ObjectId, ClientError> {
        let creator = self.client.member_id();
        let mut records: Vec<CommandRecord> = Vec::with_capacity(self.fields.len() + 2);

        records.push(
            Command::Create {
                object_id: self.object_id,
                template: self.template,
                access_groups: self.access_groups,
            }
            .encode(creator)?,
        );
        for command in &self.fields {
            records.push(command.encode(creator)?);
        }
        records.push(
            Command::Created {
                object_id: self.object_id,
            }
            .encode(creator)?,
        );

        for record in &records {
            self.client.transport_mut().send(record)?;
        }
        self.client
            .dispatcher()
            .routers()
            .objects
            .on_local_created(self.object_id, self.template);
        Ok(self.object_id)
    }
}
