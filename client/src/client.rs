use std::sync::Arc;

use log::{debug, info};

use relay_sync_shared::{
    AccessGroups, Buffer, CodecRegistry, CodecRegistryBuilder, Command, DoubleFieldId,
    EventFieldId, FieldId, FieldKind, LongFieldId, MemberId, ObjectId, StructureFieldId,
    TemplateId,
};

use crate::{
    config::ClientConfig,
    dispatcher::Dispatcher,
    error::ClientError,
    object_builder::ObjectBuilder,
    transport::{Transport, TransportError},
};

/// A relay-sync session: sends field commands for this member and routes
/// what the relay broadcasts to income collectors
///
/// Call [`update`](Self::update) once per frame, then read collector
/// streams. Everything here runs on the calling thread.
pub struct RelayClient<T: Transport> {
    config: ClientConfig,
    transport: T,
    dispatcher: Dispatcher,
    next_object_id: u64,
}

impl<T: Transport> AsRef<Dispatcher> for RelayClient<T> {
    fn as_ref(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

impl<T: Transport> RelayClient<T> {
    /// Builds the codec registry and starts a session over `transport`
    pub fn new(
        config: ClientConfig,
        codecs: CodecRegistryBuilder,
        transport: T,
    ) -> Result<Self, ClientError> {
        let codecs = codecs.build()?;
        Ok(Self::with_registry(config, Arc::new(codecs), transport))
    }

    /// Starts a session sharing an already built registry
    pub fn with_registry(config: ClientConfig, codecs: Arc<CodecRegistry>, transport: T) -> Self {
        info!("Relay client started as member {}", config.member_id);
        Self {
            next_object_id: config.first_object_id,
            config,
            transport,
            dispatcher: Dispatcher::new(codecs),
        }
    }

    pub fn member_id(&self) -> MemberId {
        self.config.member_id
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn codecs(&self) -> &Arc<CodecRegistry> {
        self.dispatcher.codecs()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Called with every error that was logged and skipped during dispatch
    pub fn set_error_hook(&self, hook: impl FnMut(&ClientError) + 'static) {
        self.dispatcher.set_error_hook(hook);
    }

    /// Runs one tick: clears every collector stream, then drains inbound
    /// records in arrival order through the routers
    ///
    /// Returns the number of records taken from the transport. Malformed
    /// records are reported and skipped; only a disconnected or failing
    /// transport ends the update with an error.
    pub fn update(&mut self) -> Result<usize, ClientError> {
        self.dispatcher.begin_update();

        let mut received = 0;
        while self
            .config
            .max_records_per_update
            .map_or(true, |max| received < max)
        {
            match self.transport.receive() {
                Ok(Some(record)) => {
                    received += 1;
                    self.dispatcher.dispatch_record(&record);
                }
                Ok(None) => break,
                Err(TransportError::Malformed(error)) => {
                    received += 1;
                    self.dispatcher
                        .report(ClientError::Transport(TransportError::Malformed(error)));
                }
                Err(error) => return Err(error.into()),
            }
        }
        Ok(received)
    }

    /// Frames `command` as authored by this member and sends it. Nothing is
    /// sent if framing fails.
    pub fn send(&mut self, command: &Command) -> Result<(), ClientError> {
        let record = command.encode(self.config.member_id)?;
        debug!("Sending {:?} for {}", record.kind, record.object_id);
        self.transport.send(&record)?;
        Ok(())
    }

    pub fn set_long(
        &mut self,
        object_id: ObjectId,
        field_id: LongFieldId,
        value: i64,
    ) -> Result<(), ClientError> {
        self.send(&Command::SetLong {
            object_id,
            field_id,
            value,
        })
    }

    pub fn increment_long(
        &mut self,
        object_id: ObjectId,
        field_id: LongFieldId,
        increment: i64,
    ) -> Result<(), ClientError> {
        self.send(&Command::IncrementLong {
            object_id,
            field_id,
            increment,
        })
    }

    /// Asks the relay to set the field to `new` if it currently holds
    /// `current`. The comparison happens on the relay; when it succeeds,
    /// other members observe `new`. `reset` is applied by the relay when
    /// this member disconnects.
    pub fn compare_and_set_long(
        &mut self,
        object_id: ObjectId,
        field_id: LongFieldId,
        current: i64,
        new: i64,
        reset: Option<i64>,
    ) -> Result<(), ClientError> {
        self.send(&Command::CompareAndSetLong {
            object_id,
            field_id,
            current,
            new,
            reset,
        })
    }

    pub fn set_double(
        &mut self,
        object_id: ObjectId,
        field_id: DoubleFieldId,
        value: f64,
    ) -> Result<(), ClientError> {
        self.send(&Command::SetDouble {
            object_id,
            field_id,
            value,
        })
    }

    pub fn increment_double(
        &mut self,
        object_id: ObjectId,
        field_id: DoubleFieldId,
        increment: f64,
    ) -> Result<(), ClientError> {
        self.send(&Command::IncrementDouble {
            object_id,
            field_id,
            increment,
        })
    }

    pub fn set_structure<S: 'static>(
        &mut self,
        object_id: ObjectId,
        field_id: StructureFieldId,
        value: &S,
    ) -> Result<(), ClientError> {
        let value = self.encode_value(value)?;
        self.send(&Command::SetStructure {
            object_id,
            field_id,
            value,
        })
    }

    pub fn send_event<E: 'static>(
        &mut self,
        object_id: ObjectId,
        field_id: EventFieldId,
        event: &E,
    ) -> Result<(), ClientError> {
        let event = self.encode_value(event)?;
        self.send(&Command::Event {
            object_id,
            field_id,
            event,
        })
    }

    /// Sends an event that the relay delivers to `target` only
    pub fn send_event_to<E: 'static>(
        &mut self,
        target: MemberId,
        object_id: ObjectId,
        field_id: EventFieldId,
        event: &E,
    ) -> Result<(), ClientError> {
        let event = self.encode_value(event)?;
        self.send(&Command::TargetEvent {
            target,
            object_id,
            field_id,
            event,
        })
    }

    pub fn delete_field<K: FieldKind>(
        &mut self,
        object_id: ObjectId,
        field_id: FieldId<K>,
    ) -> Result<(), ClientError> {
        self.send(&Command::DeleteField {
            object_id,
            field_id: field_id.id(),
            field_type: K::FIELD_TYPE,
        })
    }

    pub fn delete_object(&mut self, object_id: ObjectId) -> Result<(), ClientError> {
        self.send(&Command::Delete { object_id })?;
        self.dispatcher.routers().objects.on_local_delete(object_id);
        Ok(())
    }

    /// Forgets objects `member_id` started creating but never finished.
    /// Call when the session reports that the member left the room.
    pub fn member_left(&self, member_id: MemberId) {
        self.dispatcher.routers().objects.on_member_left(member_id);
    }

    /// Starts a new object owned by this member. Nothing is sent until
    /// [`ObjectBuilder::build`].
    pub fn new_object_builder(
        &mut self,
        template: TemplateId,
        access_groups: AccessGroups,
    ) -> ObjectBuilder<'_, T> {
        let object_id = ObjectId::new_member(self.next_object_id, self.config.member_id);
        self.next_object_id += 1;
        ObjectBuilder::new(self, object_id, template, access_groups)
    }

    pub(crate) fn encode_value<V: 'static>(&self, value: &V) -> Result<Buffer, ClientError> {
        let mut buffer = Buffer::new();
        self.codecs().encode(value, &mut buffer)?;
        Ok(buffer)
    }
}
