//! In-memory stand-in for the relay server
//!
//! Routes records between clients connected over [`MemoryTransport`]s and
//! keeps just enough field state to resolve increments and compare-and-set
//! the way the real relay does.

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};

use relay_sync_client::MemoryTransport;
use relay_sync_shared::{
    Command, CommandRecord, DoubleFieldId, FieldKey, LongFieldId, MemberId, ObjectId,
};

#[derive(Default)]
pub struct LocalRelay {
    members: BTreeMap<MemberId, MemoryTransport>,
    longs: HashMap<FieldKey, i64>,
    doubles: HashMap<FieldKey, f64>,
    resets: HashMap<MemberId, Vec<(ObjectId, LongFieldId, i64)>>,
}

impl LocalRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `member_id` and returns the transport its client should use
    pub fn connect(&mut self, member_id: MemberId) -> MemoryTransport {
        let transport = MemoryTransport::new();
        self.members.insert(member_id, transport.clone());
        transport
    }

    /// Drops a member and applies the reset values of its compare-and-set
    /// commands, broadcasting them as plain sets
    pub fn disconnect(&mut self, member_id: MemberId) {
        if let Some(transport) = self.members.remove(&member_id) {
            transport.disconnect();
        }
        for (object_id, field_id, value) in self.resets.remove(&member_id).unwrap_or_default() {
            self.longs.insert(FieldKey::of(object_id, field_id), value);
            self.broadcast(
                member_id,
                &Command::SetLong {
                    object_id,
                    field_id,
                    value,
                },
            );
        }
    }

    pub fn long(&self, object_id: ObjectId, field_id: LongFieldId) -> Option<i64> {
        self.longs.get(&FieldKey::of(object_id, field_id)).copied()
    }

    pub fn double(&self, object_id: ObjectId, field_id: DoubleFieldId) -> Option<f64> {
        self.doubles.get(&FieldKey::of(object_id, field_id)).copied()
    }

    /// Takes everything members sent and forwards it. Returns how many
    /// records were accepted.
    pub fn tick(&mut self) -> usize {
        let mut outbound = Vec::new();
        for (member_id, transport) in &self.members {
            for record in transport.take_outbound() {
                outbound.push((*member_id, record));
            }
        }

        let mut accepted = 0;
        for (member_id, record) in outbound {
            if self.handle(member_id, &record) {
                accepted += 1;
            }
        }
        accepted
    }

    fn handle(&mut self, sender: MemberId, record: &CommandRecord) -> bool {
        if record.creator != sender {
            warn!(
                "Member {} sent a record claiming creator {}, rewriting",
                sender, record.creator
            );
        }
        let command = match Command::decode(record) {
            Ok(command) => command,
            Err(error) => {
                warn!("Dropping malformed record from member {}: {}", sender, error);
                return false;
            }
        };

        match &command {
            Command::SetLong {
                object_id,
                field_id,
                value,
            } => {
                self.longs.insert(FieldKey::of(*object_id, *field_id), *value);
            }
            Command::IncrementLong {
                object_id,
                field_id,
                increment,
            } => {
                let value = self.longs.entry(FieldKey::of(*object_id, *field_id)).or_insert(0);
                *value = value.wrapping_add(*increment);
            }
            Command::CompareAndSetLong {
                object_id,
                field_id,
                current,
                new,
                reset,
            } => {
                let value = self.longs.entry(FieldKey::of(*object_id, *field_id)).or_insert(0);
                if *value != *current {
                    debug!(
                        "Compare-and-set on {} rejected: holds {}, expected {}",
                        object_id, value, current
                    );
                    return false;
                }
                *value = *new;
                if let Some(reset) = reset {
                    self.resets
                        .entry(sender)
                        .or_default()
                        .push((*object_id, *field_id, *reset));
                }
            }
            Command::SetDouble {
                object_id,
                field_id,
                value,
            } => {
                self.doubles.insert(FieldKey::of(*object_id, *field_id), *value);
            }
            Command::IncrementDouble {
                object_id,
                field_id,
                increment,
            } => {
                *self
                    .doubles
                    .entry(FieldKey::of(*object_id, *field_id))
                    .or_insert(0.0) += *increment;
            }
            Command::TargetEvent {
                target,
                object_id,
                field_id,
                event,
            } => {
                let delivered = Command::Event {
                    object_id: *object_id,
                    field_id: *field_id,
                    event: *event,
                };
                self.send_to(sender, *target, &delivered);
                return true;
            }
            Command::DeleteField {
                object_id,
                field_id,
                ..
            } => {
                let key = FieldKey::new(*object_id, *field_id);
                self.longs.remove(&key);
                self.doubles.remove(&key);
            }
            Command::Delete { object_id } => {
                self.longs.retain(|key, _| key.object_id != *object_id);
                self.doubles.retain(|key, _| key.object_id != *object_id);
            }
            Command::Create { .. }
            | Command::Created { .. }
            | Command::SetStructure { .. }
            | Command::Event { .. } => {}
        }

        self.broadcast(sender, &command);
        true
    }

    fn broadcast(&self, creator: MemberId, command: &Command) {
        for member_id in self.members.keys() {
            if *member_id != creator {
                self.send_to(creator, *member_id, command);
            }
        }
    }

    fn send_to(&self, creator: MemberId, member_id: MemberId, command: &Command) {
        let Some(transport) = self.members.get(&member_id) else {
            debug!("Member {} is not connected, dropping {:?}", member_id, command.kind());
            return;
        };
        match command.encode(creator) {
            Ok(record) => {
                if let Err(error) = transport.push_inbound(&record) {
                    warn!("Failed to deliver to member {}: {}", member_id, error);
                }
            }
            Err(error) => warn!("Failed to frame {:?}: {}", command.kind(), error),
        }
    }
}

