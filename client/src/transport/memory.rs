use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use log::warn;

use relay_sync_shared::{CommandError, CommandRecord};

use super::{Transport, TransportError};

#[derive(Default)]
struct Queues {
    inbound: VecDeque<Vec<u8>>,
    outbound: VecDeque<Vec<u8>>,
    disconnected: bool,
}

/// In-process transport over framed byte queues
///
/// Clones share the same queues: the client owns one handle and a test
/// relay (or test body) drives the other.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    queues: Rc<RefCell<Queues>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `record` for the client's next `receive`
    pub fn push_inbound(&self, record: &CommandRecord) -> Result<(), CommandError> {
        let bytes = record.to_bytes()?;
        self.push_inbound_bytes(bytes);
        Ok(())
    }

    /// Queues raw bytes, well-formed or not
    pub fn push_inbound_bytes(&self, bytes: Vec<u8>) {
        self.queues.borrow_mut().inbound.push_back(bytes);
    }

    /// Drains everything the client sent since the last call
    pub fn take_outbound(&self) -> Vec<CommandRecord> {
        self.take_outbound_bytes()
            .into_iter()
            .filter_map(|bytes| match CommandRecord::from_bytes(&bytes) {
                Ok(record) => Some(record),
                Err(error) => {
                    warn!("Dropping unparseable outbound record: {}", error);
                    None
                }
            })
            .collect()
    }

    pub fn take_outbound_bytes(&self) -> Vec<Vec<u8>> {
        self.queues.borrow_mut().outbound.drain(..).collect()
    }

    pub fn inbound_len(&self) -> usize {
        self.queues.borrow().inbound.len()
    }

    pub fn disconnect(&self) {
        self.queues.borrow_mut().disconnected = true;
    }

    pub fn is_connected(&self) -> bool {
        !self.queues.borrow().disconnected
    }
}

impl Transport for MemoryTransport {
    fn send(&mut self, record: &CommandRecord) -> Result<(), TransportError> {
        let mut queues = self.queues.borrow_mut();
        if queues.disconnected {
            return Err(TransportError::Disconnected);
        }
        let bytes = record.to_bytes().map_err(|error| TransportError::SendFailed {
            reason: error.to_string(),
        })?;
        queues.outbound.push_back(bytes);
        Ok(())
    }

    fn receive(&mut self) -> Result<Option<CommandRecord>, TransportError> {
        let mut queues = self.queues.borrow_mut();
        match queues.inbound.pop_front() {
            Some(bytes) => Ok(Some(CommandRecord::from_bytes(&bytes)?)),
            None if queues.disconnected => Err(TransportError::Disconnected),
            None => Ok(None),
        }
    }
}
