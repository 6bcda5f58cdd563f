mod error;
mod memory;

pub use error::TransportError;
pub use memory::MemoryTransport;

use relay_sync_shared::CommandRecord;

/// Moves framed command records between a client and the relay
///
/// Implementations must hand inbound records to `receive` in arrival order,
/// once each.
pub trait Transport {
    fn send(&mut self, record: &CommandRecord) -> Result<(), TransportError>;

    /// Next inbound record, or `None` when nothing is queued
    fn receive(&mut self) -> Result<Option<CommandRecord>, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, record: &CommandRecord) -> Result<(), TransportError> {
        (**self).send(record)
    }

    fn receive(&mut self) -> Result<Option<CommandRecord>, TransportError> {
        (**self).receive()
    }
}
