use thiserror::Error;

use relay_sync_shared::CommandError;

/// Errors that can occur while moving records through a transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection to the relay is closed
    #[error("Transport is disconnected")]
    Disconnected,

    /// Record could not be handed to the connection
    #[error("Failed to send record: {reason}")]
    SendFailed { reason: String },

    /// Inbound bytes did not parse as a command record. The record is
    /// skipped; later records are still delivered.
    #[error("Received malformed record: {0}")]
    Malformed(#[from] CommandError),
}
