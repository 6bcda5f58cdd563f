use thiserror::Error;

use relay_sync_shared::{CodecError, CommandError, CommandKind};

use crate::transport::TransportError;

/// Errors raised by a single listener while handling a notification
///
/// These never stop dispatch. The router hands them to the client's error
/// hook and moves on to the next listener.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListenerError {
    /// Listener could not decode a structure or event payload
    #[error("Listener failed to decode payload: {0}")]
    Codec(#[from] CodecError),

    /// Application code held a collector stream across `update()`
    #[error("Collector stream is still borrowed. Drop stream() references before calling update()")]
    StreamBorrowed,
}

/// Errors surfaced by a relay-sync client session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Codec registry could not be built, or a value had no codec
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// A command could not be framed or an inbound record could not be parsed
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    /// Transport refused a record or is gone
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A listener failed while handling a command of `kind`
    #[error("Listener for {kind:?} command failed: {source}")]
    Listener {
        kind: CommandKind,
        source: ListenerError,
    },

    /// Before-update hook listener failed
    #[error("Before-update listener failed: {0}")]
    BeforeUpdate(ListenerError),
}
