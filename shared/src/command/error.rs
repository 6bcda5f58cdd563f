use relay_sync_serde::BufferError;
use thiserror::Error;

use crate::command::CommandKind;

/// Errors that can occur while framing or parsing a command record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// First byte of a record is not a known command tag
    #[error("Unknown command kind tag: {tag}")]
    UnknownKind { tag: u8 },

    /// Record of a field command arrived without a field id
    #[error("Command {kind:?} requires a field id, but the record carries none")]
    MissingFieldId { kind: CommandKind },

    /// Record of an object command carries a field id it has no use for
    #[error("Command {kind:?} does not take a field id, but the record carries one")]
    UnexpectedFieldId { kind: CommandKind },

    /// Payload is longer than the command kind consumes
    #[error("Command {kind:?} left {remaining} unread payload bytes. This usually means a protocol version mismatch")]
    TrailingBytes { kind: CommandKind, remaining: usize },

    /// Raw record is shorter than its header or declared payload length
    #[error("Command record truncated: expected {expected} bytes, got {actual}")]
    TruncatedRecord { expected: usize, actual: usize },

    /// Payload did not fit or could not be read
    #[error("Buffer error: {0}")]
    Buffer(#[from] BufferError),
}
