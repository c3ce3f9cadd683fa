//! Channel Error Types

use thiserror::Error;

/// Errors returned by channel send operations
///
/// Both variants hand the rejected item back so the producer can decide
/// whether to retry on a later cycle or drop it.
#[derive(Debug, Error)]
pub enum SendError<T> {
    /// Channel is at capacity and the send was non-blocking
    #[error("channel full")]
    Full(T),

    /// Capacity did not free up within the send timeout
    #[error("send timed out")]
    Timeout(T),
}

impl<T> SendError<T> {
    /// Recover the item that could not be sent
    pub fn into_inner(self) -> T {
        match self {
            SendError::Full(item) | SendError::Timeout(item) => item,
        }
    }
}

/// Errors raised while constructing a channel set
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetError {
    /// A set needs at least one member channel
    #[error("channel set must have at least one member")]
    Empty,

    /// Two members were registered under the same identity
    #[error("duplicate channel identity in set")]
    DuplicateIdentity,

    /// A channel can feed readiness into at most one set
    #[error("channel is already attached to a set")]
    AlreadyAttached,
}
