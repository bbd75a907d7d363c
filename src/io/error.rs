use std::io;

use thiserror::Error;

/// Errors from sending data through a candidate.
#[derive(Debug, Error)]
pub enum NetError {
    /// A wrapped IO error.
    #[error("{0}")]
    Io(#[from] io::Error),

    /// The outbox already holds the maximum number of queued transmits.
    #[error("outbox full ({0} queued)")]
    OutboxFull(usize),

    /// The candidate has no way of sending, typically a remote candidate.
    #[error("candidate can't send: {0}")]
    NotSendable(String),
}
