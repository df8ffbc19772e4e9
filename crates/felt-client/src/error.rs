//! Error taxonomy for the sync core.
//!
//! Failures here are banner material, not control flow: one-shot call
//! failures are caught at the call site, stored for presentation, and never
//! propagate further. Connectivity loss is deliberately absent — it is a
//! [`crate::link::ConnectionStatus`], not an error.

use thiserror::Error;

/// Failures surfaced to presentation through the snapshot store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The server could not be reached for a one-shot call.
    #[error("server unreachable: {0}")]
    TransportUnavailable(String),

    /// The create-game call failed.
    #[error("failed to start a new game: {0}")]
    CreateGameFailed(String),

    /// The next-hand call failed.
    #[error("failed to start the next hand: {0}")]
    AdvanceHandFailed(String),

    /// The server rejected a pushed action, e.g. acting out of turn or a
    /// malformed amount. The message comes verbatim from the server.
    #[error("{0}")]
    ServerRejected(String),

    /// A pushed action went unanswered past the reply deadline.
    #[error("no response to submitted action")]
    ActionTimedOut,
}
